//! Interactive prompts for values not supplied on the command line

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::{
    Error, Result,
    app::{MazeSize, TrainingMode},
};

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::Io {
            operation: "read answer from standard input".to_string(),
            source: io::Error::from(io::ErrorKind::UnexpectedEof),
        });
    }
    Ok(line.trim().to_string())
}

/// Ask for a maze size until a supported one is entered.
pub fn prompt_maze_size<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<MazeSize> {
    let choices = MazeSize::ALL
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    loop {
        let answer = read_answer(input, output, &format!("Enter maze size ({choices}): "))?;
        match answer.parse::<MazeSize>() {
            Ok(size) => return Ok(size),
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

/// Ask for a training mode. Empty or unknown answers fall back to visual.
pub fn prompt_training_mode<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<TrainingMode> {
    let answer = read_answer(input, output, "Training mode (visual/fast) [visual]: ")?;
    if answer.is_empty() {
        return Ok(TrainingMode::default());
    }
    match answer.parse::<TrainingMode>() {
        Ok(mode) => Ok(mode),
        Err(err) => {
            warn!(%err, "unknown training mode; defaulting to visual");
            writeln!(output, "Unknown mode '{answer}', defaulting to visual")?;
            Ok(TrainingMode::Visual)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_size_reprompts_until_valid() {
        let mut input = Cursor::new("abc\n7\n10\n");
        let mut output = Vec::new();
        let size = prompt_maze_size(&mut input, &mut output).unwrap();
        assert_eq!(size, MazeSize::Medium);

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("Enter maze size").count(), 3);
    }

    #[test]
    fn test_size_eof_is_error() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_maze_size(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_mode_defaults_to_visual() {
        let mut output = Vec::new();
        assert_eq!(
            prompt_training_mode(&mut Cursor::new("\n"), &mut output).unwrap(),
            TrainingMode::Visual
        );
        assert_eq!(
            prompt_training_mode(&mut Cursor::new("turbo\n"), &mut output).unwrap(),
            TrainingMode::Visual
        );
        assert_eq!(
            prompt_training_mode(&mut Cursor::new("Fast\n"), &mut output).unwrap(),
            TrainingMode::Fast
        );
    }
}
