//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization. Floats are stored as 64-bit values, so a
//! save/load round trip is bit-exact.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::QTable};

/// MessagePack-based table repository.
///
/// # Examples
///
/// ```no_run
/// use mazerl::adapters::MsgPackRepository;
/// use mazerl::ports::TableRepository;
/// use mazerl::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let table = QTable::new(7, 7);
///
/// repo.save(&table, Path::new("qtable_5.msgpack"))?;
/// let loaded = repo.load(Path::new("qtable_5.msgpack"))?;
/// # Ok::<(), mazerl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, table).map_err(|e| Error::SerializationContext {
            operation: "serialize value table to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<QTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let table = rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize value table from MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{environment::Action, maze::Cell};

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("qtable_5.msgpack");

        let mut table = QTable::new(7, 7);
        table.set(Cell::new(1, 1), Action::Right, 0.1 + 0.2);
        table.set(Cell::new(5, 4), Action::Down, -1e-300);

        let repo = MsgPackRepository::new();
        repo.save(&table, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("nested").join("tables").join("t.msgpack");

        MsgPackRepository::new()
            .save(&QTable::new(5, 5), &file_path)
            .expect("Failed to save");
        assert!(file_path.exists());
    }

    #[test]
    fn test_load_nonexistent_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = MsgPackRepository::new()
            .load(&temp_dir.path().join("missing.msgpack"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_corrupt_is_not_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("corrupt.msgpack");
        std::fs::write(&file_path, b"definitely not msgpack").unwrap();

        let err = MsgPackRepository::new().load(&file_path).unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, Error::SerializationContext { .. }));
    }

    #[test]
    fn test_load_rejects_truncated_table() {
        #[derive(serde::Serialize)]
        struct Truncated {
            rows: usize,
            cols: usize,
            values: Vec<f64>,
        }

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("qtable_5.msgpack");
        let bytes = rmp_serde::to_vec(&Truncated {
            rows: 7,
            cols: 7,
            values: vec![1.0; 3],
        })
        .unwrap();
        std::fs::write(&file_path, bytes).unwrap();

        let err = MsgPackRepository::new().load(&file_path).unwrap_err();
        assert!(matches!(err, Error::SerializationContext { .. }));
    }
}
