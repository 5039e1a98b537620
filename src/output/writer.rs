//! JSON file writer
//!
//! Persists a fetched collection as a pretty-printed JSON array.

use crate::error::{Result, ResultExt};
use crate::types::{Collection, Record};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Indentation used for persisted files
const INDENT: &[u8] = b"    ";

/// Writes collections into an output directory
#[derive(Debug, Clone)]
pub struct JsonWriter {
    dir: PathBuf,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl JsonWriter {
    /// Create a writer for the given output directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a collection is written to
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Write a collection, replacing any previous file
    pub fn write(&self, collection: Collection, records: &[Record]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(collection);
        write_json_pretty(&path, records)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Serialize a value to a file with four-space indentation
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;

    writer.flush()?;
    Ok(())
}
