use super::RecordProvider;
use crate::error::Result;
use crate::model::Record;
use std::fs;
use std::path::PathBuf;

/// Loads records from a JSON array on disk:
/// `[{"name": "...", "role": "...", "applicationCode": "..."}, ...]`.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    pub path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordProvider for JsonFileProvider {
    fn load(&self) -> Result<Vec<Record>> {
        let content = fs::read_to_string(&self.path)?;
        let records: Vec<Record> = serde_json::from_str(&content)?;
        Ok(records)
    }
}
