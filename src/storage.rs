use crate::models::Entry;
use serde_json::Value;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/entries.json")
}

/// Reads a JSON array of entries. Any failure degrades to an empty dataset,
/// and records that cannot be read as entries are skipped.
pub async fn load_entries(path: &Path) -> Vec<Entry> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("no entries file at {}", path.display());
            return Vec::new();
        }
        Err(err) => {
            error!("failed to read entries file: {err}");
            return Vec::new();
        }
    };

    let entries = parse_entries(&bytes);
    info!("loaded {} entries from {}", entries.len(), path.display());
    entries
}

pub fn parse_entries(bytes: &[u8]) -> Vec<Entry> {
    let records: Vec<Value> = match serde_json::from_slice(bytes) {
        Ok(records) => records,
        Err(err) => {
            error!("failed to parse entries file: {err}");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping entry {index}: {err}");
                None
            }
        })
        .collect()
}
