use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use huffpress::Summary;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub timestamp: String,
    pub action: String,
    pub source: String,
    pub destination: String,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub source_sha256: String,
}

impl JournalEntry {
    pub fn new(action: &str, source: &Path, destination: &Path, summary: &Summary) -> io::Result<Self> {
        Ok(JournalEntry {
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            source: source.display().to_string(),
            destination: destination.display().to_string(),
            input_bytes: summary.input_bytes,
            output_bytes: summary.output_bytes,
            source_sha256: file_sha256(source)?,
        })
    }
}

/// Appends `entry` as one JSON line.
pub fn append(path: &Path, entry: &JournalEntry) -> anyhow::Result<()> {
    let json = serde_json::to_string(entry)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

fn file_sha256(path: &Path) -> io::Result<String> {
    let mut hasher = Sha256::default();
    io::copy(&mut File::open(path)?, &mut hasher)?;
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
