//! JSON import/export module for spacing tracker state.
//! Provides functionality to save and load a tracker's two persisted fields
//! to/from JSON files.

use crate::models::SpacingTracker;
use std::fs::File;
use std::io::{Read, Write};

/// Exports a tracker's state to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(
    tracker: &SpacingTracker,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_string = serde_json::to_string_pretty(tracker)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Imports tracker state from a JSON file.
/// Returns an error if the file doesn't exist, contains invalid JSON, or is
/// missing the due date field. A missing interval field defaults to zero.
pub fn import_json(filename: &str) -> Result<SpacingTracker, Box<dyn std::error::Error>> {
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let tracker: SpacingTracker = serde_json::from_str(&contents)?;

    println!("Tracker state imported from '{}'", filename);
    Ok(tracker)
}
