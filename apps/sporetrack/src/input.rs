//! # Batch File Input
//!
//! Loads batch records exported from the farm API for the CLI.
//!
//! A batch file holds one JSON object; a batch list file holds a JSON array.

use sporetrack_core::{ProductionBatch, SporetrackError, primitives::MAX_BATCHES_PER_REQUEST};
use std::path::{Path, PathBuf};

/// Maximum size of an input file (10 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
pub const MAX_INPUT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validate file path for reading.
///
/// Canonicalizes the path to resolve symlinks and "..", and ensures it
/// names an existing regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, SporetrackError> {
    let canonical = path.canonicalize().map_err(|e| {
        SporetrackError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SporetrackError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SporetrackError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SporetrackError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SporetrackError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String, SporetrackError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_INPUT_FILE_SIZE)?;

    std::fs::read_to_string(&path)
        .map_err(|e| SporetrackError::IoError(format!("Failed to read file: {}", e)))
}

/// Load and validate a single batch record.
pub fn load_batch(path: &Path) -> Result<ProductionBatch, SporetrackError> {
    let content = read_input(path)?;
    let batch: ProductionBatch = serde_json::from_str(&content)
        .map_err(|e| SporetrackError::SerializationError(format!("Invalid batch JSON: {}", e)))?;

    batch.validate()?;
    Ok(batch)
}

/// Load and validate a list of batch records.
pub fn load_batches(path: &Path) -> Result<Vec<ProductionBatch>, SporetrackError> {
    let content = read_input(path)?;
    let batches: Vec<ProductionBatch> = serde_json::from_str(&content).map_err(|e| {
        SporetrackError::SerializationError(format!("Invalid batch list JSON: {}", e))
    })?;

    if batches.len() > MAX_BATCHES_PER_REQUEST {
        return Err(SporetrackError::InvalidBatch(format!(
            "{} batches exceeds maximum of {}",
            batches.len(),
            MAX_BATCHES_PER_REQUEST
        )));
    }

    for batch in &batches {
        batch.validate().map_err(|e| {
            SporetrackError::InvalidBatch(format!("batch {:?}: {}", batch.batch_number, e))
        })?;
    }

    Ok(batches)
}
