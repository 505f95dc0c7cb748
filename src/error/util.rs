//! Utility functions for error handling
//!
//! File access helpers that attach the path and the reason the file was
//! needed to any failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{RowmapError, Result};

/// Safely read a file to string with rich error information
///
/// # Arguments
/// * `path` - The path to the file to read
/// * `purpose` - Why the file is being read (for error context)
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    if !path.exists() {
        return Err(RowmapError::io_error(
            format!("File not found; needed for: {purpose}"),
            path,
        ));
    }

    if !path.is_file() {
        return Err(RowmapError::io_error(
            format!("Path is not a file; expected a file for: {purpose}"),
            path,
        ));
    }

    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) => {
            // Provide different error messages based on the error kind
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check file permissions".to_string()
                }
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file content for: {purpose}"),
            };

            Err(RowmapError::io_error_with_source(context, path, e))
        }
    }
}
