//! Filesystem Tools
//!
//! Information Hiding:
//! - File I/O implementation details hidden
//! - I/O failures reported as readable text instead of errors

use super::{Tool, ToolFailure, ToolMetadata};
use crate::{optional_string, required_string, tool_metadata};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Read a text file
pub struct ReadTextFileTool;

impl ReadTextFileTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReadTextFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadTextFileTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "read_text_file",
            description: "Reads the content of a text file and returns it as a string. \
                          If the file is not found, returns an error message saying so.",
            parameters: [
                { name: "file_name" }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolFailure> {
        let file_name = required_string!(args, "file_name");

        tracing::info!("Reading file: {}", file_name);

        match fs::read_to_string(file_name).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(format!("Error: The file '{}' was not found.", file_name))
            }
            Err(e) => Ok(format!("An error occurred: {}", e)),
        }
    }
}

/// List the files of a directory as a numbered list
pub struct ListFilesTool;

impl ListFilesTool {
    pub fn new() -> Self {
        Self
    }

    async fn list(directory: &str, file_type: Option<&str>) -> std::io::Result<String> {
        let dir = Path::new(directory);
        if !fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Ok(format!(
                "Error: The directory '{}' does not exist.",
                directory
            ));
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks, so a link to a file counts as a file
            if !fs::metadata(entry.path()).await.map(|m| m.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if file_type.map_or(true, |ext| name.ends_with(ext)) {
                names.push(name);
            }
        }
        names.sort();

        if names.is_empty() {
            return Ok(match file_type {
                Some(ext) => format!(
                    "No files found in the directory '{}' matching the file type '{}'.",
                    directory, ext
                ),
                None => format!("No files found in the directory '{}'.", directory),
            });
        }

        Ok(names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {}", i + 1, dir.join(name).display()))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl Default for ListFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "list_files_in_directory",
            description: "Lists all files in the given directory and returns their full paths \
                          as a numbered list. Optionally filters by file extension (e.g. '.txt').",
            parameters: [
                { name: "directory" },
                { name: "file_type", default: null }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolFailure> {
        let directory = required_string!(args, "directory");
        let file_type = optional_string!(args, "file_type");

        tracing::info!("Listing directory: {} (filter: {:?})", directory, file_type);

        match Self::list(directory, file_type).await {
            Ok(listing) => Ok(listing),
            Err(e) => Ok(format!("An error occurred: {}", e)),
        }
    }
}
