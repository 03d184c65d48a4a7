use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

/// Tracks which file the buffer belongs to and moves lines between the
/// buffer and disk. Saving overwrites; there is no partial-write recovery.
pub struct FileManager {
    current_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { current_path: path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.current_path = Some(path);
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    /// Read the named file into buffer lines and remember the path. A
    /// missing file is not an error: the editor starts with an empty buffer
    /// and the path is kept for a later save.
    pub fn open(&mut self, path: PathBuf) -> Result<Vec<String>> {
        let result = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let lines: Vec<String> = content.lines().map(str::to_string).collect();
                log::info!("Opened {} ({} lines)", path.display(), lines.len());
                Ok(lines)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "File not found, starting with an empty buffer: {}",
                    path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => {
                let message = match e.kind() {
                    io::ErrorKind::PermissionDenied => {
                        format!("No permission to read the file: {}", path.display())
                    }
                    io::ErrorKind::InvalidData => {
                        format!("File is not valid UTF-8: {}", path.display())
                    }
                    _ => format!("Failed to read the file: {} - {}", path.display(), e),
                };
                Err(anyhow::anyhow!(message))
            }
        };
        // The path is remembered even when the read failed, so a later save
        // still has a destination.
        self.current_path = Some(path);
        result
    }

    /// Write every buffer line followed by a newline, overwriting the file.
    pub fn save(&self, lines: &[String]) -> Result<usize> {
        let path = self
            .current_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No file path is set"))?;

        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        match std::fs::write(path, content.as_bytes()) {
            Ok(()) => {
                log::info!("Wrote {} lines to {}", lines.len(), path.display());
                Ok(lines.len())
            }
            Err(e) => {
                let message = match e.kind() {
                    io::ErrorKind::PermissionDenied => {
                        format!("No permission to write the file: {}", path.display())
                    }
                    io::ErrorKind::WriteZero => {
                        format!("The disk may be full: {}", path.display())
                    }
                    _ => format!("Failed to write the file: {} - {}", path.display(), e),
                };
                Err(anyhow::anyhow!(message))
            }
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new(None)
    }
}
