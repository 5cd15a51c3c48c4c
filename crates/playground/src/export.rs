use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub const DEFAULT_EXPORT_STEM: &str = "shader";
pub const DEFAULT_EXPORT_EXTENSION: &str = "frag";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read the document for export")]
    Document(#[source] anyhow::Error),
    #[error("failed to save {filename}")]
    Save {
        filename: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Asks the user which name to save under. `None` means cancelled.
pub trait FilenamePrompt {
    fn prompt(&mut self, suggested: &str) -> Option<String>;
}

/// Host file-save mechanism.
pub trait SaveTarget {
    /// Persists `contents` under `filename` and returns where it landed.
    fn save(&mut self, filename: &str, contents: &[u8]) -> anyhow::Result<PathBuf>;
}

/// Writes exports into a directory; absolute filenames are used as-is.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    root: PathBuf,
}

impl DirectoryTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, filename: &str, contents: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.root.join(filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ExportAction {
    default_stem: String,
    extension: String,
}

impl ExportAction {
    pub fn new(default_stem: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            default_stem: default_stem.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn default_stem(&self) -> &str {
        &self.default_stem
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Appends the export extension unless `name` already carries it.
    /// Trailing dots are dropped first.
    pub fn ensure_extension(&self, name: &str) -> String {
        let name = name.trim_end_matches('.');
        let has_extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false);
        if has_extension {
            name.to_string()
        } else {
            format!("{name}.{}", self.extension)
        }
    }

    /// Prompts for a name and saves `text` under it. Returns `Ok(None)` when
    /// the prompt was cancelled; nothing is written in that case.
    pub fn run<P, T>(
        &self,
        text: &str,
        prompt: &mut P,
        target: &mut T,
    ) -> Result<Option<ExportedFile>, ExportError>
    where
        P: FilenamePrompt + ?Sized,
        T: SaveTarget + ?Sized,
    {
        let Some(answer) = prompt.prompt(&self.default_stem) else {
            tracing::debug!("export cancelled");
            return Ok(None);
        };
        let answer = answer.trim().trim_end_matches('.');
        let stem = if answer.is_empty() {
            self.default_stem.as_str()
        } else {
            answer
        };
        let filename = self.ensure_extension(stem);
        let path = target
            .save(&filename, text.as_bytes())
            .map_err(|source| ExportError::Save {
                filename: filename.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = text.len(), "exported shader");
        Ok(Some(ExportedFile {
            filename,
            path,
            bytes: text.len(),
        }))
    }
}

impl Default for ExportAction {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_STEM, DEFAULT_EXPORT_EXTENSION)
    }
}
