use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use playground::{DirectoryTarget, FilenamePrompt, SaveTarget};
use renderer::ExportHandlers;

/// Directory shared between the save dialog and the writer; the dialog moves
/// it to wherever the user navigated.
#[derive(Debug, Clone)]
pub struct ExportDirectory(Rc<RefCell<PathBuf>>);

impl ExportDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Rc::new(RefCell::new(path.into())))
    }

    pub fn get(&self) -> PathBuf {
        self.0.borrow().clone()
    }

    pub fn set(&self, path: &Path) {
        *self.0.borrow_mut() = path.to_path_buf();
    }
}

/// Native save dialog.
pub struct DialogPrompt {
    directory: ExportDirectory,
    extension: String,
}

impl DialogPrompt {
    pub fn new(directory: ExportDirectory, extension: &str) -> Self {
        Self {
            directory,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

impl FilenamePrompt for DialogPrompt {
    fn prompt(&mut self, suggested: &str) -> Option<String> {
        let picked = rfd::FileDialog::new()
            .set_title("Export shader")
            .set_directory(self.directory.get())
            .set_file_name(suggested)
            .add_filter("Fragment shader", &[self.extension.as_str()])
            .save_file()?;
        if let Some(parent) = picked.parent() {
            self.directory.set(parent);
        }
        picked
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Writes into whatever directory the dialog last settled on.
pub struct ChosenDirectoryTarget {
    directory: ExportDirectory,
}

impl ChosenDirectoryTarget {
    pub fn new(directory: ExportDirectory) -> Self {
        Self { directory }
    }
}

impl SaveTarget for ChosenDirectoryTarget {
    fn save(&mut self, filename: &str, contents: &[u8]) -> anyhow::Result<PathBuf> {
        DirectoryTarget::new(self.directory.get()).save(filename, contents)
    }
}

pub fn dialog_handlers(directory: PathBuf, extension: &str) -> ExportHandlers {
    let directory = ExportDirectory::new(directory);
    ExportHandlers {
        prompt: Box::new(DialogPrompt::new(directory.clone(), extension)),
        target: Box::new(ChosenDirectoryTarget::new(directory)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn target_follows_the_shared_directory() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let directory = ExportDirectory::new(first.path());
        let mut target = ChosenDirectoryTarget::new(directory.clone());

        let path = target.save("a.frag", b"void main() {}").unwrap();
        assert_eq!(path, first.path().join("a.frag"));

        directory.set(second.path());
        let path = target.save("b.frag", b"x").unwrap();
        assert_eq!(path, second.path().join("b.frag"));
        assert_eq!(std::fs::read(path).unwrap(), b"x");
    }
}
