use std::fs;
use std::path::{Path, PathBuf};

/// Artifact storage for rendered reports. Paths returned by `save` are the
/// same opaque strings later handed to `load`.
pub trait ReportStore: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;
    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("report storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("report artifact not found: {0}")]
    NotFound(String),
}

/// Flat-file store writing artifacts under a configured root directory.
#[derive(Debug, Clone)]
pub struct FileReportStore {
    root: PathBuf,
}

impl FileReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportStore for FileReportStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(filename);
        fs::write(&path, bytes)?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("readiness-ai-{tag}-{}", std::process::id()))
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = FileReportStore::new(scratch_dir("store"));
        let path = store.save("report.pdf", b"artifact").expect("save");
        assert_eq!(store.load(&path).expect("load"), b"artifact".to_vec());
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let store = FileReportStore::new(scratch_dir("missing"));
        let result = store.load("/nonexistent/readiness-ai-report.pdf");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
