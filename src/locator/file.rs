//! Filesystem lookup under a base directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{LocatorError, ResourceLocator};

/// Locator reading resources from files below a base directory.
///
/// The logical path `dev/application.yaml` maps to
/// `<base>/dev/application.yaml`. Absolute paths and `..` components are
/// rejected so lookups cannot escape the base directory.
#[derive(Debug, Clone)]
pub struct FileLocator {
    base_dir: PathBuf,
}

impl FileLocator {
    /// Creates a locator rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LocatorError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(LocatorError::InvalidPath {
                path: path.to_string(),
                reason: "must be relative and stay inside the base directory".to_string(),
            });
        }
        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl ResourceLocator for FileLocator {
    async fn find(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        let full_path = self.resolve(path)?;

        match tokio::fs::read(&full_path).await {
            Ok(bytes) => {
                tracing::trace!("Read {} bytes from {}", bytes.len(), full_path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LocatorError::Io {
                path: full_path,
                source: e,
            }),
        }
    }

    fn base_path(&self) -> String {
        format!("file:{}", self.base_dir.display())
    }
}
