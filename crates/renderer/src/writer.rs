//! Exporting encoded images into per-user directories.

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};
use render_common::{RenderError, RenderResult};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::render::RenderFormat;

/// File stem used by [`FileWriter::export`] when no name is given.
pub const DEFAULT_EXPORT_NAME: &str = "maze";

/// Well-known per-user locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StandardDirectory {
    #[default]
    Documents,
    Pictures,
    Desktop,
    Downloads,
    Home,
    Cache,
    Data,
    Config,
}

/// Where a [`StandardDirectory`] is looked up. Only the current user's
/// directories are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDomain {
    #[default]
    User,
}

impl StandardDirectory {
    /// Resolve the directory for `domain`, `None` if the platform has no
    /// such location.
    pub fn resolve(self, domain: SearchDomain) -> Option<PathBuf> {
        match domain {
            SearchDomain::User => self.resolve_user(),
        }
    }

    fn resolve_user(self) -> Option<PathBuf> {
        match self {
            StandardDirectory::Cache => BaseDirs::new().map(|d| d.cache_dir().to_path_buf()),
            StandardDirectory::Data => BaseDirs::new().map(|d| d.data_dir().to_path_buf()),
            StandardDirectory::Config => BaseDirs::new().map(|d| d.config_dir().to_path_buf()),
            StandardDirectory::Home => UserDirs::new().map(|d| d.home_dir().to_path_buf()),
            StandardDirectory::Documents => {
                UserDirs::new().and_then(|d| d.document_dir().map(Path::to_path_buf))
            }
            StandardDirectory::Pictures => {
                UserDirs::new().and_then(|d| d.picture_dir().map(Path::to_path_buf))
            }
            StandardDirectory::Desktop => {
                UserDirs::new().and_then(|d| d.desktop_dir().map(Path::to_path_buf))
            }
            StandardDirectory::Downloads => {
                UserDirs::new().and_then(|d| d.download_dir().map(Path::to_path_buf))
            }
        }
    }
}

/// Writes files below a computed directory, creating it up front.
#[derive(Debug, Clone)]
pub struct FileWriter {
    computed_path: PathBuf,
}

impl FileWriter {
    /// Resolve `directory` in `domain`, append `additional` and make sure the
    /// result exists.
    pub fn new(
        directory: StandardDirectory,
        domain: SearchDomain,
        additional: Option<&str>,
    ) -> RenderResult<Self> {
        let base = directory.resolve(domain).ok_or_else(|| {
            RenderError::DirectoryUnavailable(format!("{:?} in {:?} domain", directory, domain))
        })?;
        Self::with_base(base, additional)
    }

    /// Writer for the user's documents directory.
    pub fn documents(additional: Option<&str>) -> RenderResult<Self> {
        Self::new(StandardDirectory::Documents, SearchDomain::User, additional)
    }

    /// Writer rooted at an explicit directory.
    pub fn with_base(base: impl Into<PathBuf>, additional: Option<&str>) -> RenderResult<Self> {
        let mut computed_path = base.into();
        if let Some(additional) = additional.filter(|a| !a.is_empty()) {
            computed_path.push(additional);
        }

        fs::create_dir_all(&computed_path)?;
        debug!(path = %computed_path.display(), "Export directory ready");

        Ok(Self { computed_path })
    }

    pub fn computed_path(&self) -> &Path {
        &self.computed_path
    }

    /// Path of `<name>.<file_type>` inside the computed directory.
    pub fn file_path(&self, file_type: &str, name: Option<&str>) -> PathBuf {
        let name = name.unwrap_or(DEFAULT_EXPORT_NAME);
        self.computed_path.join(format!("{}.{}", name, file_type))
    }

    /// Write `data` as `<name>.<file_type>` and return the target path.
    ///
    /// Failures are logged, not returned; `None` data writes nothing.
    pub fn export(&self, file_type: &str, name: Option<&str>, data: Option<&[u8]>) -> PathBuf {
        let path = self.file_path(file_type, name);
        Self::write(&path, data);
        path
    }

    /// [`export`](FileWriter::export) with the extension taken from `format`.
    pub fn export_format(
        &self,
        format: RenderFormat,
        name: Option<&str>,
        data: Option<&[u8]>,
    ) -> PathBuf {
        self.export(format.extension(), name, data)
    }

    pub fn write(path: &Path, data: Option<&[u8]>) {
        let Some(data) = data else {
            return;
        };

        match fs::write(path, data) {
            Ok(()) => info!(path = %path.display(), bytes = data.len(), "Wrote file"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed to write file"),
        }
    }

    /// Write on tokio's blocking pool, then call `completion` whether or not
    /// the write succeeded. Must be called from within a tokio runtime.
    pub fn async_write<F>(path: PathBuf, data: Option<Vec<u8>>, completion: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            Self::write(&path, data.as_deref());
            completion();
        })
    }
}
