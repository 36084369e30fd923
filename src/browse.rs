use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error raised by the directory listing utility.
#[derive(Debug)]
pub enum BrowseError {
    /// The requested path is not under any permitted root.
    InvalidDirectory(PathBuf),

    /// Filesystem failure while reading the directory.
    Io(io::Error),
}

impl fmt::Display for BrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseError::InvalidDirectory(path) =>
                write!(f, "invalid directory: {}", path.display()),
            BrowseError::Io(err) =>
                write!(f, "directory read failed: {}", err),
        }
    }
}

impl std::error::Error for BrowseError {}

impl From<io::Error> for BrowseError {
    fn from(err: io::Error) -> Self {
        BrowseError::Io(err)
    }
}

/// Options for one directory enumeration.
#[derive(Debug, Clone, Default)]
pub struct EnumerationOptions {
    /// Include entries whose name starts with a dot.
    pub include_hidden: bool,
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Lists directories and files under a set of permitted roots.
///
/// Any request outside the roots fails with
/// [`BrowseError::InvalidDirectory`] before touching the filesystem.
pub struct DirectoryBrowser {
    allowed_roots: Vec<PathBuf>,
}

impl DirectoryBrowser {
    pub fn new(allowed_roots: Vec<PathBuf>) -> Self {
        Self { allowed_roots }
    }

    /// List child directories of `parent`, sorted by name.
    pub async fn list_directories(
        &self,
        parent: &Path,
        options: &EnumerationOptions,
    ) -> Result<Vec<DirEntryInfo>, BrowseError> {
        self.list_entries(parent, options, true).await
    }

    /// List files directly under `parent`, sorted by name.
    pub async fn list_files(
        &self,
        parent: &Path,
        options: &EnumerationOptions,
    ) -> Result<Vec<DirEntryInfo>, BrowseError> {
        self.list_entries(parent, options, false).await
    }

    fn check_allowed(&self, parent: &Path) -> Result<(), BrowseError> {
        if self.allowed_roots.iter().any(|root| parent.starts_with(root)) {
            Ok(())
        } else {
            Err(BrowseError::InvalidDirectory(parent.to_path_buf()))
        }
    }

    async fn list_entries(
        &self,
        parent: &Path,
        options: &EnumerationOptions,
        directories: bool,
    ) -> Result<Vec<DirEntryInfo>, BrowseError> {
        self.check_allowed(parent)?;

        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(parent).await?;

        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() != directories {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !options.include_hidden && name.starts_with('.') {
                continue;
            }

            entries.push(DirEntryInfo {
                path: entry.path(),
                name,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
