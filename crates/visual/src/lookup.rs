use std::path::{Path, PathBuf};

/// Environment variable holding extra resource directories, separated the
/// same way as `PATH`.
pub const RESOURCE_PATH_ENV: &str = "WAVEVISUAL_RESOURCE_PATH";

/// Make `uri` absolute relative to the directory of `asset_path`.
///
/// Absolute paths and `scheme://` URIs are returned unchanged. `asset_path`
/// may name the asset's file or its directory.
pub fn as_full_path(uri: &str, asset_path: &Path) -> PathBuf {
    if uri.is_empty() || uri.contains("://") || Path::new(uri).is_absolute() {
        return PathBuf::from(uri);
    }
    if asset_path.as_os_str().is_empty() {
        return PathBuf::from(uri);
    }
    let base = if asset_path.is_file() || asset_path.extension().is_some() {
        asset_path.parent().unwrap_or(asset_path)
    } else {
        asset_path
    };
    base.join(uri)
}

/// Locates resource files on disk.
#[derive(Debug, Clone, Default)]
pub struct FileLookup {
    search_paths: Vec<PathBuf>,
}

impl FileLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup with the directories from [`RESOURCE_PATH_ENV`].
    pub fn from_env() -> Self {
        let search_paths = std::env::var_os(RESOURCE_PATH_ENV)
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_paths }
    }

    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First existing file for `path`: the path itself, then each search
    /// directory joined with it (relative paths) or with its file name
    /// (absolute paths).
    pub fn find_file(&self, path: &Path) -> Option<PathBuf> {
        let path = path
            .to_str()
            .and_then(|s| s.strip_prefix("file://"))
            .map_or(path, Path::new);
        if path.as_os_str().is_empty() {
            return None;
        }
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        let tail = if path.is_absolute() {
            Path::new(path.file_name()?)
        } else {
            path
        };
        self.search_paths
            .iter()
            .map(|dir| dir.join(tail))
            .find(|candidate| candidate.is_file())
    }

    /// Resolve `uri` against the asset directory and look it up. An
    /// unresolvable file comes back as an empty path.
    pub fn resolve(&self, uri: &str, asset_path: &Path) -> PathBuf {
        let full = as_full_path(uri, asset_path);
        match self.find_file(&full) {
            Some(found) => found,
            None => {
                tracing::warn!(uri, path = %full.display(), "resource file not found");
                PathBuf::new()
            }
        }
    }
}
