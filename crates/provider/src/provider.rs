//! The filesystem-backed document provider.
//!
//! # Document Tree
//!
//! ```text
//! <package>.PrivateFilesProvider.ROOT     # virtual root, titled with the app name
//! └── /data/user/0/<package>              # storage directory, named after the package
//!     ├── files/
//!     ├── cache/
//!     └── shared_prefs/ …                 # everything below is read from disk
//! ```
//!
//! The root is a placeholder whose only child is the storage directory. Below that every
//! identifier is an absolute path, and every query reads the filesystem again.

use crate::config::{HostContext, ProviderConfig};
use crate::constants::ROOT_SUMMARY;
use crate::contract::{
    AccessMode, AssetHandle, CancellationSignal, DocumentFlags, DocumentRecord,
    DocumentsProvider, RootFlags, RootRecord, SizeHint,
};
use crate::{mime, ProviderError, ProviderResult};
use chrono::{DateTime, Utc};
use privatefiles_types::{DocumentId, MimeType};
use std::fs::{self, File, Metadata};
use std::path::{Path, PathBuf};

/// Read-only document provider over an application's private storage.
///
/// Holds only the configuration resolved at startup, so a single instance can serve
/// concurrent host calls.
#[derive(Debug, Clone)]
pub struct PrivateFilesProvider {
    config: ProviderConfig,
}

impl PrivateFilesProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Resolves the owning application through the host and builds the provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the application's identity cannot be
    /// resolved.
    pub fn from_host(host: &dyn HostContext) -> ProviderResult<Self> {
        ProviderConfig::resolve(host).map(Self::new)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn is_root(&self, document_id: &DocumentId) -> bool {
        document_id == self.config.root_id()
    }

    fn root_document(&self) -> DocumentRecord {
        DocumentRecord {
            document_id: self.config.root_id().clone(),
            display_name: self.config.app_name().to_owned(),
            mime_type: MimeType::directory(),
            flags: None,
            last_modified: None,
            size: None,
            icon: None,
        }
    }

    /// The single synthetic entry listed under the root.
    fn storage_folder(&self) -> ProviderResult<DocumentRecord> {
        Ok(DocumentRecord {
            document_id: DocumentId::from_path(self.config.storage_dir())?,
            display_name: self.config.package_name().to_owned(),
            mime_type: MimeType::directory(),
            flags: None,
            last_modified: None,
            size: None,
            icon: Some(self.config.app_icon()),
        })
    }

    fn list_directory(&self, parent_id: &DocumentId) -> ProviderResult<Vec<DocumentRecord>> {
        let parent = absolute_path(parent_id)?;
        let entries =
            fs::read_dir(&parent).map_err(|e| ProviderError::from_io(parent_id.as_str(), e))?;

        describe_entries(&parent, entries.map(|entry| entry.map(|entry| entry.path())))
    }
}

impl DocumentsProvider for PrivateFilesProvider {
    fn query_roots(&self) -> ProviderResult<Vec<RootRecord>> {
        Ok(vec![RootRecord {
            root_id: self.config.root_id().clone(),
            document_id: self.config.root_id().clone(),
            flags: RootFlags::LOCAL_ONLY | RootFlags::SUPPORTS_RECENTS,
            icon: self.config.app_icon(),
            title: self.config.app_name().to_owned(),
            summary: ROOT_SUMMARY.to_owned(),
            mime_types: None,
            available_bytes: None,
        }])
    }

    fn query_document(&self, document_id: &DocumentId) -> ProviderResult<DocumentRecord> {
        tracing::debug!("query document {}", document_id);
        if self.is_root(document_id) {
            return Ok(self.root_document());
        }

        let path = absolute_path(document_id)?;
        let metadata =
            fs::metadata(&path).map_err(|e| ProviderError::from_io(document_id.as_str(), e))?;
        describe(&path, &metadata)
    }

    fn query_child_documents(
        &self,
        parent_document_id: &DocumentId,
    ) -> ProviderResult<Vec<DocumentRecord>> {
        tracing::debug!("query children of {}", parent_document_id);
        if self.is_root(parent_document_id) {
            return Ok(vec![self.storage_folder()?]);
        }
        self.list_directory(parent_document_id)
    }

    fn open_document(
        &self,
        document_id: &DocumentId,
        mode: AccessMode,
        _signal: Option<&CancellationSignal>,
    ) -> ProviderResult<File> {
        if !mode.is_read_only() {
            tracing::debug!("opening {} read-only despite mode {:?}", document_id, mode);
        }
        self.open_read_only(document_id)
    }

    fn open_document_thumbnail(
        &self,
        document_id: &DocumentId,
        _size_hint: SizeHint,
        _signal: Option<&CancellationSignal>,
    ) -> ProviderResult<AssetHandle> {
        let file = self.open_read_only(document_id)?;
        Ok(AssetHandle {
            file,
            start_offset: 0,
            length: None,
        })
    }
}

impl PrivateFilesProvider {
    /// Opens a document for reading. Any failure to open is reported as not found.
    fn open_read_only(&self, document_id: &DocumentId) -> ProviderResult<File> {
        if self.is_root(document_id) {
            return Err(ProviderError::NotFound {
                id: document_id.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "the root has no content",
                ),
            });
        }

        let path = absolute_path(document_id)?;
        File::open(&path).map_err(|source| ProviderError::NotFound {
            id: document_id.to_string(),
            source,
        })
    }
}

/// Absolute form of an identifier, rebuilt from its components so that redundant and
/// trailing separators do not produce a second identifier for the same entry.
fn absolute_path(document_id: &DocumentId) -> ProviderResult<PathBuf> {
    let path = std::path::absolute(document_id.as_path())
        .map_err(|e| ProviderError::from_io(document_id.as_str(), e))?;
    Ok(path.components().collect())
}

/// Describes each listed path. Entries that cannot be read are logged and skipped.
fn describe_entries(
    parent: &Path,
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
) -> ProviderResult<Vec<DocumentRecord>> {
    let mut records = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", parent.display(), e);
                continue;
            }
        };

        // Broken symlinks are listed with the link's own metadata.
        let metadata = match fs::metadata(&path).or_else(|_| fs::symlink_metadata(&path)) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("skipping {} while listing: {}", path.display(), e);
                continue;
            }
        };
        records.push(describe(&path, &metadata)?);
    }
    Ok(records)
}

/// Builds the descriptor for a filesystem entry.
fn describe(path: &Path, metadata: &Metadata) -> ProviderResult<DocumentRecord> {
    let mime_type = mime::resolve(path, metadata);

    // Image entries advertise thumbnails, everything else only the sort preference.
    let flags = if mime_type.is_image() {
        DocumentFlags::SUPPORTS_THUMBNAIL
    } else {
        DocumentFlags::DIR_PREFERS_LAST_MODIFIED
    };

    let (last_modified, size) = if metadata.is_dir() {
        (None, None)
    } else {
        (Some(modified_millis(metadata)), Some(metadata.len()))
    };

    Ok(DocumentRecord {
        document_id: DocumentId::from_path(path)?,
        display_name: display_name(path),
        mime_type,
        flags: Some(flags),
        last_modified,
        size,
        icon: None,
    })
}

/// Final path component, `..` included.
fn display_name(path: &Path) -> String {
    path.components()
        .next_back()
        .map_or(path.as_os_str(), |component| component.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Modification time in milliseconds since the epoch, `0` where the platform has none.
fn modified_millis(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .map(|time| DateTime::<Utc>::from(time).timestamp_millis())
        .unwrap_or(0)
}
