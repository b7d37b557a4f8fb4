//! The document provider capability set and the records it returns.
//!
//! Records are plain values. The host binding turns them into whatever row format the
//! platform expects (see [`crate::columns`]).

use crate::{ProviderError, ProviderResult};
use privatefiles_types::{DocumentId, MimeType};
use serde::Serialize;
use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};

bitflags::bitflags! {
    /// Capabilities of a root. Bit values match the host protocol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RootFlags: u32 {
        const LOCAL_ONLY = 1 << 1;
        const SUPPORTS_RECENTS = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Capabilities of a document. Bit values match the host protocol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DocumentFlags: u32 {
        const SUPPORTS_THUMBNAIL = 1 << 0;
        const DIR_PREFERS_LAST_MODIFIED = 1 << 5;
    }
}

// Serialized as the raw bit values the host expects.
impl Serialize for RootFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl Serialize for DocumentFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

/// Description of the single storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootRecord {
    pub root_id: DocumentId,

    /// Identifier of the root's top-level document (equal to `root_id`)
    pub document_id: DocumentId,

    pub flags: RootFlags,

    /// Icon resource identifier
    pub icon: u32,

    pub title: String,
    pub summary: String,

    /// MIME type filter; unset, nothing is filtered
    pub mime_types: Option<String>,

    /// Free space; unset, no quota is reported
    pub available_bytes: Option<u64>,
}

/// Description of a single document: the root, the storage folder, or a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    pub display_name: String,
    pub mime_type: MimeType,
    pub flags: Option<DocumentFlags>,

    /// Milliseconds since the Unix epoch
    pub last_modified: Option<i64>,

    /// Byte length, files only
    pub size: Option<u64>,

    /// Icon resource identifier, set on first-level entries only
    pub icon: Option<u32>,
}

/// Access mode requested by the host when opening a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    WriteTruncate,
    WriteAppend,
    ReadWrite,
    ReadWriteTruncate,
}

impl AccessMode {
    pub fn is_read_only(self) -> bool {
        self == Self::Read
    }
}

impl std::str::FromStr for AccessMode {
    type Err = ProviderError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "r" => Ok(Self::Read),
            "w" => Ok(Self::Write),
            "wt" => Ok(Self::WriteTruncate),
            "wa" => Ok(Self::WriteAppend),
            "rw" => Ok(Self::ReadWrite),
            "rwt" => Ok(Self::ReadWriteTruncate),
            other => Err(ProviderError::InvalidMode(other.to_owned())),
        }
    }
}

/// Requested thumbnail dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeHint {
    pub width: u32,
    pub height: u32,
}

/// Cancellation token passed by the host.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    canceled: AtomicBool,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

/// A file handle together with the byte range the host should read.
#[derive(Debug)]
pub struct AssetHandle {
    pub file: File,
    pub start_offset: u64,

    /// `None` is the "unknown length" marker: read to end of file
    pub length: Option<u64>,
}

/// Operations a document provider offers to the host's document browser.
///
/// Calls may arrive concurrently from arbitrary threads. Handles returned by the
/// `open_*` methods are owned by the caller.
pub trait DocumentsProvider: Send + Sync {
    /// Lists the roots this provider exposes.
    fn query_roots(&self) -> ProviderResult<Vec<RootRecord>>;

    /// Describes a single document.
    fn query_document(&self, document_id: &DocumentId) -> ProviderResult<DocumentRecord>;

    /// Lists the direct children of a directory document.
    fn query_child_documents(
        &self,
        parent_document_id: &DocumentId,
    ) -> ProviderResult<Vec<DocumentRecord>>;

    /// Opens a document's content.
    fn open_document(
        &self,
        document_id: &DocumentId,
        mode: AccessMode,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<File>;

    /// Opens a thumbnail for a document that advertises `SUPPORTS_THUMBNAIL`.
    fn open_document_thumbnail(
        &self,
        document_id: &DocumentId,
        size_hint: SizeHint,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<AssetHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_match_host_protocol() {
        assert_eq!(RootFlags::LOCAL_ONLY.bits(), 2);
        assert_eq!(RootFlags::SUPPORTS_RECENTS.bits(), 4);
        assert_eq!(DocumentFlags::SUPPORTS_THUMBNAIL.bits(), 1);
        assert_eq!(DocumentFlags::DIR_PREFERS_LAST_MODIFIED.bits(), 32);
    }

    #[test]
    fn test_no_write_capabilities_are_defined() {
        assert_eq!(RootFlags::all().bits(), 0b110);
        assert_eq!(DocumentFlags::all().bits(), 0b10_0001);
    }

    #[test]
    fn test_access_mode_parsing() {
        assert_eq!("r".parse::<AccessMode>().unwrap(), AccessMode::Read);
        assert_eq!("rwt".parse::<AccessMode>().unwrap(), AccessMode::ReadWriteTruncate);
        assert!("r".parse::<AccessMode>().unwrap().is_read_only());
        assert!(!"rw".parse::<AccessMode>().unwrap().is_read_only());
        assert!(matches!(
            "x".parse::<AccessMode>(),
            Err(ProviderError::InvalidMode(m)) if m == "x"
        ));
    }

    #[test]
    fn test_cancellation_signal() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_canceled());
        signal.cancel();
        assert!(signal.is_canceled());
    }

    #[test]
    fn test_flags_serialize_as_bits() {
        let flags = RootFlags::LOCAL_ONLY | RootFlags::SUPPORTS_RECENTS;
        assert_eq!(serde_json::to_string(&flags).unwrap(), "6");
    }
}
