//! # Private Files Provider
//!
//! Exposes an application's private storage directory to the host's document picker.
//!
//! The crate is a passive, read-only translation layer between two external systems:
//! the local filesystem and the host's document-listing protocol. It:
//!
//! - describes a single root for the application
//! - lists directory children as plain [`DocumentRecord`] values
//! - resolves MIME types from file extensions, falling back to content sniffing
//! - opens files read-only for content and thumbnail access
//!
//! Nothing is cached. Every query reads the filesystem afresh, and nothing is ever
//! written. Adapting records into the host's row format is left to the binding layer,
//! with [`columns`] providing projection support.
//!
//! ## Example Usage
//!
//! ```no_run
//! use privatefiles_provider::{DocumentsProvider, PrivateFilesProvider, ProviderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::new(
//!     "app.example.notes",
//!     "Notes",
//!     0,
//!     "/data/user/0/app.example.notes/files",
//! )?;
//! let provider = PrivateFilesProvider::new(config);
//!
//! for root in provider.query_roots()? {
//!     for child in provider.query_child_documents(&root.document_id)? {
//!         println!("{} ({})", child.display_name, child.mime_type);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod columns;
mod config;
mod constants;
mod contract;
pub mod mime;
mod provider;

pub use config::{ApplicationInfo, HostContext, NameNotFound, ProviderConfig};
pub use constants::{DEFAULT_APP_ICON, ROOT_ID_SUFFIX, ROOT_SUMMARY};
pub use contract::{
    AccessMode, AssetHandle, CancellationSignal, DocumentFlags, DocumentRecord,
    DocumentsProvider, RootFlags, RootRecord, SizeHint,
};
pub use privatefiles_types::{DocumentId, MimeType, TypesError};
pub use provider::PrivateFilesProvider;

/// Errors surfaced across the provider boundary
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The owning application's identity could not be resolved at startup
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// A document identifier does not correspond to a readable filesystem path
    #[error("Document not found: {id}: {source}")]
    NotFound {
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// The host passed an access mode string that is not recognised
    #[error("Invalid access mode: {0}")]
    InvalidMode(String),

    /// I/O error other than a missing path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value validation failed
    #[error("Invalid value: {0}")]
    Types(#[from] TypesError),
}

impl ProviderError {
    /// Maps an I/O error for `id`, keeping missing paths distinct from other failures.
    pub(crate) fn from_io(id: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                id: id.to_owned(),
                source,
            }
        } else {
            Self::Io(source)
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
