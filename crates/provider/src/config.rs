//! Provider configuration.
//!
//! Everything the provider needs to know about its owning application is resolved once at
//! startup and then held immutably. Queries never go back to the host for identity
//! information, so the provider can serve concurrent calls without locking.

use crate::constants::{DEFAULT_APP_ICON, ROOT_ID_SUFFIX};
use crate::{ProviderError, ProviderResult};
use privatefiles_types::DocumentId;
use std::path::{Path, PathBuf};

/// What the host reports about the owning application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// User-visible application label
    pub label: String,

    /// Icon resource identifier, `0` when the application declares none
    pub icon: u32,

    /// The application's private files directory
    pub files_dir: PathBuf,
}

/// Returned by a [`HostContext`] that does not know the requested package.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("package not found: {0}")]
pub struct NameNotFound(pub String);

/// Access to the host's package manager during initialisation.
pub trait HostContext {
    /// Namespace of the application the provider runs in.
    fn package_name(&self) -> &str;

    /// Looks up the installed application for `package_name`.
    fn application_info(&self, package_name: &str) -> Result<ApplicationInfo, NameNotFound>;
}

/// Provider configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    package_name: String,
    root_id: DocumentId,
    app_name: String,
    app_icon: u32,
    storage_dir: PathBuf,
}

impl ProviderConfig {
    /// Create a new `ProviderConfig`.
    ///
    /// `app_icon == 0` selects the platform default icon. The exposed storage directory is
    /// the parent of `files_dir`, made absolute.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the package name is blank or `files_dir`
    /// has no parent directory.
    pub fn new(
        package_name: impl Into<String>,
        app_name: impl Into<String>,
        app_icon: u32,
        files_dir: impl AsRef<Path>,
    ) -> ProviderResult<Self> {
        let package_name = package_name.into();
        if package_name.trim().is_empty() {
            return Err(ProviderError::Unavailable(
                "package name cannot be empty".into(),
            ));
        }

        let storage_dir = storage_dir_for(files_dir.as_ref())?;
        let root_id = DocumentId::new(format!("{package_name}{ROOT_ID_SUFFIX}"))?;
        let app_icon = if app_icon == 0 {
            DEFAULT_APP_ICON
        } else {
            app_icon
        };

        Ok(Self {
            package_name,
            root_id,
            app_name: app_name.into(),
            app_icon,
            storage_dir,
        })
    }

    /// Resolves the configuration from the host's package manager.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` when the host does not know its own package.
    /// The provider reports itself unavailable rather than guessing an identity.
    pub fn resolve(host: &dyn HostContext) -> ProviderResult<Self> {
        let package_name = host.package_name();
        let info = host.application_info(package_name).map_err(|e| {
            tracing::error!("failed to resolve application identity: {}", e);
            ProviderError::Unavailable(e.to_string())
        })?;

        Self::new(package_name, info.label, info.icon, &info.files_dir).inspect_err(|e| {
            tracing::error!("invalid application identity for {}: {}", package_name, e);
        })
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn root_id(&self) -> &DocumentId {
        &self.root_id
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn app_icon(&self) -> u32 {
        self.app_icon
    }

    /// The directory exposed as the single child of the root.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn storage_dir_for(files_dir: &Path) -> ProviderResult<PathBuf> {
    let files_dir: PathBuf = std::path::absolute(files_dir)?.components().collect();
    match files_dir.parent() {
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(ProviderError::Unavailable(format!(
            "files directory has no parent: {}",
            files_dir.display()
        ))),
    }
}
