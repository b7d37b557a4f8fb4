//! Value types shared between the document provider and its host binding.
//!
//! Both types here are thin validated wrappers around `String`. They exist so that an
//! empty document identifier or a malformed media type can never reach the host's
//! listing protocol.

use std::path::Path;

/// MIME type reported for every directory entry.
pub const MIME_TYPE_DIR: &str = "vnd.android.document/directory";

/// MIME type reported when nothing more specific can be determined.
pub const MIME_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Errors that can occur when creating validated values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input was empty or contained only whitespace
    #[error("Value cannot be empty")]
    Empty,

    /// The input is not of the form `type/subtype`
    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),
}

/// Identifier of a document in the listing protocol.
///
/// An identifier is either the provider's root identifier or the absolute path of a
/// filesystem entry. Unlike most text values it is not trimmed, since file names may
/// begin or end with spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new `DocumentId`, rejecting empty or whitespace-only input.
    pub fn new(input: impl Into<String>) -> Result<Self, TypesError> {
        let value = input.into();
        if value.trim().is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(value))
    }

    /// Creates a `DocumentId` from a filesystem path.
    ///
    /// Non UTF-8 components are replaced lossily, matching how the host renders paths.
    pub fn from_path(path: &Path) -> Result<Self, TypesError> {
        Self::new(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the identifier as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DocumentId::new(s).map_err(serde::de::Error::custom)
    }
}

/// A media type of the form `type/subtype`, stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType(String);

impl MimeType {
    /// Creates a new `MimeType`.
    ///
    /// The input is trimmed and lowercased. Both the type and the subtype must be
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` for blank input and `TypesError::InvalidMimeType`
    /// when the `/` separator or either half is missing.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        match trimmed.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {
                Ok(Self(trimmed.to_ascii_lowercase()))
            }
            _ => Err(TypesError::InvalidMimeType(trimmed.to_owned())),
        }
    }

    /// The directory sentinel type.
    pub fn directory() -> Self {
        Self(MIME_TYPE_DIR.to_owned())
    }

    /// The generic binary fallback type.
    pub fn octet_stream() -> Self {
        Self(MIME_TYPE_OCTET_STREAM.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    pub fn is_directory(&self) -> bool {
        self.0 == MIME_TYPE_DIR
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MimeType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for MimeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for MimeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MimeType::new(s).map_err(serde::de::Error::custom)
    }
}
