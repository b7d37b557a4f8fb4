//! Column projection for host bindings.
//!
//! The host protocol exchanges rows keyed by column name. These helpers flatten a record
//! into the values for a requested projection, in projection order.

use crate::contract::{DocumentRecord, RootRecord};

pub const COLUMN_ROOT_ID: &str = "root_id";
pub const COLUMN_MIME_TYPES: &str = "mime_types";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_SUMMARY: &str = "summary";
pub const COLUMN_AVAILABLE_BYTES: &str = "available_bytes";

pub const COLUMN_DOCUMENT_ID: &str = "document_id";
pub const COLUMN_MIME_TYPE: &str = "mime_type";
pub const COLUMN_DISPLAY_NAME: &str = "_display_name";
pub const COLUMN_LAST_MODIFIED: &str = "last_modified";
pub const COLUMN_FLAGS: &str = "flags";
pub const COLUMN_SIZE: &str = "_size";
pub const COLUMN_ICON: &str = "icon";

/// Columns returned when the host asks for roots without a projection.
pub const DEFAULT_ROOT_PROJECTION: &[&str] = &[
    COLUMN_ROOT_ID,
    COLUMN_MIME_TYPES,
    COLUMN_FLAGS,
    COLUMN_ICON,
    COLUMN_TITLE,
    COLUMN_SUMMARY,
    COLUMN_DOCUMENT_ID,
    COLUMN_AVAILABLE_BYTES,
];

/// Columns returned for document queries without a projection.
pub const DEFAULT_DOCUMENT_PROJECTION: &[&str] = &[
    COLUMN_DOCUMENT_ID,
    COLUMN_MIME_TYPE,
    COLUMN_DISPLAY_NAME,
    COLUMN_LAST_MODIFIED,
    COLUMN_FLAGS,
    COLUMN_SIZE,
];

/// Columns returned for child listings, which also carry an icon.
pub const FIRST_LEVEL_PROJECTION: &[&str] = &[
    COLUMN_DOCUMENT_ID,
    COLUMN_DISPLAY_NAME,
    COLUMN_MIME_TYPE,
    COLUMN_ICON,
    COLUMN_FLAGS,
    COLUMN_LAST_MODIFIED,
    COLUMN_SIZE,
];

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Text(String),
}

impl ColumnValue {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn opt_integer(value: Option<impl Into<i64>>) -> Self {
        value.map_or(Self::Null, |v| Self::Integer(v.into()))
    }
}

impl RootRecord {
    /// Values of this record for `projection`. Unknown columns are `Null`.
    pub fn row(&self, projection: &[&str]) -> Vec<ColumnValue> {
        projection
            .iter()
            .map(|column| match *column {
                COLUMN_ROOT_ID => ColumnValue::text(self.root_id.as_str()),
                COLUMN_DOCUMENT_ID => ColumnValue::text(self.document_id.as_str()),
                COLUMN_FLAGS => ColumnValue::Integer(self.flags.bits().into()),
                COLUMN_ICON => ColumnValue::Integer(self.icon.into()),
                COLUMN_TITLE => ColumnValue::text(&self.title),
                COLUMN_SUMMARY => ColumnValue::text(&self.summary),
                COLUMN_MIME_TYPES => match &self.mime_types {
                    Some(types) => ColumnValue::text(types),
                    None => ColumnValue::Null,
                },
                COLUMN_AVAILABLE_BYTES => ColumnValue::opt_integer(
                    self.available_bytes
                        .map(|bytes| i64::try_from(bytes).unwrap_or(i64::MAX)),
                ),
                _ => ColumnValue::Null,
            })
            .collect()
    }
}

impl DocumentRecord {
    /// Values of this record for `projection`. Unknown columns are `Null`.
    pub fn row(&self, projection: &[&str]) -> Vec<ColumnValue> {
        projection
            .iter()
            .map(|column| match *column {
                COLUMN_DOCUMENT_ID => ColumnValue::text(self.document_id.as_str()),
                COLUMN_DISPLAY_NAME => ColumnValue::text(&self.display_name),
                COLUMN_MIME_TYPE => ColumnValue::text(self.mime_type.as_str()),
                COLUMN_FLAGS => ColumnValue::opt_integer(self.flags.map(|f| f.bits())),
                COLUMN_LAST_MODIFIED => ColumnValue::opt_integer(self.last_modified),
                COLUMN_SIZE => ColumnValue::opt_integer(
                    self.size.map(|size| i64::try_from(size).unwrap_or(i64::MAX)),
                ),
                COLUMN_ICON => ColumnValue::opt_integer(self.icon),
                _ => ColumnValue::Null,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{DocumentFlags, RootFlags};
    use privatefiles_types::{DocumentId, MimeType};

    fn sample_document() -> DocumentRecord {
        DocumentRecord {
            document_id: DocumentId::new("/data/app/files/photo.jpg").unwrap(),
            display_name: "photo.jpg".into(),
            mime_type: MimeType::new("image/jpeg").unwrap(),
            flags: Some(DocumentFlags::SUPPORTS_THUMBNAIL),
            last_modified: Some(1_700_000_000_000),
            size: Some(2048),
            icon: None,
        }
    }

    #[test]
    fn test_document_row_follows_projection_order() {
        let row = sample_document().row(DEFAULT_DOCUMENT_PROJECTION);

        assert_eq!(
            row,
            vec![
                ColumnValue::Text("/data/app/files/photo.jpg".into()),
                ColumnValue::Text("image/jpeg".into()),
                ColumnValue::Text("photo.jpg".into()),
                ColumnValue::Integer(1_700_000_000_000),
                ColumnValue::Integer(1),
                ColumnValue::Integer(2048),
            ]
        );
    }

    #[test]
    fn test_unset_and_unknown_columns_are_null() {
        let row = sample_document().row(&[COLUMN_ICON, "no_such_column"]);
        assert_eq!(row, vec![ColumnValue::Null, ColumnValue::Null]);
    }

    #[test]
    fn test_root_row() {
        let root = RootRecord {
            root_id: DocumentId::new("app.PrivateFilesProvider.ROOT").unwrap(),
            document_id: DocumentId::new("app.PrivateFilesProvider.ROOT").unwrap(),
            flags: RootFlags::LOCAL_ONLY | RootFlags::SUPPORTS_RECENTS,
            icon: 7,
            title: "App".into(),
            summary: "Private files".into(),
            mime_types: None,
            available_bytes: None,
        };

        let row = root.row(DEFAULT_ROOT_PROJECTION);
        assert_eq!(row.len(), DEFAULT_ROOT_PROJECTION.len());
        assert_eq!(row[1], ColumnValue::Null);
        assert_eq!(row[2], ColumnValue::Integer(6));
        assert_eq!(row[3], ColumnValue::Integer(7));
        assert_eq!(row[7], ColumnValue::Null);
    }
}
