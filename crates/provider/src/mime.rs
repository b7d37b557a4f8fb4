//! MIME type resolution for filesystem entries.
//!
//! Resolution order for a regular file:
//!
//! 1. If the name has a usable extension, look it up in the extension table. A miss
//!    returns `application/octet-stream` directly; the content is not inspected.
//! 2. If the name has no usable extension, sniff the leading bytes of the file.
//! 3. Otherwise fall back to `application/octet-stream`.
//!
//! An extension is usable when the last `.` is not the first character of the name and
//! is followed by at least two characters. `.bashrc` and `notes.c` have none.

use crate::constants::SNIFF_LIMIT_BYTES;
use privatefiles_types::MimeType;
use std::fs::{File, Metadata};
use std::io::{BufReader, Read};
use std::path::Path;

/// Leading markup recognised by the platform's content-type guesser. Tags match in
/// all-lowercase or all-uppercase only.
const HTML_PREFIXES: &[&[u8]] = &[
    b"<!", b"<html", b"<head", b"<body", b"<HTML", b"<HEAD", b"<BODY",
];
const XML_PREFIX: &[u8] = b"<?xml ";

/// `<?x` behind each byte order mark, in that encoding.
const XML_WITH_BOM: &[&[u8]] = &[
    b"\xEF\xBB\xBF<?x",
    b"\xFE\xFF\0<\0?\0x",
    b"\xFF\xFE<\0?\0x\0",
    b"\0\0\xFE\xFF\0\0\0<\0\0\0?\0\0\0x",
    b"\xFF\xFE\0\0<\0\0\0?\0\0\0x\0\0\0",
];

/// Resolves the MIME type of the entry at `path`.
pub fn resolve(path: &Path, metadata: &Metadata) -> MimeType {
    if metadata.is_dir() {
        return MimeType::directory();
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    match extension_of(&name) {
        Some(extension) => from_extension(extension).unwrap_or_else(MimeType::octet_stream),
        None => sniff(path).unwrap_or_else(MimeType::octet_stream),
    }
}

/// Returns the usable extension of a file name, without the dot.
pub fn extension_of(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }

    let extension = &name[dot + 1..];
    if extension.chars().count() < 2 {
        return None;
    }
    Some(extension)
}

/// Looks up an extension in the extension table, ignoring case.
pub fn from_extension(extension: &str) -> Option<MimeType> {
    let mime = mime_guess::from_ext(&extension.to_lowercase()).first()?;
    MimeType::new(mime.essence_str()).ok()
}

/// Guesses a MIME type from the leading bytes of the file at `path`.
///
/// I/O errors are logged and reported as `None`. The file is closed before returning.
pub fn sniff(path: &Path) -> Option<MimeType> {
    match read_leading_bytes(path) {
        Ok(head) => sniff_bytes(&head),
        Err(e) => {
            tracing::warn!("failed to sniff content type of {}: {}", path.display(), e);
            None
        }
    }
}

/// Guesses a MIME type from a buffer of leading bytes.
pub fn sniff_bytes(head: &[u8]) -> Option<MimeType> {
    if let Some(mime) = sniff_markup(head) {
        return Some(mime);
    }

    // Text matchers are skipped: markup is only recognised by the rules above.
    infer::get(head)
        .filter(|kind| !matches!(kind.matcher_type(), infer::MatcherType::Text))
        .and_then(|kind| MimeType::new(kind.mime_type()).ok())
}

fn read_leading_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::new();
    BufReader::new(file)
        .take(SNIFF_LIMIT_BYTES)
        .read_to_end(&mut head)?;
    Ok(head)
}

fn sniff_markup(head: &[u8]) -> Option<MimeType> {
    if HTML_PREFIXES.iter().any(|prefix| head.starts_with(prefix)) {
        return MimeType::new("text/html").ok();
    }
    if head.starts_with(XML_PREFIX) || XML_WITH_BOM.iter().any(|prefix| head.starts_with(prefix))
    {
        return MimeType::new("application/xml").ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn resolve_file(dir: &TempDir, name: &str, content: &[u8]) -> MimeType {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        let metadata = fs::metadata(&path).unwrap();
        resolve(&path, &metadata)
    }

    #[test]
    fn test_extension_rules() {
        assert_eq!(extension_of("photo.JPG"), Some("JPG"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("data"), None);
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("notes.c"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("a.md"), Some("md"));
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(from_extension("JPG").unwrap().as_str(), "image/jpeg");
        assert_eq!(from_extension("png").unwrap().as_str(), "image/png");
        assert!(from_extension("zzqqxx").is_none());
    }

    #[test]
    fn test_known_extension_wins_over_content() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_file(&dir, "photo.JPG", b"not a jpeg").as_str(), "image/jpeg");
        assert_eq!(resolve_file(&dir, "notes.txt", PNG_HEADER).as_str(), "text/plain");
    }

    #[test]
    fn test_unknown_extension_does_not_sniff() {
        let dir = TempDir::new().unwrap();
        let mime = resolve_file(&dir, "image.zzqqxx", PNG_HEADER);
        assert_eq!(mime.as_str(), "application/octet-stream");
    }

    #[test]
    fn test_dotfile_is_sniffed() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_file(&dir, ".bashrc", PNG_HEADER).as_str(), "image/png");
    }

    #[test]
    fn test_short_extension_is_sniffed() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_file(&dir, "thumb.p", PNG_HEADER).as_str(), "image/png");
    }

    #[test]
    fn test_unsniffable_content_falls_back() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_file(&dir, "data", b"").as_str(),
            "application/octet-stream"
        );
        assert_eq!(
            resolve_file(&dir, ".profile", b"export PATH=/usr/bin\n").as_str(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_markup_sniffing() {
        assert_eq!(
            sniff_bytes(b"<?xml version=\"1.0\"?><a/>").unwrap().as_str(),
            "application/xml"
        );
        assert_eq!(
            sniff_bytes(b"\xEF\xBB\xBF<?xml version=\"1.0\"?>").unwrap().as_str(),
            "application/xml"
        );
        assert_eq!(
            sniff_bytes(b"\xFF\xFE<\0?\0x\0m\0l\0").unwrap().as_str(),
            "application/xml"
        );
        assert_eq!(sniff_bytes(b"<!DOCTYPE html>").unwrap().as_str(), "text/html");
        assert_eq!(sniff_bytes(b"<HTML><BODY>").unwrap().as_str(), "text/html");
        assert_eq!(sniff_bytes(b"<body>").unwrap().as_str(), "text/html");
    }

    #[test]
    fn test_markup_outside_guesser_rules_falls_back() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [
            ("title", &b"<title>x"[..]),
            ("mixed", &b"<HtMl>"[..]),
            ("bare-xml", &b"<?xml?>"[..]),
            ("upper-xml", &b"<?XML version=\"1.0\"?>"[..]),
            ("script", &b"<script>alert(1)</script>"[..]),
            ("shebang", &b"#!/bin/sh\necho hi\n"[..]),
        ] {
            assert_eq!(
                resolve_file(&dir, name, content).as_str(),
                "application/octet-stream",
                "{name}"
            );
        }
    }

    #[test]
    fn test_sniff_io_error_is_swallowed() {
        let dir = TempDir::new().unwrap();
        assert!(sniff(&dir.path().join("missing")).is_none());
    }

    #[test]
    fn test_directory_is_sentinel() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("photos.jpg");
        fs::create_dir(&sub).unwrap();
        let metadata = fs::metadata(&sub).unwrap();
        assert!(resolve(&sub, &metadata).is_directory());
    }
}
