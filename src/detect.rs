//! Input format detection.
//!
//! Only two inputs are accepted: PDF documents and plain text. Anything else
//! is rejected with [`Error::UnsupportedFormat`] before any parsing happens.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Supported input MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeType {
    /// `application/pdf`
    Pdf,
    /// `text/plain`
    PlainText,
}

impl MimeType {
    /// The canonical MIME string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Pdf => "application/pdf",
            MimeType::PlainText => "text/plain",
        }
    }

    /// Map a file extension (without the dot, any case) to a MIME type.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(MimeType::Pdf),
            "txt" | "text" => Ok(MimeType::PlainText),
            other => Err(Error::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// Map a path to a MIME type by its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// Guess the type from the leading bytes.
    ///
    /// Returns `None` when the data is neither a PDF nor valid UTF-8.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if is_pdf_bytes(data) {
            Some(MimeType::Pdf)
        } else if std::str::from_utf8(data).is_ok() {
            Some(MimeType::PlainText)
        } else {
            None
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = Error;

    /// Parse a MIME string, ignoring case and any `; parameter` suffix.
    fn from_str(s: &str) -> Result<Self> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("application/pdf") {
            Ok(MimeType::Pdf)
        } else if essence.eq_ignore_ascii_case("text/plain") {
            Ok(MimeType::PlainText)
        } else {
            Err(Error::UnsupportedFormat(s.trim().to_string()))
        }
    }
}

/// Check if bytes start with the PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    // Some producers emit junk before the header; readers accept it within
    // the first kilobyte.
    let window = &data[..data.len().min(1024)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mime() {
        assert_eq!("application/pdf".parse::<MimeType>().unwrap(), MimeType::Pdf);
        assert_eq!("TEXT/PLAIN".parse::<MimeType>().unwrap(), MimeType::PlainText);
        assert_eq!(
            "text/plain; charset=utf-8".parse::<MimeType>().unwrap(),
            MimeType::PlainText
        );
    }

    #[test]
    fn test_parse_unsupported_mime() {
        let result = "image/png".parse::<MimeType>();
        assert!(matches!(result, Err(Error::UnsupportedFormat(ref m)) if m == "image/png"));
        assert!("".parse::<MimeType>().is_err());
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(MimeType::from_extension("PDF").unwrap(), MimeType::Pdf);
        assert_eq!(MimeType::from_extension("txt").unwrap(), MimeType::PlainText);
        assert!(matches!(
            MimeType::from_extension("docx"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(MimeType::from_path("notes/a.pdf").unwrap(), MimeType::Pdf);
        assert!(MimeType::from_path("README").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mime in [MimeType::Pdf, MimeType::PlainText] {
            assert_eq!(mime.to_string().parse::<MimeType>().unwrap(), mime);
        }
    }

    #[test]
    fn test_sniff() {
        assert_eq!(MimeType::sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"), Some(MimeType::Pdf));
        assert_eq!(MimeType::sniff(b"just some notes"), Some(MimeType::PlainText));
        assert_eq!(MimeType::sniff(b"\xff\xfe\x00\xd8"), None);
    }

    #[test]
    fn test_pdf_header_after_junk() {
        assert!(is_pdf_bytes(b"\r\n\r\n%PDF-1.4"));
        assert!(!is_pdf_bytes(b"%PDF"));
        assert!(!is_pdf_bytes(b"<!DOCTYPE html>"));
    }
}
