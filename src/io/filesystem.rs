use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

use super::encoding::{decode_text, resolve_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EolStyle {
    #[default]
    Lf,
    Crlf,
}

#[derive(Debug, Clone)]
pub struct FileData {
    pub text: String,
    pub eol: EolStyle,
    pub encoding: &'static Encoding,
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed reading file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed listing directory {path}: {source}")]
    List {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path} (tried {})", .attempted.join(", "))]
    Decode {
        path: String,
        attempted: Vec<&'static str>,
    },
    #[error("unknown encoding {label:?}")]
    UnknownEncoding { label: String },
}

/// Reads and decodes a document. A blank `encoding` label means automatic.
pub fn load_document(path: &Path, encoding: Option<&str>) -> Result<FileData, FileError> {
    let explicit = encoding
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(resolve_label)
        .transpose()?;
    let bytes = fs::read(path).map_err(|source| FileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let (raw, encoding) = decode_text(&bytes, explicit, path)?;
    let eol = detect_eol(&raw);
    let text = raw.replace("\r\n", "\n");
    Ok(FileData {
        text,
        eol,
        encoding,
    })
}

/// Writes `text` as UTF-8 using the given line endings.
pub fn save_document(path: &Path, text: &str, eol: EolStyle) -> Result<(), FileError> {
    let out = match eol {
        EolStyle::Lf => text.to_string(),
        EolStyle::Crlf => text.replace('\n', "\r\n"),
    };
    let (bytes, _, _) = UTF_8.encode(&out);
    fs::write(path, bytes).map_err(|source| FileError::Write {
        path: path.display().to_string(),
        source,
    })
}

pub fn detect_eol(content: &str) -> EolStyle {
    if content.contains("\r\n") {
        EolStyle::Crlf
    } else {
        EolStyle::Lf
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::{GBK, UTF_8};
    use tempfile::tempdir;

    use super::{EolStyle, FileError, detect_eol, load_document, save_document};

    #[test]
    fn eol_detection_and_preservation_work() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "a\r\nb\r\n").expect("write");
        let doc = load_document(&path, None).expect("load");
        assert_eq!(doc.eol, EolStyle::Crlf);
        assert_eq!(doc.text, "a\nb\n");

        save_document(&path, &doc.text, doc.eol).expect("save");
        let saved = std::fs::read_to_string(&path).expect("read");
        assert!(saved.contains("\r\n"));
        assert_eq!(detect_eol(&saved), EolStyle::Crlf);
    }

    #[test]
    fn saved_text_reloads_unchanged() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("round.txt");
        let text = "first line\nsecond — 第二行\n\nlast";
        save_document(&path, text, EolStyle::Lf).expect("save");

        let doc = load_document(&path, None).expect("load");
        assert_eq!(doc.text, text);
        assert_eq!(doc.encoding, UTF_8);
    }

    #[test]
    fn gbk_file_opens_through_fallback() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("legacy.txt");
        let (bytes, _, _) = GBK.encode("你好，世界");
        std::fs::write(&path, &bytes).expect("write");

        let doc = load_document(&path, None).expect("load");
        assert_eq!(doc.text, "你好，世界");
        assert_eq!(doc.encoding, GBK);
    }

    #[test]
    fn blank_label_means_automatic() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("legacy.txt");
        let (bytes, _, _) = GBK.encode("编码");
        std::fs::write(&path, &bytes).expect("write");

        let doc = load_document(&path, Some("  ")).expect("load");
        assert_eq!(doc.encoding, GBK);
    }

    #[test]
    fn unknown_label_fails_before_reading() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing.txt");
        let err = load_document(&missing, Some("nope")).unwrap_err();
        assert!(matches!(err, FileError::UnknownEncoding { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_document(&dir.path().join("absent.txt"), None).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn saving_into_missing_directory_is_a_write_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("no").join("such").join("dir.txt");
        let err = save_document(&path, "x", EolStyle::Lf).unwrap_err();
        assert!(matches!(err, FileError::Write { .. }));
    }
}
