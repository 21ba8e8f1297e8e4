//! Charset negotiation for loading documents.
//!
//! Without an explicit label, input is decoded as UTF-8 and, failing that,
//! as GBK. An explicit label is used alone and never falls back.

use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8};
use tracing::debug;

use super::FileError;

/// Charsets tried, in order, when no encoding is requested.
pub fn fallback_order() -> [&'static Encoding; 2] {
    [UTF_8, GBK]
}

/// Resolves a WHATWG encoding label such as `utf-8` or `gbk`.
pub fn resolve_label(label: &str) -> Result<&'static Encoding, FileError> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes()).ok_or_else(|| FileError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Strictly decodes `bytes`; malformed input is an error, never replaced.
pub fn decode_text(
    bytes: &[u8],
    explicit: Option<&'static Encoding>,
    path: &Path,
) -> Result<(String, &'static Encoding), FileError> {
    let candidates: Vec<&'static Encoding> = match explicit {
        Some(encoding) => vec![encoding],
        None => fallback_order().to_vec(),
    };

    for encoding in &candidates {
        match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => return Ok((text.into_owned(), *encoding)),
            None => debug!(
                path = %path.display(),
                encoding = encoding.name(),
                "decode attempt failed"
            ),
        }
    }

    Err(FileError::Decode {
        path: path.display().to_string(),
        attempted: candidates.iter().map(|e| e.name()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use encoding_rs::{GBK, SHIFT_JIS, UTF_8};

    use super::{FileError, decode_text, resolve_label};

    #[test]
    fn utf8_is_tried_first() {
        let (text, used) = decode_text("héllo 世界".as_bytes(), None, Path::new("a.txt"))
            .expect("decode");
        assert_eq!(text, "héllo 世界");
        assert_eq!(used, UTF_8);
    }

    #[test]
    fn gbk_fallback_kicks_in_for_invalid_utf8() {
        let (bytes, _, had_errors) = GBK.encode("中文文本");
        assert!(!had_errors);
        assert!(std::str::from_utf8(&bytes).is_err());

        let (text, used) = decode_text(&bytes, None, Path::new("gbk.txt")).expect("decode");
        assert_eq!(text, "中文文本");
        assert_eq!(used, GBK);
    }

    #[test]
    fn both_attempts_are_reported_when_everything_fails() {
        let err = decode_text(&[0xff, 0xff, 0xff], None, Path::new("bad.bin")).unwrap_err();
        match err {
            FileError::Decode { attempted, path } => {
                assert_eq!(attempted, vec!["UTF-8", "GBK"]);
                assert_eq!(path, "bad.bin");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_encoding_does_not_fall_back() {
        let (bytes, _, _) = GBK.encode("中文");
        let err = decode_text(&bytes, Some(UTF_8), Path::new("x.txt")).unwrap_err();
        match err {
            FileError::Decode { attempted, .. } => assert_eq!(attempted, vec!["UTF-8"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_encoding_is_used_verbatim() {
        let (bytes, _, _) = SHIFT_JIS.encode("テキスト");
        let (text, used) =
            decode_text(&bytes, Some(SHIFT_JIS), Path::new("sjis.txt")).expect("decode");
        assert_eq!(text, "テキスト");
        assert_eq!(used, SHIFT_JIS);
    }

    #[test]
    fn labels_resolve_case_insensitively() {
        assert_eq!(resolve_label(" GBK ").expect("gbk"), GBK);
        assert_eq!(resolve_label("utf8").expect("utf8"), UTF_8);
        assert!(matches!(
            resolve_label("klingon"),
            Err(FileError::UnknownEncoding { label }) if label == "klingon"
        ));
    }
}
