//! Text decoding with an ordered encoding trial list / 按顺序尝试编码解码

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{Result, SearchError};

/// Trial order: UTF-8, GBK, GB2312, Latin-1 / 候选编码顺序
///
/// encoding_rs has no separate GB2312 decoder; GB2312 is a subset of GB18030.
/// Latin-1 is decoded as windows-1252, which accepts every byte.
pub fn candidates() -> [(&'static str, &'static Encoding); 4] {
    [
        ("utf-8", encoding_rs::UTF_8),
        ("gbk", encoding_rs::GBK),
        ("gb2312", encoding_rs::GB18030),
        ("latin-1", encoding_rs::WINDOWS_1252),
    ]
}

/// Decodes `bytes` with the first candidate that accepts them without
/// replacement; returns the text and the label that won.
pub fn decode_with(
    bytes: &[u8],
    candidates: &[(&'static str, &'static Encoding)],
) -> Option<(String, &'static str)> {
    for &(label, encoding) in candidates {
        if encoding == encoding_rs::UTF_8 {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            if let Ok(s) = std::str::from_utf8(body) {
                return Some((s.to_string(), label));
            }
            continue;
        }
        if let Some(s) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return Some((s.into_owned(), label));
        }
    }
    None
}

/// Reads and decodes a whole file / 读取并解码文件
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match decode_with(&bytes, &candidates()) {
        Some((text, label)) => {
            if label != "utf-8" {
                tracing::debug!("Decoded {} as {}", path.display(), label);
            }
            Ok(text)
        }
        None => Err(SearchError::DecodeFailed(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBFhello".to_vec();
        assert_eq!(decode_with(&bytes, &candidates()), Some(("hello".to_string(), "utf-8")));
    }

    #[test]
    fn test_gbk_fallback() {
        let (encoded, _, _) = encoding_rs::GBK.encode("第1集 你好");
        let (text, label) = decode_with(&encoded, &candidates()).unwrap();
        assert_eq!(text, "第1集 你好");
        assert_eq!(label, "gbk");
    }

    #[test]
    fn test_latin1_last_resort() {
        // 0xFF is invalid as a GBK lead byte and as UTF-8
        let (text, label) = decode_with(b"caf\xE9 \xFF", &candidates()).unwrap();
        assert_eq!(label, "latin-1");
        assert!(text.starts_with("café"));
    }

    #[test]
    fn test_decode_failed_when_no_candidate_fits() {
        assert!(decode_with(b"\xFF\xFE\xFD", &[("utf-8", encoding_rs::UTF_8)]).is_none());
    }

    #[test]
    fn test_read_text_missing_file_is_io_error() {
        let err = read_text(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
