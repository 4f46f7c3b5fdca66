//! Source decoding following PEP 263 coding declarations.
//!
//! A file is UTF-8 unless a `coding[:=]<name>` comment on one of its first
//! two lines says otherwise. The declared encoding is kept so the sorted text
//! can be written back in it.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::errors::{Result, SortError};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

static CODING_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)^[ \t\x0c]*#.*?coding[:=][ \t]*([-\w.]+)").expect("coding declaration regex")
});
static BLANK_OR_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)^[ \t\x0c]*(?:[#\r\n]|$)").expect("blank line regex"));

/// Decoded file text together with the encoding it was stored in.
#[derive(Debug)]
pub struct SourceText<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}

impl SourceText<'_> {
    /// Encode `text` back into this file's encoding.
    pub fn encode<'t>(&self, text: &'t str, path: &Path) -> Result<Cow<'t, [u8]>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(SortError::consistency(
                path,
                format!("sorted text is not representable in {}", self.encoding.name()),
            ));
        }
        Ok(bytes)
    }
}

/// Encoding name declared on the first two lines, if any.
///
/// The second line is only considered when the first is blank or a
/// comment.
pub fn coding_declaration(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut lines = bytes.split_inclusive(|&b| b == b'\n');

    let first = lines.next()?;
    if let Some(name) = declared_name(first) {
        return Some(name);
    }
    if !BLANK_OR_COMMENT.is_match(first) {
        return None;
    }
    lines.next().and_then(declared_name)
}

fn declared_name(line: &[u8]) -> Option<String> {
    CODING_DECLARATION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|name| String::from_utf8_lossy(name.as_bytes()).into_owned())
}

/// Map a declared name to an encoding that can also be written back.
///
/// Python's spellings (`latin-1`, `utf_8`, `utf-8-unix`) are folded onto
/// the labels encoding_rs knows.
fn lookup(name: &str) -> Option<&'static Encoding> {
    let label = name.to_ascii_lowercase().replace('_', "-");
    let label = if label == "utf-8" || label.starts_with("utf-8-") {
        "utf-8".to_string()
    } else if ["latin-1", "iso-latin-1", "iso-8859-1"]
        .iter()
        .any(|alias| label == *alias || label.starts_with(&format!("{alias}-")))
    {
        "iso-8859-1".to_string()
    } else {
        label
    };

    Encoding::for_label(label.as_bytes())
        .or_else(|| Encoding::for_label(label.replace('-', "").as_bytes()))
        .filter(|encoding| encoding.output_encoding() == *encoding)
}

/// Decode raw file contents according to the file's coding declaration.
pub fn decode_source<'a>(bytes: &'a [u8], path: &Path) -> Result<SourceText<'a>> {
    let encoding = match coding_declaration(bytes) {
        Some(name) => lookup(&name).ok_or_else(|| SortError::UnknownEncoding {
            path: path.to_path_buf(),
            encoding: name.clone(),
        })?,
        None => UTF_8,
    };

    if bytes.starts_with(UTF8_BOM) && encoding != UTF_8 {
        return Err(SortError::Decoding {
            path: path.to_path_buf(),
            detail: format!("byte order mark contradicts coding {}", encoding.name()),
        });
    }

    let text = if encoding == UTF_8 {
        std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| SortError::Decoding {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?
    } else {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| SortError::Decoding {
                path: path.to_path_buf(),
                detail: format!("invalid {} data", encoding.name()),
            })?
    };
    Ok(SourceText { text, encoding })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declaration_on_first_or_second_line() {
        assert_eq!(
            coding_declaration(b"# -*- coding: latin-1 -*-\nx = 1\n").as_deref(),
            Some("latin-1")
        );
        assert_eq!(
            coding_declaration(b"#!/usr/bin/env python\n# vim: set fileencoding=cp1252 :\n")
                .as_deref(),
            Some("cp1252")
        );
        assert_eq!(coding_declaration(b"x = 1\n# coding: latin-1\n"), None);
        assert_eq!(coding_declaration(b"x = 1\n"), None);
        assert_eq!(coding_declaration(b"\n\n# coding: latin-1\n"), None);
    }

    #[test]
    fn test_python_spellings_are_recognised() {
        assert_eq!(lookup("latin-1"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(lookup("ISO_8859_1"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(lookup("utf-8-unix"), Some(UTF_8));
        assert_eq!(lookup("utf_8"), Some(UTF_8));
        assert_eq!(lookup("iso-8859-15"), Some(encoding_rs::ISO_8859_15));
        assert_eq!(lookup("invalid-encoding"), None);
        assert_eq!(lookup("utf-16"), None);
    }

    #[test]
    fn test_latin1_source_round_trips() {
        let bytes = b"# -*- coding: latin-1 -*-\nname = '\xe9t\xe9'\n";
        let source = decode_source(bytes, Path::new("legacy.py")).unwrap();
        assert_eq!(source.text, "# -*- coding: latin-1 -*-\nname = '\u{e9}t\u{e9}'\n");

        let encoded = source.encode(&source.text, Path::new("legacy.py")).unwrap();
        assert_eq!(encoded.as_ref(), bytes);
    }

    #[test]
    fn test_unknown_encoding_is_reported() {
        let err = decode_source(b"# coding=invalid-encoding\n", Path::new("odd.py")).unwrap_err();
        assert!(matches!(
            &err,
            SortError::UnknownEncoding { encoding, .. } if encoding == "invalid-encoding"
        ));
        assert_eq!(err.to_string(), "unknown encoding, 'invalid-encoding', in odd.py");
    }

    #[test]
    fn test_undeclared_non_utf8_is_a_decoding_error() {
        let err = decode_source(&[0x66, 0xff, 0x0a], Path::new("latin1.py")).unwrap_err();
        assert_eq!(err.code().as_str(), "E012");
        assert!(err.to_string().starts_with("encoding error in latin1.py"));
    }

    #[test]
    fn test_utf8_text_is_borrowed() {
        let source = decode_source("x = 'é'\n".as_bytes(), Path::new("a.py")).unwrap();
        assert!(matches!(source.text, Cow::Borrowed(_)));
        assert_eq!(source.encoding, UTF_8);
    }

    #[test]
    fn test_bom_with_foreign_declaration_is_rejected() {
        let err = decode_source(b"\xef\xbb\xbf# coding: latin-1\n", Path::new("a.py")).unwrap_err();
        assert!(matches!(err, SortError::Decoding { .. }));
    }
}
