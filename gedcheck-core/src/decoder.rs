// Line decoder
//
// Turns raw GEDCOM text into `Line` values. Stateless: every line is decoded
// on its own, nesting is the assembler's concern.

use crate::error::{GedcomError, Result};
use crate::types::Line;
use regex::Regex;
use std::sync::LazyLock;

const BYTE_ORDER_MARK: char = '\u{feff}';

// <level> [<xref>] <tag> [<value>]
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(?:(@[^@\s]+@)\s+)?(\S+)(?:\s+(.*))?$").expect("line pattern compiles")
});

pub struct LineDecoder;

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw bytes, which must be UTF-8.
    pub fn decode_bytes(&self, bytes: Vec<u8>) -> Result<Vec<Line>> {
        let text = String::from_utf8(bytes)?;
        self.decode_source(&text)
    }

    /// Decode a whole source. Blank lines are skipped, any other line that
    /// does not fit the grammar fails the source.
    pub fn decode_source(&self, source: &str) -> Result<Vec<Line>> {
        let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
        let mut lines = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            if let Some(line) = self.decode_line(index + 1, raw)? {
                lines.push(line);
            }
        }

        tracing::debug!(lines = lines.len(), "decoded source");
        Ok(lines)
    }

    /// Decode one line. `Ok(None)` means the line is blank.
    pub fn decode_line(&self, number: usize, raw: &str) -> Result<Option<Line>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let decode_error = || GedcomError::Decode {
            line: number,
            text: raw.to_string(),
        };

        let caps = LINE_PATTERN.captures(trimmed).ok_or_else(decode_error)?;
        let level = caps[1].parse::<usize>().map_err(|_| decode_error())?;
        let xref = caps.get(2).map(|m| m.as_str().to_string());
        let tag = caps[3].to_uppercase();
        let value = caps
            .get(4)
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Some(Line {
            number,
            level,
            xref,
            tag,
            value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Line {
        LineDecoder::new()
            .decode_line(7, raw)
            .expect("decodes")
            .expect("not blank")
    }

    #[test]
    fn decodes_record_header_with_xref() {
        let line = decode("0 @I1@ INDI");
        assert_eq!(line.number, 7);
        assert_eq!(line.level, 0);
        assert_eq!(line.xref.as_deref(), Some("@I1@"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, None);
    }

    #[test]
    fn keeps_value_text_after_tag() {
        let line = decode("1 NAME Johann /Müller/");
        assert_eq!(line.level, 1);
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value.as_deref(), Some("Johann /Müller/"));
    }

    #[test]
    fn pointer_value_is_not_an_xref() {
        let line = decode("1 HUSB @I1@");
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "HUSB");
        assert_eq!(line.value.as_deref(), Some("@I1@"));
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_lowercase_tags() {
        let line = decode("  2   date   1 JAN 1900 \r");
        assert_eq!(line.level, 2);
        assert_eq!(line.tag, "DATE");
        assert_eq!(line.value.as_deref(), Some("1 JAN 1900"));
    }

    #[test]
    fn blank_lines_decode_to_nothing() {
        let decoder = LineDecoder::new();
        assert_eq!(decoder.decode_line(1, "").unwrap(), None);
        assert_eq!(decoder.decode_line(2, "   \t").unwrap(), None);
    }

    #[test]
    fn malformed_lines_fail_with_line_number() {
        let decoder = LineDecoder::new();
        for raw in ["NAME John", "x 1 NAME", "1", "-1 NAME"] {
            match decoder.decode_line(3, raw) {
                Err(GedcomError::Decode { line, text }) => {
                    assert_eq!(line, 3);
                    assert_eq!(text, raw);
                }
                other => panic!("expected decode error for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn decode_source_strips_bom_and_skips_blank_lines() {
        let source = "\u{feff}0 HEAD\n\n1 CHAR UTF-8\r\n0 TRLR\n";
        let lines = LineDecoder::new().decode_source(source).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].tag, "HEAD");
        assert_eq!(lines[1].number, 3);
        assert_eq!(lines[1].value.as_deref(), Some("UTF-8"));
        assert_eq!(lines[2].number, 4);
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let result = LineDecoder::new().decode_bytes(vec![b'0', b' ', 0xff, 0xfe]);
        assert!(matches!(result, Err(GedcomError::InvalidEncoding(_))));
    }
}
