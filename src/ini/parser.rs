//! INI text decoding and parsing.
use super::document::{IniDocument, Section, fold};
use crate::error::SyntaxError;

/// Decode raw file bytes: strip a UTF-8 BOM, and fall back to one byte per
/// character (Latin-1) for legacy files that are not valid UTF-8.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}

/// Parse INI text into a document.
///
/// Format:
/// ```ini
/// ; comment
/// [Display]
/// iSize W=1920
/// sD3DDevice: "NVIDIA GeForce"
/// ```
///
/// Section headers and setting names that differ only in case are merged
/// into the first spelling seen; a repeated setting keeps its last value.
/// With `preserve_case` off, setting names are folded to lower case.
///
/// # Examples
///
/// ```
/// use bethini::ini::parser::parse_str;
///
/// let doc = parse_str("[General]\nsTheme=Dark\n[general]\nSTHEME=Light\n", true).unwrap();
/// let general = doc.section("General").unwrap();
/// assert_eq!(general.get("sTheme"), Some("Light"));
/// assert_eq!(doc.sections().count(), 1);
/// ```
///
/// # Errors
///
/// Returns a [`SyntaxError`] if:
/// - A section header is malformed (`[General` or `[]`)
/// - A setting appears before any section header
/// - A line has no `=` or `:` delimiter, or an empty setting name
pub fn parse_str(content: &str, preserve_case: bool) -> Result<IniDocument, SyntaxError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut doc = IniDocument::new();
    let mut current: Option<&mut Section> = None;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        let error = |message: &str| SyntaxError {
            line: line_num + 1,
            message: format!("{message}: {trimmed}"),
        };

        // Skip empty lines and full-line comments
        if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
            continue;
        }

        if trimmed.starts_with('[') {
            let header = parse_header(trimmed).ok_or_else(|| error("malformed section header"))?;
            current = Some(doc.ensure_section(header));
        } else if let Some(section) = current.as_mut() {
            let (key, value) = parse_kv_line(trimmed).ok_or_else(|| error("expected key=value"))?;
            if key.is_empty() {
                return Err(error("empty setting name"));
            }
            if preserve_case {
                section.set(key, value);
            } else {
                section.set(&fold(key), value);
            }
        } else {
            return Err(error("setting outside of any section"));
        }
    }

    Ok(doc)
}

/// Parse a `[Header]` line. Anything after the last `]` is ignored.
fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let name = rest.get(..end)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name)
}

/// Split a `key=value` or `key:value` line at whichever delimiter comes first.
fn parse_kv_line(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    let key = line.get(..idx)?.trim();
    let value = line.get(idx + 1..)?.trim();
    Some((key, value))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn entries(doc: &IniDocument, section: &str) -> Vec<(String, String)> {
        doc.section(section)
            .expect("section should exist")
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_simple_sections() {
        let doc = parse_str("[Display]\niSize W=1920\niSize H=1080\n\n[Audio]\nfVal=0.5\n", true)
            .expect("test data should parse");
        let names: Vec<&str> = doc.sections().map(Section::name).collect();
        assert_eq!(names, ["Display", "Audio"]);
        assert_eq!(
            entries(&doc, "Display"),
            vec![
                ("iSize W".to_string(), "1920".to_string()),
                ("iSize H".to_string(), "1080".to_string()),
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let doc = parse_str("; header\n# other\n[General]\n\n; note\nsKey=v\n", true)
            .expect("test data should parse");
        assert_eq!(
            entries(&doc, "General"),
            vec![("sKey".to_string(), "v".to_string())]
        );
    }

    #[test]
    fn hash_inside_value_is_data() {
        let doc = parse_str("[Colors]\nsColor=color#FF0000 # not a comment\n", true)
            .expect("test data should parse");
        assert_eq!(
            doc.section("Colors").unwrap().get("sColor"),
            Some("color#FF0000 # not a comment")
        );
    }

    #[test]
    fn earliest_delimiter_wins() {
        let doc = parse_str("[Paths]\nsPath=C:\\Games\\Skyrim\nsName: a=b\n", true)
            .expect("test data should parse");
        let paths = doc.section("Paths").unwrap();
        assert_eq!(paths.get("sPath"), Some("C:\\Games\\Skyrim"));
        assert_eq!(paths.get("sName"), Some("a=b"));
    }

    #[test]
    fn empty_value_allowed() {
        let doc = parse_str("[General]\nsResourceArchiveList2=\n", true).unwrap();
        assert_eq!(
            doc.section("General").unwrap().get("sResourceArchiveList2"),
            Some("")
        );
    }

    #[test]
    fn duplicate_case_variants_are_merged() {
        let doc = parse_str(
            "[Display]\nbFull Screen=1\n[display]\nBFULL SCREEN=0\niSize W=800\n",
            true,
        )
        .unwrap();
        assert_eq!(doc.sections().count(), 1);
        assert_eq!(
            entries(&doc, "Display"),
            vec![
                ("bFull Screen".to_string(), "0".to_string()),
                ("iSize W".to_string(), "800".to_string()),
            ]
        );
    }

    #[test]
    fn folded_keys_without_preserve_case() {
        let doc = parse_str("[General]\nsTheme=Dark\n", false).unwrap();
        assert_eq!(doc.section("General").unwrap().get("stheme"), Some("Dark"));
        assert_eq!(doc.section("General").unwrap().get("sTheme"), None);
    }

    #[test]
    fn setting_outside_section_fails() {
        let err = parse_str("sOrphan=1\n", true).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("outside of any section"));
    }

    #[test]
    fn missing_delimiter_fails_with_line_number() {
        let err = parse_str("[General]\nsKey=1\ngarbage\n", true).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("garbage"));
    }

    #[test]
    fn malformed_headers_fail() {
        assert!(parse_str("[General\nsKey=1\n", true).is_err());
        assert!(parse_str("[]\n", true).is_err());
        assert!(parse_str("[General]\n=1\n", true).is_err());
    }

    #[test]
    fn header_trailing_text_ignored() {
        let doc = parse_str("[ Display ] ; video\nx=1\n", true).unwrap();
        assert!(doc.section("Display").is_some());
    }

    #[test]
    fn crlf_and_bom_tolerated() {
        let doc = parse_str("\u{feff}[General]\r\nsKey=1\r\n", true).unwrap();
        assert_eq!(doc.section("General").unwrap().get("sKey"), Some("1"));
    }

    #[test]
    fn decode_strips_bom_and_falls_back_to_latin1() {
        assert_eq!(decode(b"\xEF\xBB\xBF[A]\n"), "[A]\n");
        assert_eq!(decode(b"sName=Caf\xE9"), "sName=Caf\u{e9}");
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert!(parse_str("", true).unwrap().is_empty());
        assert!(parse_str("; only a comment\n", true).unwrap().is_empty());
    }
}
