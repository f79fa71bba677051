//! Text → sections.

use crate::document::{Line, Section};

/// Parse a document into sections.
///
/// A line whose trimmed text both starts with `[` and ends with `]` opens a
/// new section. Every other line belongs to the section above it, or to the
/// preamble when no header has been seen yet. Any input is accepted; empty
/// input yields no sections.
///
/// Lines end at `\n`, `\r\n`, a lone `\r`, or any other Unicode line
/// boundary such as U+2028. Terminators are dropped.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for raw in physical_lines(text) {
        let trimmed = raw.trim();
        if let Some(name) = header_name(trimmed) {
            sections.push(Section::new(name, raw));
            continue;
        }
        if sections.is_empty() {
            sections.push(Section::preamble());
        }
        // Non-empty by the push above.
        if let Some(current) = sections.last_mut() {
            current.lines.push(Line::parse(raw));
        }
    }

    sections
}

/// Split on line boundaries. A trailing terminator does not start an extra
/// empty line.
fn physical_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r'
            && let Some(&(_, '\n')) = chars.peek()
        {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Line feed, carriage return, vertical tab, form feed, the file/group/record
/// separators, next line, and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

fn header_name(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix('[')?.strip_suffix(']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::TEXTURE_INI;

    #[test]
    fn empty_input_has_no_sections() {
        assert!(parse_sections("").is_empty());
    }

    #[test]
    fn single_section() {
        let sections = parse_sections("[A]\nfoo = 1\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "A");
        assert_eq!(sections[0].header, "[A]");
        assert_eq!(sections[0].lines.len(), 1);
        assert_eq!(sections[0].lines[0].value(), Some("1"));
    }

    #[test]
    fn header_keeps_raw_text_and_inner_spacing() {
        let sections = parse_sections("  [ Spaced Name ]  \nk = v");
        assert_eq!(sections[0].name, " Spaced Name ");
        assert_eq!(sections[0].header, "  [ Spaced Name ]  ");
    }

    #[test]
    fn lines_before_first_header_go_to_one_preamble() {
        let sections = parse_sections("; first\n; second\n[A]\nk = v");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].is_preamble());
        assert_eq!(sections[0].lines.len(), 2);
        assert_eq!(sections[1].name, "A");
    }

    #[test]
    fn no_preamble_when_document_starts_with_header() {
        let sections = parse_sections("[A]\n[B]");
        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|s| !s.is_preamble()));
        assert!(sections[0].lines.is_empty());
    }

    #[test]
    fn half_brackets_are_ordinary_lines() {
        let sections = parse_sections("[A]\n[not a header\nalso not]");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].lines.len(), 2);
        assert_eq!(sections[0].lines[0].original(), "[not a header");
    }

    #[test]
    fn blank_lines_stay_in_their_section() {
        let sections = parse_sections("[A]\n\nk = v\n\n[B]");
        assert_eq!(sections[0].lines.len(), 3);
        assert_eq!(sections[0].lines[1].original(), "k = v");
        assert_eq!(sections[0].lines[2].original(), "");
        assert_eq!(sections[1].name, "B");
    }

    #[test]
    fn crlf_terminators_are_dropped() {
        let sections = parse_sections("[A]\r\nk = v\r\n");
        assert_eq!(sections[0].header, "[A]");
        assert_eq!(sections[0].lines[0].original(), "k = v");
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let sections = parse_sections("; old mac\r[A]\rk = v\r");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].lines[0].original(), "; old mac");
        assert_eq!(sections[1].name, "A");
        assert_eq!(sections[1].lines.len(), 1);
        assert_eq!(sections[1].lines[0].value(), Some("v"));
    }

    #[test]
    fn unicode_line_boundaries() {
        let lines = physical_lines("a\u{2028}b\x0cc\u{85}d\r\n\ne");
        assert_eq!(lines, vec!["a", "b", "c", "d", "", "e"]);
    }

    #[test]
    fn trailing_terminator_adds_no_line() {
        assert_eq!(physical_lines("a\n"), vec!["a"]);
        assert_eq!(physical_lines("a\n\n"), vec!["a", ""]);
        assert!(physical_lines("").is_empty());
    }

    #[test]
    fn texture_fixture_layout() {
        let sections = parse_sections(TEXTURE_INI);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                crate::document::PREAMBLE,
                "TextureOverrideHair",
                "TextureOverrideBody",
                "CommandListHair",
            ]
        );
    }
}
