//! Sections → text.

use crate::document::Section;

/// Render sections back into a document.
///
/// The preamble contributes its raw lines with no header. Every other section
/// contributes its header followed by its lines. Renderings are joined with
/// `\n` and no trailing newline is added.
pub fn render_sections(sections: &[Section]) -> String {
    let mut rendered: Vec<&str> = Vec::new();
    for section in sections {
        if !section.is_preamble() {
            rendered.push(&section.header);
        }
        rendered.extend(section.lines.iter().map(|line| line.original()));
    }
    rendered.join("\n")
}
