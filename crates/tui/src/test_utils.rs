//! Helpers shared by the rendering tests.

use ratatui::buffer::Buffer;

/// Renders a [`Buffer`] as text, one line per row, trailing spaces trimmed.
///
/// Used with `insta` inline snapshots and `contains` checks.
#[must_use]
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in buf.area.top()..buf.area.bottom() {
        let row: String = (buf.area.left()..buf.area.right())
            .filter_map(|x| buf.cell((x, y)).map(ratatui::buffer::Cell::symbol))
            .collect();
        out.push_str(row.trim_end_matches(' '));
        out.push('\n');
    }
    out
}
