//! Plain-text rendering of session views.

use std::fmt::Write as _;
use tagboard_core::derive::widest_tag_length;
use tagboard_core::{CategoryView, Session};

const EMPHASIS_MARK: &str = "*";

/// Renders one item's per-category checked/unchecked partition.
///
/// Returns `None` when the item does not exist.
pub fn render_item(session: &mut Session, item: &str) -> Option<String> {
    let vertical = session.config().vertical_layout();
    let views = session.item_view(item)?;
    let mut out = String::new();
    let _ = writeln!(out, "{item}");
    for view in &views {
        render_category(&mut out, view, vertical);
    }
    Some(out)
}

fn render_category(out: &mut String, view: &CategoryView, vertical: bool) {
    let mark = if view.emphasized { EMPHASIS_MARK } else { " " };
    let _ = write!(out, "{mark} {}:", view.category);
    if vertical {
        let width = widest_tag_length(&view.partition.checked)
            .max(widest_tag_length(&view.partition.unchecked));
        out.push('\n');
        for tag in &view.partition.checked {
            let _ = writeln!(out, "    [x] {tag:<width$}");
        }
        for tag in &view.partition.unchecked {
            let _ = writeln!(out, "    [ ] {tag:<width$}");
        }
        return;
    }
    for tag in &view.partition.checked {
        let _ = write!(out, " [x]{tag}");
    }
    for tag in &view.partition.unchecked {
        let _ = write!(out, " [ ]{tag}");
    }
    out.push('\n');
}

/// Renders every item with its tags, followed by the emphasized categories.
pub fn render_overview(session: &mut Session) -> String {
    let emphasized = session.emphasized_categories();
    let mut out = String::new();
    for (name, record) in session.items().snapshot().iter() {
        let _ = writeln!(out, "{name}: {}", record.tags.join(", "));
    }
    if out.is_empty() {
        out.push_str("(no items)\n");
    }
    if !emphasized.is_empty() {
        let _ = writeln!(out, "emphasized: {}", emphasized.join(", "));
    }
    out
}
