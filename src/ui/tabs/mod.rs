//! Tab rendering modules, one per main navigation tab.

pub mod contraceptives;
pub mod infants;
pub mod labs;
pub mod partners;
pub mod pregnancy;
pub mod visits;

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fetch::Loadable;
use crate::ui::styles;

/// Placeholder line for a slot that has no data to show yet.
/// Returns None when the slot is Ready and the table should render instead.
pub fn loadable_status<T>(loadable: &Loadable<T>) -> Option<Line<'static>> {
    match loadable {
        Loadable::Idle => Some(Line::styled("No data loaded", styles::muted_style())),
        Loadable::Pending => Some(Line::styled("Loading...", styles::muted_style())),
        Loadable::Failed(e) => Some(Line::styled(format!("Error: {}", e), styles::error_style())),
        Loadable::Ready(_) => None,
    }
}

/// Render a bordered placeholder paragraph for a non-Ready slot
pub fn render_status(frame: &mut Frame, area: Rect, title: &str, focused: bool, line: Line) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));
    let paragraph = Paragraph::new(vec![Line::from(""), line]).block(block);
    frame.render_widget(paragraph, area);
}
