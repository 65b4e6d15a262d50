//! Small rendering helpers shared by the screens.

pub mod banner;
pub mod level;
pub mod slider;

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::theme;

/// Rounded panel block with focus-aware border.
pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// `label  value` row with a fixed-width label column.
pub fn field<'a>(label: &str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<14}"), theme::label()),
        value,
    ])
}
