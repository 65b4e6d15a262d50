//! Horizontal slider for a `RangeSpec`-bounded value.
//!
//! `◀ ██████░░░░░░ 55% ▶`. The bounds live in the range; the widget only
//! renders, key handling steps the value through `RangeSpec::step_up` and
//! `RangeSpec::step_down`.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use plantwall_core::controls::RangeSpec;

use crate::theme;

/// Filled cells out of `width` for `value` within `range`.
pub fn filled_cells(value: u16, range: RangeSpec, width: u16) -> u16 {
    let span = range.max.saturating_sub(range.min);
    if span == 0 {
        return width;
    }
    let offset = range.clamp(value) - range.min;
    let filled = u32::from(offset) * u32::from(width) / u32::from(span);
    u16::try_from(filled).unwrap_or(width)
}

/// Render one slider row.
pub fn slider_line(
    label: &str,
    value: u16,
    unit: &str,
    range: RangeSpec,
    selected: bool,
    enabled: bool,
) -> Line<'static> {
    const WIDTH: u16 = 24;
    let filled = filled_cells(value, range, WIDTH);
    let bar = format!(
        "{}{}",
        "█".repeat(usize::from(filled)),
        "░".repeat(usize::from(WIDTH - filled))
    );

    let (label_style, bar_style) = match (enabled, selected) {
        (false, _) => (theme::disabled(), theme::disabled()),
        (true, true) => (theme::selected(), Style::default().fg(theme::ELECTRIC_PURPLE)),
        (true, false) => (theme::label(), Style::default().fg(theme::NEON_CYAN)),
    };
    let cursor = if selected { "▸ " } else { "  " };

    Line::from(vec![
        Span::styled(format!("{cursor}{label:<14}"), label_style),
        Span::styled("◀ ", theme::key_hint()),
        Span::styled(bar, bar_style),
        Span::styled(format!(" {value}{unit} "), theme::value()),
        Span::styled("▶", theme::key_hint()),
    ])
}
