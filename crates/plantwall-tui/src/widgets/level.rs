//! Reservoir level and on/off indicators.

use ratatui::text::Span;

use plantwall_core::display::WaterLevel;

use crate::theme;

/// Fill percentage colored by severity: red below 20, yellow below 40.
pub fn water_level_span(level: f64) -> Span<'static> {
    let style = match WaterLevel::from_percent(level) {
        WaterLevel::Low => theme::bad(),
        WaterLevel::Medium => theme::warn(),
        WaterLevel::High => theme::good(),
    };
    Span::styled(format!("{level:.1}%"), style)
}

/// `●`/`○` indicator with a label for each state.
pub fn flag_span(on: bool, on_text: &str, off_text: &str) -> Span<'static> {
    if on {
        Span::styled(format!("● {on_text}"), theme::good())
    } else {
        Span::styled(format!("○ {off_text}"), theme::disabled())
    }
}
