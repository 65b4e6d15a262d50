//! Screen implementations. Each screen is a top-level Component that
//! renders one or more dashboard panels.

pub mod lighting;
pub mod status;
pub mod watering;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use throbber_widgets_tui::{Throbber, ThrobberState};

use plantwall_core::Dashboard;

use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Build every screen, each holding handles to the panels it renders.
pub fn create_screens(dashboard: &Dashboard) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Status,
            Box::new(status::StatusScreen::new(
                dashboard.overview().clone(),
                dashboard.sensors().clone(),
            )) as Box<dyn Component>,
        ),
        (
            ScreenId::Lighting,
            Box::new(lighting::LightingScreen::new(dashboard.lighting().clone())),
        ),
        (
            ScreenId::Watering,
            Box::new(watering::WateringScreen::new(dashboard.watering().clone())),
        ),
    ]
}

/// Animated throbber line, e.g. while a panel's first fetch is outstanding.
pub(crate) fn render_throbber(frame: &mut Frame, area: Rect, state: &ThrobberState, label: &str) {
    let throbber = Throbber::default()
        .label(label.to_owned())
        .style(Style::default().fg(theme::NEON_CYAN))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}
