//! Status screen: whole-wall snapshot, sensor readings, subsystem health.
//!
//! ┌─ System ────────────┐ ┌─ Sensors ───────────┐
//! │ temps, levels, ...  │ │ probes, pH/EC, ...  │
//! └─────────────────────┘ └─────────────────────┘
//! ┌─ Health ──────────────────────────────────────┐
//! └───────────────────────────────────────────────┘

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use plantwall_core::display::relative_age;
use plantwall_core::{
    Overview, OverviewPanel, PanelKind, PanelState, SensorData, Sensors, SensorsPanel,
    SystemHealth, SystemStatus,
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::render_throbber;
use crate::theme;
use crate::widgets::banner::banner_line;
use crate::widgets::level::{flag_span, water_level_span};
use crate::widgets::{field, panel_block};

pub struct StatusScreen {
    overview_panel: OverviewPanel,
    sensors_panel: SensorsPanel,
    overview: PanelState<Overview>,
    sensors: PanelState<Sensors>,
    health: SystemHealth,
    /// Last `/api/health` outcome: (ok, message).
    backend: Option<(bool, String)>,
    throbber: ThrobberState,
    focused: bool,
}

impl StatusScreen {
    pub fn new(overview_panel: OverviewPanel, sensors_panel: SensorsPanel) -> Self {
        Self {
            overview_panel,
            sensors_panel,
            overview: PanelState::default(),
            sensors: PanelState::default(),
            health: SystemHealth::default(),
            backend: None,
            throbber: ThrobberState::default(),
            focused: false,
        }
    }

    fn system_lines(status: &SystemStatus) -> Vec<Line<'static>> {
        vec![
            field(
                "Updated",
                Span::styled(relative_age(status.timestamp, Utc::now()), theme::value()),
            ),
            field("Lighting", flag_span(status.lighting_on, "On", "Off")),
            field("Water level", water_level_span(status.water_level)),
            field(
                "Nutrients",
                Span::styled(format!("{:.1}%", status.nutrient_level), theme::value()),
            ),
            field(
                "Temperature",
                Span::styled(format!("{:.1} °C", status.temperature), theme::value()),
            ),
            field(
                "Humidity",
                Span::styled(format!("{:.1}%", status.humidity), theme::value()),
            ),
            field(
                "Soil moisture",
                Span::styled(format!("{:.1}%", status.soil_moisture), theme::value()),
            ),
        ]
    }

    fn sensor_lines(data: &SensorData) -> Vec<Line<'static>> {
        let reading = |text: String| Span::styled(text, theme::value());
        let mut lines = vec![
            field("Temperature", reading(format!("{:.1} °C", data.temperature))),
            field("Humidity", reading(format!("{:.1}%", data.humidity))),
        ];
        for (i, level) in data.soil_moisture_channels().into_iter().enumerate() {
            lines.push(field(&format!("Soil #{}", i + 1), reading(format!("{level:.1}%"))));
        }
        if let Some(ph) = data.ph_level {
            lines.push(field("pH", reading(format!("{ph:.2}"))));
        }
        if let Some(ec) = data.ec_level {
            lines.push(field("EC", reading(format!("{ec:.2} mS/cm"))));
        }
        lines.push(field("Light", reading(format!("{:.0} lux", data.light_level))));
        lines.push(field("Water level", water_level_span(data.water_level)));
        lines
    }

    fn render_panel<K: PanelKind>(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        state: &PanelState<K>,
        body: impl Fn(&K::Status) -> Vec<Line<'static>>,
    ) {
        let block = panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if let Some(banner) = banner_line(state.banner.as_ref()) {
            lines.push(banner);
            lines.push(Line::from(""));
        }

        match state.status.as_deref() {
            Some(status) => lines.extend(body(status)),
            None if state.is_loading() && state.banner.is_none() => {
                render_throbber(frame, inner, &self.throbber, &format!(" Loading {}...", K::NAME));
                return;
            }
            None => {}
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_health(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Health", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let h = self.health;
        let mut spans = vec![Span::raw("  ")];
        for (name, ok) in [
            ("Sensors", h.sensors),
            ("Watering", h.watering),
            ("Lighting", h.lighting),
            ("Display", h.display),
            ("Overall", h.overall),
        ] {
            spans.push(flag_span(ok, name, name));
            spans.push(Span::raw("   "));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some((ok, message)) = &self.backend {
            let style = if *ok { theme::good() } else { theme::bad() };
            lines.push(Line::from(Span::styled(format!("  {message}"), style)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for StatusScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('r') => Some(Action::RefreshAll),
            KeyCode::Char('h') => Some(Action::RunHealthCheck),
            KeyCode::Char('x') => {
                self.overview_panel.dismiss_banner();
                self.sensors_panel.dismiss_banner();
                None
            }
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::OverviewUpdated(state) => self.overview = state.as_ref().clone(),
            Action::SensorsUpdated(state) => self.sensors = state.as_ref().clone(),
            Action::HealthUpdated(health) => self.health = *health,
            Action::HealthChecked { ok, message } => {
                self.backend = Some((*ok, message.clone()));
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Min(10), Constraint::Length(4)]).split(area);
        let cols = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_panel(frame, cols[0], "System", &self.overview, Self::system_lines);
        self.render_panel(frame, cols[1], "Sensors", &self.sensors, Self::sensor_lines);
        self.render_health(frame, rows[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        "r refresh  h health check  x dismiss"
    }
}
