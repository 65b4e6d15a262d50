//! Watering screen: pump state, reservoir level, manual run and
//! automatic schedule controls. An active emergency stop replaces the
//! controls with an alert.

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;

use plantwall_core::controls::{RangeSpec, WATERING_DURATION, WATERING_INTERVAL_HOURS};
use plantwall_core::display::{relative_age, run_state};
use plantwall_core::{PanelState, Watering, WateringForm, WateringPanel};

use crate::action::{Action, Control};
use crate::component::Component;
use crate::screens::render_throbber;
use crate::theme;
use crate::widgets::banner::banner_line;
use crate::widgets::level::{flag_span, water_level_span};
use crate::widgets::slider::slider_line;
use crate::widgets::{field, panel_block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Duration,
    Start,
    AutoMode,
    Interval,
    SaveSchedule,
}

impl Row {
    const ALL: [Row; 5] = [
        Self::Duration,
        Self::Start,
        Self::AutoMode,
        Self::Interval,
        Self::SaveSchedule,
    ];
}

fn step(range: RangeSpec, value: u16, up: bool) -> u16 {
    if up {
        range.step_up(value)
    } else {
        range.step_down(value)
    }
}

fn adjust_form(form: &mut WateringForm, row: Row, up: bool) {
    match row {
        Row::Duration => form.duration_secs = step(WATERING_DURATION, form.duration_secs, up),
        Row::Interval => {
            form.interval_hours = step(WATERING_INTERVAL_HOURS, form.interval_hours, up);
        }
        Row::Start | Row::AutoMode | Row::SaveSchedule => {}
    }
}

pub struct WateringScreen {
    panel: WateringPanel,
    state: PanelState<Watering>,
    row: usize,
    throbber: ThrobberState,
    focused: bool,
}

impl WateringScreen {
    pub fn new(panel: WateringPanel) -> Self {
        Self {
            panel,
            state: PanelState::default(),
            row: 0,
            throbber: ThrobberState::default(),
            focused: false,
        }
    }

    fn selected(&self) -> Row {
        Row::ALL[self.row]
    }

    fn emergency_stop(&self) -> bool {
        self.state.status.as_ref().is_some_and(|s| s.emergency_stop)
    }

    fn controls_enabled(&self) -> bool {
        self.state.controls_enabled() && self.state.status.is_some() && !self.emergency_stop()
    }

    fn submit(&self) -> Option<Control> {
        match self.selected() {
            Row::Duration | Row::Start => Some(Control::StartWatering),
            Row::AutoMode => Some(Control::ToggleAutoMode),
            Row::Interval | Row::SaveSchedule => Some(Control::SaveWateringSchedule),
        }
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let Some(status) = self.state.status.as_deref() else {
            return Vec::new();
        };
        let next = status.next_scheduled.map_or_else(
            || "-".to_owned(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        vec![
            field(
                "Pump",
                flag_span(status.is_running, run_state(true), run_state(false)),
            ),
            field("Water level", water_level_span(status.water_level)),
            field(
                "Last watering",
                Span::styled(relative_age(status.last_watering, Utc::now()), theme::value()),
            ),
            field("Auto mode", flag_span(status.auto_mode, "Enabled", "Disabled")),
            field("Next run", Span::styled(next, theme::value())),
        ]
    }

    fn control_lines(&self) -> Vec<Line<'static>> {
        let form = &self.state.form;
        let enabled = self.controls_enabled();

        Row::ALL
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let selected = i == self.row && self.focused;
                let button = |label: &str, text: String| {
                    let style = if !enabled {
                        theme::disabled()
                    } else if selected {
                        theme::selected()
                    } else {
                        theme::value()
                    };
                    let cursor = if selected { "▸ " } else { "  " };
                    Line::from(vec![
                        Span::styled(format!("{cursor}{label:<14}"), theme::label()),
                        Span::styled(text, style),
                    ])
                };
                match row {
                    Row::Duration => slider_line(
                        "Duration",
                        form.duration_secs,
                        "s",
                        WATERING_DURATION,
                        selected,
                        enabled,
                    ),
                    Row::Start => button("", "[ Start watering ]".to_owned()),
                    Row::AutoMode => button(
                        "Auto mode",
                        (if form.auto_mode { "[x] enabled" } else { "[ ] enabled" }).to_owned(),
                    ),
                    Row::Interval => slider_line(
                        "Every",
                        form.interval_hours,
                        "h",
                        WATERING_INTERVAL_HOURS,
                        selected,
                        enabled,
                    ),
                    Row::SaveSchedule => button("", "[ Save schedule ]".to_owned()),
                }
            })
            .collect()
    }

    fn render_emergency(frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(theme::bad());
        let text = vec![
            Line::from(Span::styled("EMERGENCY STOP ACTIVE", theme::bad())),
            Line::from(Span::styled(
                "Watering controls are locked until the stop is cleared on the wall.",
                theme::warn(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(block),
            area,
        );
    }
}

impl Component for WateringScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('x') {
            self.panel.dismiss_banner();
            return Ok(None);
        }
        if !self.controls_enabled() {
            return Ok(None);
        }

        Ok(match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.row = self.row.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.row = (self.row + 1).min(Row::ALL.len() - 1);
                None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                let up = matches!(key.code, KeyCode::Right | KeyCode::Char('l'));
                let row = self.selected();
                if let Err(e) = self.panel.edit_form(|form| adjust_form(form, row, up)) {
                    tracing::debug!(error = %e, "watering form edit ignored");
                }
                None
            }
            KeyCode::Enter => self.submit().map(Action::Control),
            KeyCode::Char('w') => Some(Action::Control(Control::StartWatering)),
            KeyCode::Char('a') => Some(Action::Control(Control::ToggleAutoMode)),
            KeyCode::Char('s') => Some(Action::Control(Control::SaveWateringSchedule)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::WateringUpdated(state) => self.state = state.as_ref().clone(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Watering", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(5),
        ])
        .split(inner);

        if let Some(banner) = banner_line(self.state.banner.as_ref()) {
            frame.render_widget(Paragraph::new(banner), rows[0]);
        } else if self.state.is_updating() {
            render_throbber(frame, rows[0], &self.throbber, " Sending watering command...");
        }

        if self.state.status.is_none() && self.state.is_loading() {
            render_throbber(frame, rows[1], &self.throbber, " Loading watering status...");
        } else {
            frame.render_widget(Paragraph::new(self.status_lines()), rows[1]);
        }

        if self.emergency_stop() {
            let alert = Rect {
                height: rows[3].height.min(4),
                ..rows[3]
            };
            Self::render_emergency(frame, alert);
            return;
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("  Controls", theme::title_style()))),
            rows[2],
        );
        frame.render_widget(Paragraph::new(self.control_lines()), rows[3]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        "↑↓ select  ←→ adjust  Enter apply  w water  a auto  s save  x dismiss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duration_slider_respects_bounds() {
        let mut form = WateringForm {
            duration_secs: 300,
            ..WateringForm::default()
        };
        adjust_form(&mut form, Row::Duration, true);
        assert_eq!(form.duration_secs, 300);
        form.duration_secs = 10;
        adjust_form(&mut form, Row::Duration, false);
        assert_eq!(form.duration_secs, 10);
        adjust_form(&mut form, Row::Duration, true);
        assert_eq!(form.duration_secs, 15);
    }

    #[test]
    fn interval_steps_by_one_hour() {
        let mut form = WateringForm::default();
        adjust_form(&mut form, Row::Interval, true);
        assert_eq!(form.interval_hours, 25);
        form.interval_hours = 168;
        adjust_form(&mut form, Row::Interval, true);
        assert_eq!(form.interval_hours, 168);
    }

    #[test]
    fn buttons_leave_form_untouched() {
        let mut form = WateringForm::default();
        adjust_form(&mut form, Row::Start, true);
        assert_eq!(form, WateringForm::default());
    }
}
