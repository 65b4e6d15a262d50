//! Lighting screen: current state plus brightness, power and schedule
//! controls. Every control is inert while a write is in flight.

use chrono::{NaiveTime, TimeDelta};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use plantwall_core::controls::BRIGHTNESS;
use plantwall_core::display::relative_age;
use plantwall_core::{Lighting, LightingForm, LightingPanel, PanelState};

use crate::action::{Action, Control};
use crate::component::Component;
use crate::screens::render_throbber;
use crate::theme;
use crate::widgets::banner::banner_line;
use crate::widgets::level::flag_span;
use crate::widgets::slider::slider_line;
use crate::widgets::{field, panel_block};

const TIME_STEP_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Brightness,
    Power,
    Schedule,
    OnTime,
    OffTime,
}

impl Row {
    const ALL: [Row; 5] = [
        Self::Brightness,
        Self::Power,
        Self::Schedule,
        Self::OnTime,
        Self::OffTime,
    ];
}

fn step_brightness(form: &mut LightingForm, up: bool) {
    let current = u16::from(form.brightness);
    let next = if up {
        BRIGHTNESS.step_up(current)
    } else {
        BRIGHTNESS.step_down(current)
    };
    form.brightness = u8::try_from(next).unwrap_or(u8::MAX);
}

fn shift_time(time: NaiveTime, up: bool) -> NaiveTime {
    let delta = TimeDelta::minutes(TIME_STEP_MINUTES);
    if up { time + delta } else { time - delta }
}

pub struct LightingScreen {
    panel: LightingPanel,
    state: PanelState<Lighting>,
    row: usize,
    throbber: ThrobberState,
    focused: bool,
}

impl LightingScreen {
    pub fn new(panel: LightingPanel) -> Self {
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

    /// Left/right on the selected row edits the local form.
    fn adjust(&self, up: bool) {
        let row = self.selected();
        let outcome = self.panel.edit_form(|form| match row {
            Row::Brightness => step_brightness(form, up),
            Row::Schedule => form.schedule_enabled = !form.schedule_enabled,
            Row::OnTime => form.on_time = shift_time(form.on_time, up),
            Row::OffTime => form.off_time = shift_time(form.off_time, up),
            Row::Power => {}
        });
        if let Err(e) = outcome {
            tracing::debug!(error = %e, "lighting form edit ignored");
        }
    }

    /// Enter on the selected row submits the matching write.
    fn submit(&self) -> Control {
        match self.selected() {
            Row::Brightness => Control::SetBrightness,
            Row::Power => Control::ToggleLights,
            Row::Schedule | Row::OnTime | Row::OffTime => Control::SaveLighting,
        }
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let Some(status) = self.state.status.as_deref() else {
            return Vec::new();
        };
        vec![
            field("Power", flag_span(status.is_on, "On", "Off")),
            field(
                "Brightness",
                Span::styled(format!("{}%", status.brightness), theme::value()),
            ),
            field(
                "Power usage",
                Span::styled(format!("{:.1} W", status.power_usage), theme::value()),
            ),
            field(
                "Schedule",
                flag_span(status.schedule_enabled, "Enabled", "Disabled"),
            ),
            field(
                "Last change",
                Span::styled(
                    relative_age(status.last_changed, chrono::Utc::now()),
                    theme::value(),
                ),
            ),
        ]
    }

    fn control_lines(&self) -> Vec<Line<'static>> {
        let form = &self.state.form;
        let enabled = self.state.controls_enabled() && self.state.status.is_some();
        let is_on = self.state.status.as_ref().is_some_and(|s| s.is_on);

        Row::ALL
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let selected = i == self.row && self.focused;
                let text_row = |label: &str, value: String| {
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
                        Span::styled(value, style),
                    ])
                };
                match row {
                    Row::Brightness => slider_line(
                        "Brightness",
                        u16::from(form.brightness),
                        "%",
                        BRIGHTNESS,
                        selected,
                        enabled,
                    ),
                    Row::Power => text_row(
                        "Lights",
                        (if is_on { "[ Turn off ]" } else { "[ Turn on ]" }).to_owned(),
                    ),
                    Row::Schedule => text_row(
                        "Schedule",
                        (if form.schedule_enabled { "[x] enabled" } else { "[ ] enabled" })
                            .to_owned(),
                    ),
                    Row::OnTime => text_row("On at", form.on_time.format("%H:%M").to_string()),
                    Row::OffTime => {
                        text_row("Off at", form.off_time.format("%H:%M").to_string())
                    }
                }
            })
            .collect()
    }
}

impl Component for LightingScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('x') {
            self.panel.dismiss_banner();
            return Ok(None);
        }
        if !self.state.controls_enabled() || self.state.status.is_none() {
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
            KeyCode::Left | KeyCode::Char('h') => {
                self.adjust(false);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.adjust(true);
                None
            }
            KeyCode::Char(' ') if self.selected() == Row::Schedule => {
                self.adjust(true);
                None
            }
            KeyCode::Enter => Some(Action::Control(self.submit())),
            KeyCode::Char('t') => Some(Action::Control(Control::ToggleLights)),
            KeyCode::Char('s') => Some(Action::Control(Control::SaveLighting)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::LightingUpdated(state) => self.state = state.as_ref().clone(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Lighting", self.focused);
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
            render_throbber(frame, rows[0], &self.throbber, " Updating lighting...");
        }

        if self.state.status.is_none() && self.state.is_loading() {
            render_throbber(frame, rows[1], &self.throbber, " Loading lighting status...");
        } else {
            frame.render_widget(Paragraph::new(self.status_lines()), rows[1]);
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
        "↑↓ select  ←→ adjust  Enter apply  t toggle  s save  x dismiss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn brightness_steps_by_five_within_bounds() {
        let mut form = LightingForm {
            brightness: 98,
            ..LightingForm::default()
        };
        step_brightness(&mut form, true);
        assert_eq!(form.brightness, 100);
        form.brightness = 3;
        step_brightness(&mut form, false);
        assert_eq!(form.brightness, 0);
        form.brightness = 50;
        step_brightness(&mut form, true);
        assert_eq!(form.brightness, 55);
    }

    #[test]
    fn schedule_times_wrap_around_midnight() {
        let late = NaiveTime::from_hms_opt(23, 50, 0).unwrap_or_default();
        assert_eq!(
            shift_time(late, true),
            NaiveTime::from_hms_opt(0, 5, 0).unwrap_or_default()
        );
    }
}
