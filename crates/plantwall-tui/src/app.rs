//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use plantwall_core::{CoreError, Dashboard};

use crate::action::{Action, Control};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Last known `/api/health` outcome, shown in the status bar.
    backend_ok: Option<bool>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge on exit.
    cancel: CancellationToken,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&dashboard).into_iter().collect();

        let active_screen = ScreenId::default();
        if let Some(screen) = screens.get_mut(&active_screen) {
            screen.set_focused(true);
        }

        Self {
            dashboard,
            active_screen,
            screens,
            running: true,
            help_visible: false,
            backend_ok: None,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let bridge = tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));

        // ~30 FPS redraw, spinners step every 8th frame (~4 Hz).
        let mut events = EventReader::new(Duration::from_millis(33), 8);

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Frame { animate } => {
                    if animate {
                        self.action_tx.send(Action::Tick)?;
                    }
                    self.action_tx.send(Action::Render)?;
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.cancel.cancel();
        events.stop();
        if let Err(e) = bridge.await {
            debug!(error = %e, "data bridge task ended abnormally");
        }
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Control(control) => self.spawn_control(*control),

            Action::RefreshAll => {
                let dashboard = self.dashboard.clone();
                tokio::spawn(async move {
                    if let Err(e) = dashboard.refresh_all().await {
                        debug!(error = %e, "refresh failed");
                    }
                });
            }

            Action::RunHealthCheck => {
                let dashboard = self.dashboard.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let check = dashboard.check_health().await;
                    let _ = tx.send(Action::HealthChecked {
                        ok: check.is_ok(),
                        message: check.message(),
                    });
                });
            }

            Action::HealthChecked { ok, .. } => {
                self.backend_ok = Some(*ok);
                self.broadcast(action)?;
            }

            Action::Render | Action::Resize(..) => {}

            // Panel updates and ticks go to every screen so inactive
            // screens are current when switched to.
            other => self.broadcast(other)?,
        }
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Run a panel write off the UI loop. Outcomes reach the screens as
    /// panel state (banner, phase) through the data bridge.
    fn spawn_control(&self, control: Control) {
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move {
            let lighting = dashboard.lighting();
            let watering = dashboard.watering();
            let result: Result<(), CoreError> = match control {
                Control::SetBrightness => lighting.set_brightness().await,
                Control::ToggleLights => lighting.toggle().await,
                Control::SaveLighting => lighting.save_schedule().await,
                Control::StartWatering => watering.start_manual().await,
                Control::ToggleAutoMode => watering.toggle_auto_mode().await,
                Control::SaveWateringSchedule => watering.save_schedule().await,
            };
            if let Err(e) = result {
                debug!(?control, error = %e, "control write failed");
            }
        });
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    /// Backend indicator, active screen hints, global hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match self.backend_ok {
            Some(true) => Span::styled("● backend ok", Style::default().fg(theme::LEAF_GREEN)),
            Some(false) => Span::styled("○ backend down", Style::default().fg(theme::ERROR_RED)),
            None => Span::styled("◐ checking", Style::default().fg(theme::SUN_YELLOW)),
        };
        let screen_hints = self
            .screens
            .get(&self.active_screen)
            .map(|s| s.hints())
            .unwrap_or_default();

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(format!(" │ {screen_hints}"), theme::key_hint()),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 22u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Global"),
            key("1-3", "Jump to screen"),
            key("Tab", "Next screen"),
            key("?", "This help"),
            key("q", "Quit"),
            Line::from(""),
            section("Status"),
            key("r", "Refresh every panel"),
            key("h", "Run backend health check"),
            Line::from(""),
            section("Lighting / Watering"),
            key("j/k ↑/↓", "Select control"),
            key("h/l ←/→", "Adjust value"),
            key("Enter", "Apply selected control"),
            key("t", "Toggle lights"),
            key("w / a", "Water now / toggle auto mode"),
            key("s", "Save schedule"),
            key("x", "Dismiss banner"),
            Line::from(""),
            Line::from(Span::styled(
                "                    Esc or ? to close",
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
