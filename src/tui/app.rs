use chrono::Local;
use instamon::model::{AlertKind, AlertParams, Severity};
use instamon::session::{Service, WizardAction, WizardSession, WizardStep};
use rand::Rng;
use ratatui::style::Color;
use std::time::{Duration, Instant};

const MAX_EVENTS: usize = 50;
const CONFETTI_COUNT: usize = 100;
const CONFETTI_GRAVITY: f32 = 0.012;
const CONFETTI_MAX_AGE: u16 = 60;

const CONFETTI_GLYPHS: &[char] = &['*', 'o', '+', '.', '◆'];
const CONFETTI_COLORS: &[Color] = &[
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// A single confetti particle in unit-square coordinates. The renderer
/// scales to the terminal area each frame.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub glyph: char,
    pub color: Color,
    age: u16,
}

pub struct App {
    pub should_quit: bool,
    pub session: WizardSession,
    pub events: Vec<String>,
    pub cursor: usize,
    /// Step 3: 0 = Metricbeat column, 1 = Filebeat column.
    pub service_col: usize,
    /// Step 5: 0 = warning threshold, 1 = critical threshold.
    pub threshold_col: usize,
    pub input_buffer: String,
    pub severity: Severity,
    pub confetti: Vec<Particle>,
    pub tick_count: u64,
}

impl App {
    pub fn new(delay: Duration) -> Self {
        let mut app = App {
            should_quit: false,
            session: WizardSession::with_delay(delay),
            events: vec![],
            cursor: 0,
            service_col: 0,
            threshold_col: 0,
            input_buffer: String::new(),
            severity: Severity::Warning,
            confetti: vec![],
            tick_count: 0,
        };
        app.push_event("Welcome to InstaMonitor onboarding".to_string());
        app
    }

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);

        let was_simulating = self.session.is_simulating();
        self.session.tick(Instant::now());
        if was_simulating && !self.session.is_simulating() {
            self.push_event("Connectivity check complete".to_string());
        }

        if self.session.is_complete() {
            self.advance_confetti();
        }
    }

    pub fn push_event(&mut self, msg: String) {
        self.events
            .push(format!("{} {}", Local::now().format("%H:%M:%S"), msg));
        if self.events.len() > MAX_EVENTS {
            let excess = self.events.len() - MAX_EVENTS;
            self.events.drain(..excess);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ---- Row navigation ----

    /// Server ids shown on the current step, in display order.
    pub fn visible_server_ids(&self) -> Vec<u32> {
        let servers = self.session.servers();
        match self.session.step() {
            WizardStep::SelectServers => servers.iter().map(|s| s.id).collect(),
            WizardStep::CheckConnectivity | WizardStep::ChooseServices => {
                servers.iter().filter(|s| s.selected).map(|s| s.id).collect()
            }
            WizardStep::ConfigurePaths => servers
                .iter()
                .filter(|s| s.selected && s.filebeat)
                .map(|s| s.id)
                .collect(),
            _ => vec![],
        }
    }

    pub fn row_count(&self) -> usize {
        match self.session.step() {
            WizardStep::SetupAlerts => self.session.alerts().len(),
            WizardStep::Complete => 0,
            _ => self.visible_server_ids().len(),
        }
    }

    pub fn cursor_server_id(&self) -> Option<u32> {
        self.visible_server_ids().get(self.cursor).copied()
    }

    pub fn cursor_alert_kind(&self) -> Option<AlertKind> {
        self.session.alerts().get(self.cursor).map(|a| a.kind)
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.session.step() == WizardStep::SetupAlerts {
                self.input_buffer.clear();
            }
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.row_count() {
            self.cursor += 1;
            if self.session.step() == WizardStep::SetupAlerts {
                self.input_buffer.clear();
            }
        }
    }

    // ---- Step 1: server selection ----

    pub fn toggle_cursor_server(&mut self) {
        if let Some(id) = self.cursor_server_id() {
            self.session.apply(WizardAction::ToggleServer(id));
            if let Some(server) = self.session.server(id) {
                let verb = if server.selected { "Selected" } else { "Deselected" };
                let msg = format!("{} {}", verb, server.hostname);
                self.push_event(msg);
            }
        }
    }

    // ---- Step 3: service toggles ----

    pub fn cursor_service(&self) -> Service {
        if self.service_col == 0 {
            Service::Metricbeat
        } else {
            Service::Filebeat
        }
    }

    pub fn toggle_cursor_service(&mut self) {
        if let Some(id) = self.cursor_server_id() {
            let service = self.cursor_service();
            self.session.apply(WizardAction::ToggleService(id, service));
            if let Some(server) = self.session.server(id) {
                let on = match service {
                    Service::Metricbeat => server.metricbeat,
                    Service::Filebeat => server.filebeat,
                };
                let msg = format!(
                    "{} {} on {}",
                    if on { "Enabled" } else { "Disabled" },
                    service.label(),
                    server.hostname
                );
                self.push_event(msg);
            }
        }
    }

    // ---- Steps 4 & 5: text input ----

    /// Whether the cursored row currently accepts typed characters.
    pub fn input_active(&self) -> bool {
        match self.session.step() {
            WizardStep::ConfigurePaths => self.cursor_server_id().is_some(),
            WizardStep::SetupAlerts => self
                .cursor_alert_kind()
                .and_then(|k| self.session.alert(k))
                .map(|rule| {
                    rule.enabled
                        && matches!(
                            rule.params,
                            AlertParams::Processes(_) | AlertParams::Keywords(_)
                        )
                })
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn push_input(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input_buffer.pop();
    }

    pub fn submit_input(&mut self) {
        match self.session.step() {
            WizardStep::ConfigurePaths => {
                if let Some(id) = self.cursor_server_id() {
                    let path = std::mem::take(&mut self.input_buffer);
                    let host = self
                        .session
                        .server(id)
                        .map(|s| s.hostname.clone())
                        .unwrap_or_default();
                    self.session.apply(WizardAction::AddLogPath(id, path.clone()));
                    self.push_event(format!("Added log path '{}' to {}", path, host));
                }
            }
            WizardStep::SetupAlerts => match self.cursor_alert_kind() {
                Some(AlertKind::Process) => {
                    let name = std::mem::take(&mut self.input_buffer);
                    self.session.apply(WizardAction::AddProcess(name.clone()));
                    self.push_event(format!("Watching process '{}'", name));
                }
                Some(AlertKind::Log) => {
                    let keyword = std::mem::take(&mut self.input_buffer);
                    if keyword.is_empty() {
                        // Session ignores empty keywords too; skip the event.
                        return;
                    }
                    let severity = self.severity;
                    self.session
                        .apply(WizardAction::AddLogKeyword(keyword.clone(), severity));
                    self.push_event(format!(
                        "Alerting on keyword '{}' ({})",
                        keyword,
                        severity.label()
                    ));
                }
                _ => {}
            },
            _ => {}
        }
    }

    // ---- Step 5: alert rules ----

    pub fn toggle_cursor_alert(&mut self) {
        if let Some(kind) = self.cursor_alert_kind() {
            let enabled = self
                .session
                .alert(kind)
                .map(|a| !a.enabled)
                .unwrap_or(true);
            self.session
                .apply(WizardAction::SetAlertEnabled(kind, enabled));
            if let Some(rule) = self.session.alert(kind) {
                let msg = format!(
                    "{} {}",
                    if rule.enabled { "Enabled" } else { "Disabled" },
                    rule.name
                );
                self.push_event(msg);
            }
            self.input_buffer.clear();
        }
    }

    pub fn adjust_threshold(&mut self, delta: i32) {
        let Some(kind) = self.cursor_alert_kind() else {
            return;
        };
        let Some(rule) = self.session.alert(kind) else {
            return;
        };
        if !rule.enabled {
            return;
        }
        let AlertParams::Threshold { warning, critical } = rule.params else {
            return;
        };

        let current = if self.threshold_col == 0 { warning } else { critical };
        let value = (current as i32 + delta).clamp(0, 100) as u32;
        let action = if self.threshold_col == 0 {
            WizardAction::SetWarningThreshold(kind, value)
        } else {
            WizardAction::SetCriticalThreshold(kind, value)
        };
        self.session.apply(action);
    }

    pub fn flip_severity(&mut self) {
        self.severity = self.severity.toggle();
    }

    // ---- Navigation between steps ----

    pub fn next_step(&mut self) {
        if self.session.is_complete() {
            return;
        }
        self.session.apply(WizardAction::Next);
        self.cursor = 0;
        self.service_col = 0;
        self.threshold_col = 0;
        self.input_buffer.clear();

        if self.session.is_complete() {
            self.spawn_confetti();
            self.push_event("Onboarding complete 🎉".to_string());
        } else {
            let step = self.session.step();
            self.push_event(format!("Step {}: {}", step.index(), step.title()));
        }
    }

    pub fn previous_step(&mut self) {
        let before = self.session.step();
        self.session.apply(WizardAction::Previous);
        if self.session.step() != before {
            self.cursor = 0;
            self.input_buffer.clear();
        }
    }

    pub fn reset_wizard(&mut self) {
        self.session.reset();
        self.cursor = 0;
        self.service_col = 0;
        self.threshold_col = 0;
        self.input_buffer.clear();
        self.severity = Severity::Warning;
        self.confetti.clear();
        self.push_event("Wizard reset".to_string());
    }

    // ---- Confetti ----

    fn spawn_confetti(&mut self) {
        let mut rng = rand::rng();
        self.confetti = (0..CONFETTI_COUNT)
            .map(|_| {
                // Burst upward from just below center, spread ~70 degrees.
                let angle = rng.random_range(-0.61..0.61f32);
                let speed = rng.random_range(0.02..0.06f32);
                Particle {
                    x: 0.5,
                    y: 0.6,
                    vx: angle.sin() * speed * 2.0,
                    vy: -angle.cos() * speed,
                    glyph: CONFETTI_GLYPHS[rng.random_range(0..CONFETTI_GLYPHS.len())],
                    color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
                    age: 0,
                }
            })
            .collect();
    }

    fn advance_confetti(&mut self) {
        for p in &mut self.confetti {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += CONFETTI_GRAVITY;
            p.age += 1;
        }
        self.confetti
            .retain(|p| p.age < CONFETTI_MAX_AGE && p.y < 1.1 && (0.0..=1.0).contains(&p.x));
    }
}
