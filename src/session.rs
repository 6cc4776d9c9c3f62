use std::time::{Duration, Instant};

use crate::model::{
    seed_alerts, seed_servers, AlertKind, AlertParams, AlertRule, ConnectivityStatus, LogKeyword,
    Server, Severity,
};

/// Fixed delay before the simulated connectivity check resolves.
pub const SIMULATED_CHECK_DELAY: Duration = Duration::from_millis(2000);

/// The linear onboarding flow: five 1-indexed steps plus a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectServers,
    CheckConnectivity,
    ChooseServices,
    ConfigurePaths,
    SetupAlerts,
    Complete,
}

impl WizardStep {
    pub const COUNT: usize = 5;

    pub const TITLES: [&'static str; Self::COUNT] = [
        "Select Servers",
        "Check Connectivity",
        "Choose Services",
        "Configure Paths",
        "Setup Alerts",
    ];

    /// 1-based step index for display. Complete sits past the last step.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::SelectServers => 1,
            WizardStep::CheckConnectivity => 2,
            WizardStep::ChooseServices => 3,
            WizardStep::ConfigurePaths => 4,
            WizardStep::SetupAlerts => 5,
            WizardStep::Complete => Self::COUNT + 1,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Complete => "Complete",
            other => Self::TITLES[other.index() - 1],
        }
    }
}

/// Which agent service a toggle targets. The two flags are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Metricbeat,
    Filebeat,
}

impl Service {
    pub fn label(&self) -> &'static str {
        match self {
            Service::Metricbeat => "Metricbeat",
            Service::Filebeat => "Filebeat",
        }
    }
}

/// Every mutation the wizard supports, as a closed tagged union. The
/// presentation layer only ever dispatches these through [`WizardSession::apply`].
#[derive(Debug, Clone)]
pub enum WizardAction {
    ToggleServer(u32),
    ToggleService(u32, Service),
    AddLogPath(u32, String),
    SetAlertEnabled(AlertKind, bool),
    SetWarningThreshold(AlertKind, u32),
    SetCriticalThreshold(AlertKind, u32),
    AddProcess(String),
    AddLogKeyword(String, Severity),
    Next,
    Previous,
}

/// One-shot deadline for the in-flight connectivity simulation. Dropping it
/// is cancellation; a dropped check has no effect even past its deadline.
#[derive(Debug, Clone, Copy)]
struct PendingCheck {
    deadline: Instant,
}

/// The whole wizard state, owned by the caller. All mutations go through
/// [`apply`](Self::apply) and [`tick`](Self::tick), so the session is fully
/// exercisable without a terminal attached.
pub struct WizardSession {
    step: WizardStep,
    servers: Vec<Server>,
    alerts: Vec<AlertRule>,
    simulating: bool,
    pending_check: Option<PendingCheck>,
    delay: Duration,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::with_delay(SIMULATED_CHECK_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        WizardSession {
            step: WizardStep::SelectServers,
            servers: seed_servers(),
            alerts: seed_alerts(),
            simulating: false,
            pending_check: None,
            delay,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn alerts(&self) -> &[AlertRule] {
        &self.alerts
    }

    pub fn server(&self, id: u32) -> Option<&Server> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn alert(&self, kind: AlertKind) -> Option<&AlertRule> {
        self.alerts.iter().find(|a| a.kind == kind)
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Complete
    }

    /// Full reset back to the seed data, keeping the configured delay.
    /// The only operation available from the Complete state.
    pub fn reset(&mut self) {
        *self = WizardSession::with_delay(self.delay);
    }

    /// Dispatch a single user action. Lookups by id or kind that find no
    /// match degrade to silent no-ops, never errors.
    pub fn apply(&mut self, action: WizardAction) {
        match action {
            WizardAction::ToggleServer(id) => {
                if let Some(server) = self.server_mut(id) {
                    server.selected = !server.selected;
                }
            }
            WizardAction::ToggleService(id, service) => {
                if let Some(server) = self.server_mut(id) {
                    match service {
                        Service::Metricbeat => server.metricbeat = !server.metricbeat,
                        Service::Filebeat => server.filebeat = !server.filebeat,
                    }
                }
            }
            WizardAction::AddLogPath(id, path) => {
                // No de-duplication, no validation; empty paths are accepted.
                if let Some(server) = self.server_mut(id) {
                    server.log_paths.push(path);
                }
            }
            WizardAction::SetAlertEnabled(kind, enabled) => {
                if let Some(rule) = self.alert_mut(kind) {
                    rule.enabled = enabled;
                }
            }
            WizardAction::SetWarningThreshold(kind, value) => {
                if let Some(AlertParams::Threshold { warning, .. }) = self.params_mut(kind) {
                    *warning = value;
                }
            }
            WizardAction::SetCriticalThreshold(kind, value) => {
                if let Some(AlertParams::Threshold { critical, .. }) = self.params_mut(kind) {
                    *critical = value;
                }
            }
            WizardAction::AddProcess(name) => {
                if let Some(AlertParams::Processes(list)) = self.params_mut(AlertKind::Process) {
                    list.push(name);
                }
            }
            WizardAction::AddLogKeyword(keyword, severity) => {
                // The one validation site the flow has: empty keywords no-op.
                if keyword.is_empty() {
                    return;
                }
                if let Some(AlertParams::Keywords(list)) = self.params_mut(AlertKind::Log) {
                    list.push(LogKeyword { keyword, severity });
                }
            }
            WizardAction::Next => self.next(),
            WizardAction::Previous => self.previous(),
        }
    }

    /// Advance the poll-driven side effects. Only the connectivity step has
    /// any: arm the check on the first tick, resolve it once the deadline
    /// passes. Unselected servers are never touched.
    pub fn tick(&mut self, now: Instant) {
        if self.step != WizardStep::CheckConnectivity || !self.simulating {
            return;
        }

        match self.pending_check {
            None => {
                for server in self.servers.iter_mut().filter(|s| s.selected) {
                    server.connectivity = ConnectivityStatus::Pending;
                }
                self.pending_check = Some(PendingCheck {
                    deadline: now + self.delay,
                });
            }
            Some(check) if now >= check.deadline => {
                for server in self.servers.iter_mut().filter(|s| s.selected) {
                    server.connectivity = ConnectivityStatus::Success;
                }
                self.pending_check = None;
                self.simulating = false;
            }
            Some(_) => {}
        }
    }

    fn next(&mut self) {
        match self.step {
            WizardStep::SelectServers => {
                // Arm the simulation; the check itself is scheduled on the
                // next tick so tests can drive time explicitly.
                self.simulating = true;
                self.step = WizardStep::CheckConnectivity;
            }
            WizardStep::CheckConnectivity => {
                // Leaving the check step forces success for every selected
                // server, whether or not the timer ever fired.
                for server in self.servers.iter_mut().filter(|s| s.selected) {
                    server.connectivity = ConnectivityStatus::Success;
                }
                self.pending_check = None;
                self.simulating = false;
                self.step = WizardStep::ChooseServices;
            }
            WizardStep::ChooseServices => self.step = WizardStep::ConfigurePaths,
            WizardStep::ConfigurePaths => self.step = WizardStep::SetupAlerts,
            WizardStep::SetupAlerts => self.step = WizardStep::Complete,
            WizardStep::Complete => {}
        }
    }

    fn previous(&mut self) {
        let target = match self.step {
            WizardStep::SelectServers | WizardStep::Complete => return,
            WizardStep::CheckConnectivity => WizardStep::SelectServers,
            WizardStep::ChooseServices => WizardStep::CheckConnectivity,
            WizardStep::ConfigurePaths => WizardStep::ChooseServices,
            WizardStep::SetupAlerts => WizardStep::ConfigurePaths,
        };

        // Cancellation on every exit path from the check step: the pending
        // deadline is dropped, server and alert state stay untouched.
        if self.step == WizardStep::CheckConnectivity {
            self.pending_check = None;
        }
        self.step = target;
    }

    fn server_mut(&mut self, id: u32) -> Option<&mut Server> {
        self.servers.iter_mut().find(|s| s.id == id)
    }

    fn alert_mut(&mut self, kind: AlertKind) -> Option<&mut AlertRule> {
        self.alerts.iter_mut().find(|a| a.kind == kind)
    }

    fn params_mut(&mut self, kind: AlertKind) -> Option<&mut AlertParams> {
        self.alert_mut(kind).map(|a| &mut a.params)
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}
