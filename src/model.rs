use serde::{Deserialize, Serialize};

/// Connectivity state of an onboarding target.
///
/// `Failed` is part of the state space and is rendered, but the built-in
/// simulation never produces it. It stays here so a real check can report it
/// without a model change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Pending,
    Success,
    Failed,
}

impl ConnectivityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityStatus::Pending => "pending",
            ConnectivityStatus::Success => "success",
            ConnectivityStatus::Failed => "failed",
        }
    }
}

/// Deployment environment, derived from the hostname prefix. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Development,
}

impl Environment {
    pub fn classify(hostname: &str) -> Self {
        if hostname.starts_with("prod-") {
            Environment::Production
        } else if hostname.starts_with("stage-") {
            Environment::Staging
        } else {
            Environment::Development
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Staging => "Staging",
            Environment::Development => "Development",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: u32,
    pub hostname: String,
    pub selected: bool,
    pub metricbeat: bool,
    pub filebeat: bool,
    pub connectivity: ConnectivityStatus,
    pub log_paths: Vec<String>,
}

impl Server {
    fn seeded(id: u32, hostname: &str) -> Self {
        Server {
            id,
            hostname: hostname.to_string(),
            selected: false,
            metricbeat: false,
            filebeat: false,
            connectivity: ConnectivityStatus::Pending,
            log_paths: Vec::new(),
        }
    }

    pub fn environment(&self) -> Environment {
        Environment::classify(&self.hostname)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn toggle(self) -> Self {
        match self {
            Severity::Warning => Severity::Critical,
            Severity::Critical => Severity::Warning,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogKeyword {
    pub keyword: String,
    pub severity: Severity,
}

/// Closed set of alert rule discriminators. Exactly one rule exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Memory,
    Cpu,
    Process,
    Log,
}

/// Kind-specific rule parameters. Fields irrelevant to a kind cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertParams {
    Threshold { warning: u32, critical: u32 },
    Processes(Vec<String>),
    Keywords(Vec<LogKeyword>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub name: String,
    pub kind: AlertKind,
    pub enabled: bool,
    pub params: AlertParams,
}

/// The seven onboarding targets. The inventory is fixed at wizard start;
/// servers are never added or removed, only mutated in place by id.
pub fn seed_servers() -> Vec<Server> {
    vec![
        Server::seeded(1, "prod-app-01.example.com"),
        Server::seeded(2, "prod-db-01.example.com"),
        Server::seeded(3, "prod-cache-01.example.com"),
        Server::seeded(4, "stage-app-01.example.com"),
        Server::seeded(5, "stage-db-01.example.com"),
        Server::seeded(6, "dev-app-01.example.com"),
        Server::seeded(7, "dev-db-01.example.com"),
    ]
}

/// The four alert rule templates, one per kind, all disabled.
pub fn seed_alerts() -> Vec<AlertRule> {
    vec![
        AlertRule {
            name: "Memory Monitoring".to_string(),
            kind: AlertKind::Memory,
            enabled: false,
            params: AlertParams::Threshold {
                warning: 80,
                critical: 90,
            },
        },
        AlertRule {
            name: "CPU Monitoring".to_string(),
            kind: AlertKind::Cpu,
            enabled: false,
            params: AlertParams::Threshold {
                warning: 70,
                critical: 85,
            },
        },
        AlertRule {
            name: "Process Monitoring".to_string(),
            kind: AlertKind::Process,
            enabled: false,
            params: AlertParams::Processes(Vec::new()),
        },
        AlertRule {
            name: "Log Monitoring".to_string(),
            kind: AlertKind::Log,
            enabled: false,
            params: AlertParams::Keywords(Vec::new()),
        },
    ]
}
