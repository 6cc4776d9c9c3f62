pub mod model;
pub mod session;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::model::AlertRule;
use crate::session::WizardSession;

/// What the wizard actually configured: selected servers and enabled rules.
/// Presentation of in-memory state, nothing is written anywhere.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OnboardingSummary {
    pub servers: Vec<ServerSummary>,
    pub alerts: Vec<AlertRule>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerSummary {
    pub hostname: String,
    pub metricbeat: bool,
    pub filebeat: bool,
    pub log_paths: Vec<String>,
}

impl OnboardingSummary {
    pub fn from_session(session: &WizardSession) -> Self {
        let servers = session
            .servers()
            .iter()
            .filter(|s| s.selected)
            .map(|s| ServerSummary {
                hostname: s.hostname.clone(),
                metricbeat: s.metricbeat,
                filebeat: s.filebeat,
                log_paths: s.log_paths.clone(),
            })
            .collect();

        let alerts = session
            .alerts()
            .iter()
            .filter(|a| a.enabled)
            .cloned()
            .collect();

        OnboardingSummary { servers, alerts }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
