//! Test suite for the instamon crate
//! Covers the data model, the wizard session state machine, the connectivity
//! simulation, and the onboarding summary.

#[cfg(test)]
mod model_tests {
    use crate::model::{seed_alerts, seed_servers, AlertKind, AlertParams, ConnectivityStatus, Environment};

    #[test]
    fn test_seed_inventory_shape() {
        let servers = seed_servers();
        assert_eq!(servers.len(), 7);

        let hostnames: Vec<&str> = servers.iter().map(|s| s.hostname.as_str()).collect();
        assert_eq!(
            hostnames,
            vec![
                "prod-app-01.example.com",
                "prod-db-01.example.com",
                "prod-cache-01.example.com",
                "stage-app-01.example.com",
                "stage-db-01.example.com",
                "dev-app-01.example.com",
                "dev-db-01.example.com",
            ]
        );

        for (i, server) in servers.iter().enumerate() {
            assert_eq!(server.id, (i + 1) as u32, "ids are 1-based and unique");
            assert!(!server.selected);
            assert!(!server.metricbeat);
            assert!(!server.filebeat);
            assert!(server.log_paths.is_empty());
        }
    }

    #[test]
    fn test_seed_alerts_one_rule_per_kind() {
        let alerts = seed_alerts();
        assert_eq!(alerts.len(), 4);

        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::Memory,
                AlertKind::Cpu,
                AlertKind::Process,
                AlertKind::Log
            ]
        );
        assert!(alerts.iter().all(|a| !a.enabled));
    }

    #[test]
    fn test_seed_alert_default_thresholds() {
        let alerts = seed_alerts();

        let memory = alerts.iter().find(|a| a.kind == AlertKind::Memory).unwrap();
        assert_eq!(
            memory.params,
            AlertParams::Threshold {
                warning: 80,
                critical: 90
            }
        );

        let cpu = alerts.iter().find(|a| a.kind == AlertKind::Cpu).unwrap();
        assert_eq!(
            cpu.params,
            AlertParams::Threshold {
                warning: 70,
                critical: 85
            }
        );

        let process = alerts.iter().find(|a| a.kind == AlertKind::Process).unwrap();
        assert_eq!(process.params, AlertParams::Processes(vec![]));

        let log = alerts.iter().find(|a| a.kind == AlertKind::Log).unwrap();
        assert_eq!(log.params, AlertParams::Keywords(vec![]));
    }

    #[test]
    fn test_environment_classification() {
        assert_eq!(
            Environment::classify("prod-app-01.example.com"),
            Environment::Production
        );
        assert_eq!(
            Environment::classify("stage-db-01.example.com"),
            Environment::Staging
        );
        assert_eq!(
            Environment::classify("dev-db-01.example.com"),
            Environment::Development
        );
        assert_eq!(
            Environment::classify("something-else"),
            Environment::Development
        );
    }

    #[test]
    fn test_connectivity_status_labels() {
        assert_eq!(ConnectivityStatus::Pending.label(), "pending");
        assert_eq!(ConnectivityStatus::Success.label(), "success");
        assert_eq!(ConnectivityStatus::Failed.label(), "failed");
    }
}

#[cfg(test)]
mod session_tests {
    use crate::model::{AlertKind, AlertParams, Severity};
    use crate::session::{Service, WizardAction, WizardSession, WizardStep};

    #[test]
    fn test_toggle_selection_twice_is_identity() {
        let mut session = WizardSession::new();
        let before = session.server(3).unwrap().clone();

        session.apply(WizardAction::ToggleServer(3));
        assert!(session.server(3).unwrap().selected);

        session.apply(WizardAction::ToggleServer(3));
        let after = session.server(3).unwrap();
        assert_eq!(after.selected, before.selected);
        assert_eq!(after.hostname, before.hostname);
        assert_eq!(after.metricbeat, before.metricbeat);
        assert_eq!(after.filebeat, before.filebeat);
        assert_eq!(after.connectivity, before.connectivity);
        assert_eq!(after.log_paths, before.log_paths);
    }

    #[test]
    fn test_service_flags_are_independent() {
        let mut session = WizardSession::new();

        session.apply(WizardAction::ToggleService(1, Service::Metricbeat));
        let server = session.server(1).unwrap();
        assert!(server.metricbeat);
        assert!(!server.filebeat);

        session.apply(WizardAction::ToggleService(1, Service::Filebeat));
        let server = session.server(1).unwrap();
        assert!(server.metricbeat);
        assert!(server.filebeat);

        session.apply(WizardAction::ToggleService(1, Service::Metricbeat));
        let server = session.server(1).unwrap();
        assert!(!server.metricbeat);
        assert!(server.filebeat, "toggling one flag leaves the other alone");
    }

    #[test]
    fn test_add_log_path_is_monotonic_and_ordered() {
        let mut session = WizardSession::new();

        session.apply(WizardAction::AddLogPath(2, "/var/log/app.log".to_string()));
        session.apply(WizardAction::AddLogPath(2, "/var/log/db.log".to_string()));
        session.apply(WizardAction::AddLogPath(2, "".to_string()));
        session.apply(WizardAction::AddLogPath(2, "/var/log/app.log".to_string()));

        let paths = &session.server(2).unwrap().log_paths;
        assert_eq!(
            paths,
            &vec![
                "/var/log/app.log".to_string(),
                "/var/log/db.log".to_string(),
                "".to_string(),
                "/var/log/app.log".to_string(),
            ],
            "no de-duplication, no validation, order preserved"
        );
    }

    #[test]
    fn test_missing_server_lookup_is_a_noop() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(99));
        session.apply(WizardAction::AddLogPath(99, "/var/log/x".to_string()));
        assert!(session.server(99).is_none());
        assert!(session.servers().iter().all(|s| !s.selected));
    }

    #[test]
    fn test_alert_enable_and_thresholds() {
        let mut session = WizardSession::new();

        session.apply(WizardAction::SetAlertEnabled(AlertKind::Memory, true));
        assert!(session.alert(AlertKind::Memory).unwrap().enabled);

        session.apply(WizardAction::SetWarningThreshold(AlertKind::Memory, 75));
        session.apply(WizardAction::SetCriticalThreshold(AlertKind::Memory, 95));
        assert_eq!(
            session.alert(AlertKind::Memory).unwrap().params,
            AlertParams::Threshold {
                warning: 75,
                critical: 95
            }
        );
    }

    #[test]
    fn test_threshold_update_on_non_threshold_kind_is_a_noop() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::SetWarningThreshold(AlertKind::Process, 50));
        session.apply(WizardAction::SetCriticalThreshold(AlertKind::Log, 50));

        assert_eq!(
            session.alert(AlertKind::Process).unwrap().params,
            AlertParams::Processes(vec![])
        );
        assert_eq!(
            session.alert(AlertKind::Log).unwrap().params,
            AlertParams::Keywords(vec![])
        );
    }

    #[test]
    fn test_log_keywords_ordered_with_severities() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::SetAlertEnabled(AlertKind::Log, true));
        session.apply(WizardAction::AddLogKeyword(
            "error".to_string(),
            Severity::Critical,
        ));
        session.apply(WizardAction::AddLogKeyword(
            "timeout".to_string(),
            Severity::Warning,
        ));

        let rule = session.alert(AlertKind::Log).unwrap();
        assert!(rule.enabled);
        let AlertParams::Keywords(keywords) = &rule.params else {
            panic!("log rule must carry keywords");
        };
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].keyword, "error");
        assert_eq!(keywords[0].severity, Severity::Critical);
        assert_eq!(keywords[1].keyword, "timeout");
        assert_eq!(keywords[1].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_keyword_is_rejected_but_empty_process_is_not() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::AddLogKeyword("".to_string(), Severity::Warning));
        assert_eq!(
            session.alert(AlertKind::Log).unwrap().params,
            AlertParams::Keywords(vec![]),
            "empty keywords silently no-op"
        );

        session.apply(WizardAction::AddProcess("".to_string()));
        session.apply(WizardAction::AddProcess("nginx".to_string()));
        assert_eq!(
            session.alert(AlertKind::Process).unwrap().params,
            AlertParams::Processes(vec!["".to_string(), "nginx".to_string()]),
            "process names are taken as-is"
        );
    }

    #[test]
    fn test_forward_walk_reaches_complete_only_from_last_step() {
        let mut session = WizardSession::new();
        let expected = [
            WizardStep::SelectServers,
            WizardStep::CheckConnectivity,
            WizardStep::ChooseServices,
            WizardStep::ConfigurePaths,
            WizardStep::SetupAlerts,
            WizardStep::Complete,
        ];

        for (i, step) in expected.iter().enumerate() {
            assert_eq!(session.step(), *step);
            assert_eq!(session.is_complete(), *step == WizardStep::Complete);
            if i + 1 < expected.len() {
                session.apply(WizardAction::Next);
            }
        }

        // Terminal: further Next/Previous do nothing.
        session.apply(WizardAction::Next);
        assert_eq!(session.step(), WizardStep::Complete);
        session.apply(WizardAction::Previous);
        assert_eq!(session.step(), WizardStep::Complete);
    }

    #[test]
    fn test_previous_only_moves_the_step_index() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(1));
        session.apply(WizardAction::Next);
        session.apply(WizardAction::Next);
        assert_eq!(session.step(), WizardStep::ChooseServices);

        let servers_before: Vec<_> = session.servers().to_vec();
        session.apply(WizardAction::Previous);
        assert_eq!(session.step(), WizardStep::CheckConnectivity);

        for (before, after) in servers_before.iter().zip(session.servers()) {
            assert_eq!(before.selected, after.selected);
            assert_eq!(before.connectivity, after.connectivity);
            assert_eq!(before.log_paths, after.log_paths);
        }
    }

    #[test]
    fn test_previous_is_a_noop_on_the_first_step() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::Previous);
        assert_eq!(session.step(), WizardStep::SelectServers);
    }

    #[test]
    fn test_reset_restores_the_seed() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(1));
        session.apply(WizardAction::ToggleService(1, Service::Filebeat));
        session.apply(WizardAction::AddLogPath(1, "/var/log/app.log".to_string()));
        session.apply(WizardAction::SetAlertEnabled(AlertKind::Cpu, true));
        for _ in 0..5 {
            session.apply(WizardAction::Next);
        }
        assert!(session.is_complete());

        session.reset();
        assert_eq!(session.step(), WizardStep::SelectServers);
        assert!(!session.is_simulating());
        assert!(session.servers().iter().all(|s| !s.selected));
        assert!(session.servers().iter().all(|s| s.log_paths.is_empty()));
        assert!(session.alerts().iter().all(|a| !a.enabled));
    }

    #[test]
    fn test_step_titles_and_indices() {
        assert_eq!(WizardStep::SelectServers.index(), 1);
        assert_eq!(WizardStep::SetupAlerts.index(), 5);
        assert_eq!(WizardStep::Complete.index(), 6);
        assert_eq!(WizardStep::SelectServers.title(), "Select Servers");
        assert_eq!(WizardStep::CheckConnectivity.title(), "Check Connectivity");
        assert_eq!(WizardStep::Complete.title(), "Complete");
        assert_eq!(WizardStep::TITLES.len(), WizardStep::COUNT);
    }
}

#[cfg(test)]
mod simulation_tests {
    use crate::model::ConnectivityStatus;
    use crate::session::{WizardAction, WizardSession, SIMULATED_CHECK_DELAY};
    use std::time::{Duration, Instant};

    fn armed_session() -> (WizardSession, Instant) {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(1));
        session.apply(WizardAction::ToggleServer(2));
        session.apply(WizardAction::Next);
        assert!(session.is_simulating());
        let t0 = Instant::now();
        session.tick(t0);
        (session, t0)
    }

    #[test]
    fn test_first_tick_sets_selected_servers_pending() {
        let (session, _) = armed_session();
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Pending
        );
        assert_eq!(
            session.server(2).unwrap().connectivity,
            ConnectivityStatus::Pending
        );
        assert!(session.is_simulating());
    }

    #[test]
    fn test_deadline_resolves_selected_servers_to_success() {
        let (mut session, t0) = armed_session();

        // Just before the deadline nothing happens.
        session.tick(t0 + SIMULATED_CHECK_DELAY - Duration::from_millis(1));
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Pending
        );

        session.tick(t0 + SIMULATED_CHECK_DELAY);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Success
        );
        assert_eq!(
            session.server(2).unwrap().connectivity,
            ConnectivityStatus::Success
        );
        assert!(!session.is_simulating());
    }

    #[test]
    fn test_unselected_servers_never_change() {
        let (mut session, t0) = armed_session();
        session.tick(t0 + SIMULATED_CHECK_DELAY);

        for server in session.servers().iter().filter(|s| !s.selected) {
            assert_eq!(server.connectivity, ConnectivityStatus::Pending);
        }
    }

    #[test]
    fn test_advancing_without_waiting_forces_success() {
        let (mut session, _) = armed_session();

        session.apply(WizardAction::Next);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Success
        );
        assert_eq!(
            session.server(2).unwrap().connectivity,
            ConnectivityStatus::Success
        );
        assert!(!session.is_simulating());
    }

    #[test]
    fn test_leaving_the_step_cancels_the_pending_check() {
        let (mut session, t0) = armed_session();

        session.apply(WizardAction::Previous);
        // Well past the old deadline: the cancelled check must not fire.
        session.tick(t0 + SIMULATED_CHECK_DELAY * 3);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Pending
        );
    }

    #[test]
    fn test_rearming_after_going_back_schedules_a_fresh_check() {
        let (mut session, t0) = armed_session();
        session.apply(WizardAction::Previous);

        session.apply(WizardAction::Next);
        let t1 = t0 + SIMULATED_CHECK_DELAY * 2;
        session.tick(t1);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Pending,
            "fresh check starts pending against the new deadline"
        );

        session.tick(t1 + SIMULATED_CHECK_DELAY);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Success
        );
    }

    #[test]
    fn test_zero_delay_resolves_on_the_next_tick() {
        let mut session = WizardSession::with_delay(Duration::ZERO);
        session.apply(WizardAction::ToggleServer(1));
        session.apply(WizardAction::Next);

        let t0 = Instant::now();
        session.tick(t0);
        session.tick(t0);
        assert_eq!(
            session.server(1).unwrap().connectivity,
            ConnectivityStatus::Success
        );
    }
}

#[cfg(test)]
mod summary_tests {
    use crate::model::AlertKind;
    use crate::session::{Service, WizardAction, WizardSession};
    use crate::OnboardingSummary;

    #[test]
    fn test_summary_contains_only_selected_and_enabled() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(1));
        session.apply(WizardAction::ToggleService(1, Service::Filebeat));
        session.apply(WizardAction::AddLogPath(1, "/var/log/app.log".to_string()));
        session.apply(WizardAction::SetAlertEnabled(AlertKind::Memory, true));

        let summary = OnboardingSummary::from_session(&session);
        assert_eq!(summary.servers.len(), 1);
        assert_eq!(summary.servers[0].hostname, "prod-app-01.example.com");
        assert!(summary.servers[0].filebeat);
        assert_eq!(summary.servers[0].log_paths, vec!["/var/log/app.log"]);

        assert_eq!(summary.alerts.len(), 1);
        assert_eq!(summary.alerts[0].kind, AlertKind::Memory);
    }

    #[test]
    fn test_empty_summary_serializes() {
        let session = WizardSession::new();
        let summary = OnboardingSummary::from_session(&session);
        assert!(summary.servers.is_empty());
        assert!(summary.alerts.is_empty());

        let json = summary.to_json().expect("summary should encode");
        assert!(json.contains("\"servers\""));
        assert!(json.contains("\"alerts\""));
    }

    #[test]
    fn test_summary_roundtrips_through_json() {
        let mut session = WizardSession::new();
        session.apply(WizardAction::ToggleServer(4));
        session.apply(WizardAction::SetAlertEnabled(AlertKind::Log, true));
        session.apply(WizardAction::AddLogKeyword(
            "panic".to_string(),
            crate::model::Severity::Critical,
        ));

        let summary = OnboardingSummary::from_session(&session);
        let json = summary.to_json().unwrap();
        let decoded: OnboardingSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.servers[0].hostname, "stage-app-01.example.com");
        assert_eq!(decoded.alerts[0].kind, AlertKind::Log);
    }
}
