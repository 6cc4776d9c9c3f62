use clap::{Arg, ArgAction, ArgMatches, Command};
use instamon::model::seed_servers;
use instamon::session::{WizardAction, WizardSession, SIMULATED_CHECK_DELAY};
use instamon::OnboardingSummary;
use std::time::{Duration, Instant};

pub mod tui;

#[tokio::main]
async fn main() {
    let matches = Command::new("instamon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("InstaMonitor onboarding wizard")
        .subcommand(
            Command::new("start")
                .about("Run the interactive onboarding wizard")
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .help("Simulated connectivity check delay in milliseconds")
                        .default_value("2000"),
                ),
        )
        .subcommand(
            Command::new("servers")
                .about("List the server inventory the wizard onboards")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the inventory as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Run the connectivity simulation headlessly against all servers")
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .default_value("2000"),
                ),
        )
        .subcommand(
            Command::new("plan").about("Print the empty onboarding summary JSON shape"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("servers", sub)) => list_servers(sub),
        Some(("check", sub)) => run_headless_check(parse_delay(sub)).await,
        Some(("plan", _)) => print_plan(),
        Some(("start", sub)) => run_wizard(parse_delay(sub)),
        _ => {
            // Default to the wizard if no subcommand is provided
            run_wizard(SIMULATED_CHECK_DELAY);
        }
    }
}

fn parse_delay(matches: &ArgMatches) -> Duration {
    let millis = matches
        .get_one::<String>("delay-ms")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(SIMULATED_CHECK_DELAY.as_millis() as u64);
    Duration::from_millis(millis)
}

fn list_servers(matches: &ArgMatches) {
    let servers = seed_servers();

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&servers) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to encode inventory: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for server in &servers {
        println!(
            "{:<3} {:<28} {}",
            server.id,
            server.hostname,
            server.environment().label()
        );
    }
}

fn print_plan() {
    let session = WizardSession::new();
    let summary = OnboardingSummary::from_session(&session);
    match summary.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to encode summary: {}", e);
            std::process::exit(1);
        }
    }
}

/// Drive a full connectivity round through the session without a terminal:
/// select everything, arm the check, wait out the delay, report.
async fn run_headless_check(delay: Duration) {
    let mut session = WizardSession::with_delay(delay);
    let ids: Vec<u32> = session.servers().iter().map(|s| s.id).collect();
    for id in ids {
        session.apply(WizardAction::ToggleServer(id));
    }

    session.apply(WizardAction::Next);
    session.tick(Instant::now());
    for server in session.servers() {
        println!("⏳ {:<28} {}", server.hostname, server.connectivity.label());
    }

    tokio::time::sleep(delay).await;
    session.tick(Instant::now());

    for server in session.servers() {
        println!("✅ {:<28} {}", server.hostname, server.connectivity.label());
    }
}

fn run_wizard(delay: Duration) {
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use std::io;

    // Setup Terminal
    enable_raw_mode().expect("Failed to enable raw mode");
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).expect("Failed to setup terminal");
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).expect("Failed to create terminal");

    // Create App and Run
    let app = tui::app::App::new(delay);
    let res = tui::events::run_app(&mut terminal, app);

    // Restore Terminal
    disable_raw_mode().expect("Failed to disable raw mode");
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .expect("Failed to restore terminal");
    terminal.show_cursor().expect("Failed to show cursor");

    match res {
        Ok(app) => {
            if app.session.is_complete() {
                let summary = OnboardingSummary::from_session(&app.session);
                match summary.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("❌ Failed to encode summary: {}", e),
                }
            }
        }
        Err(err) => eprintln!("❌ TUI Error: {:?}", err),
    }
}
