use crate::tui::app::App;
use instamon::model::{AlertParams, ConnectivityStatus, Server, Severity};
use instamon::session::WizardStep;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Stepper
                Constraint::Min(0),    // Step content
                Constraint::Length(6), // Event feed
                Constraint::Length(3), // Footer/Help
            ]
            .as_ref(),
        )
        .split(f.area());

    render_stepper(f, app, chunks[0]);

    match app.session.step() {
        WizardStep::SelectServers => render_select_servers(f, app, chunks[1]),
        WizardStep::CheckConnectivity => render_check_connectivity(f, app, chunks[1]),
        WizardStep::ChooseServices => render_choose_services(f, app, chunks[1]),
        WizardStep::ConfigurePaths => render_configure_paths(f, app, chunks[1]),
        WizardStep::SetupAlerts => render_setup_alerts(f, app, chunks[1]),
        WizardStep::Complete => render_complete(f, app, chunks[1]),
    }

    render_events(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn render_stepper(f: &mut Frame, app: &App, area: Rect) {
    let current = app.session.step().index();

    let titles = WizardStep::TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let step = i + 1;
            if current > step {
                Line::from(Span::styled(
                    format!("✓ {}", title),
                    Style::default().fg(Color::Green),
                ))
            } else if current == step {
                Line::from(Span::styled(
                    format!("{}. {}", step, title),
                    Style::default().fg(Color::Blue),
                ))
            } else {
                Line::from(Span::styled(
                    format!("{}. {}", step, title),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" InstaMonitor Onboarding "),
        )
        .select(current.saturating_sub(1).min(WizardStep::COUNT - 1))
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_select_servers(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select Servers to Monitor ");

    let items: Vec<ListItem> = app
        .session
        .servers()
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let style = if i == app.cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let mark_style = if server.selected {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", checkbox(server.selected)), mark_style),
                Span::raw(server.hostname.clone()),
                Span::styled(
                    format!("  {}", server.environment().label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
            .style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

pub(crate) fn status_span(server: &Server, spinner: &'static str) -> Span<'static> {
    match server.connectivity {
        ConnectivityStatus::Pending => Span::styled(
            format!("{} pending", spinner),
            Style::default().fg(Color::Yellow),
        ),
        ConnectivityStatus::Success => {
            Span::styled("✓ success".to_string(), Style::default().fg(Color::Green))
        }
        ConnectivityStatus::Failed => {
            Span::styled("✗ failed".to_string(), Style::default().fg(Color::Red))
        }
    }
}

fn render_check_connectivity(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Check Server Connectivity ");

    let selected: Vec<&Server> = app
        .session
        .servers()
        .iter()
        .filter(|s| s.selected)
        .collect();

    if selected.is_empty() {
        let msg = Paragraph::new("No servers selected. Press Shift+Tab to go back.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let spinner = SPINNER_FRAMES[app.tick_count as usize % SPINNER_FRAMES.len()];
    let items: Vec<ListItem> = selected
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let style = if i == app.cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let detail = match server.connectivity {
                ConnectivityStatus::Pending => "Checking agent connectivity...",
                _ => "Agent connection established",
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {:<28}", server.hostname)),
                status_span(server, spinner),
                Span::styled(
                    format!("  {}", detail),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
            .style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_choose_services(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Choose Services to Install ");

    let selected: Vec<&Server> = app
        .session
        .servers()
        .iter()
        .filter(|s| s.selected)
        .collect();

    if selected.is_empty() {
        let msg = Paragraph::new("No servers selected.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = selected
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let row_style = if i == app.cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let cell_style = |col: usize, on: bool| {
                let mut style = if on {
                    Style::default().fg(Color::Blue)
                } else {
                    Style::default()
                };
                if i == app.cursor && col == app.service_col {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                style
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {:<28}", server.hostname)),
                Span::styled(
                    format!("{} Metricbeat (metrics)", checkbox(server.metricbeat)),
                    cell_style(0, server.metricbeat),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("{} Filebeat (logs)", checkbox(server.filebeat)),
                    cell_style(1, server.filebeat),
                ),
            ]))
            .style(row_style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_configure_paths(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Configure Log Paths ");

    let targets: Vec<&Server> = app
        .session
        .servers()
        .iter()
        .filter(|s| s.selected && s.filebeat)
        .collect();

    if targets.is_empty() {
        let msg = Paragraph::new(
            "No servers with Filebeat enabled.\nPress Shift+Tab to go back and enable log collection.",
        )
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, server) in targets.iter().enumerate() {
        let header_style = if i == app.cursor {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(" {}", server.hostname),
            header_style,
        )));
        for path in &server.log_paths {
            lines.push(Line::from(Span::styled(
                format!("   │ {}", path),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if i == app.cursor {
            lines.push(Line::from(vec![
                Span::styled("   > ", Style::default().fg(Color::Blue)),
                Span::raw(app.input_buffer.clone()),
                Span::styled("_", Style::default().fg(Color::Blue)),
            ]));
        }
        lines.push(Line::raw(""));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_setup_alerts(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Configure Monitoring Alerts ");

    let mut lines: Vec<Line> = Vec::new();
    for (i, rule) in app.session.alerts().iter().enumerate() {
        let cursored = i == app.cursor;
        let header_style = if cursored {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {}", checkbox(rule.enabled), rule.name),
            header_style,
        )));

        if rule.enabled {
            match &rule.params {
                AlertParams::Threshold { warning, critical } => {
                    let col_style = |col: usize| {
                        if cursored && col == app.threshold_col {
                            Style::default()
                                .fg(Color::Blue)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::DarkGray)
                        }
                    };
                    lines.push(Line::from(vec![
                        Span::raw("     "),
                        Span::styled(format!("warning: {}%", warning), col_style(0)),
                        Span::raw("   "),
                        Span::styled(format!("critical: {}%", critical), col_style(1)),
                    ]));
                }
                AlertParams::Processes(processes) => {
                    for name in processes {
                        lines.push(Line::from(Span::styled(
                            format!("     │ {}", name),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                    if cursored {
                        lines.push(Line::from(vec![
                            Span::styled("     > ", Style::default().fg(Color::Blue)),
                            Span::raw(app.input_buffer.clone()),
                            Span::styled("_", Style::default().fg(Color::Blue)),
                        ]));
                    }
                }
                AlertParams::Keywords(keywords) => {
                    for kw in keywords {
                        let sev_color = match kw.severity {
                            Severity::Warning => Color::Yellow,
                            Severity::Critical => Color::Red,
                        };
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("     │ {} ", kw.keyword),
                                Style::default().fg(Color::DarkGray),
                            ),
                            Span::styled(
                                format!("({})", kw.severity.label()),
                                Style::default().fg(sev_color),
                            ),
                        ]));
                    }
                    if cursored {
                        lines.push(Line::from(vec![
                            Span::styled("     > ", Style::default().fg(Color::Blue)),
                            Span::raw(app.input_buffer.clone()),
                            Span::styled("_", Style::default().fg(Color::Blue)),
                            Span::styled(
                                format!("  [{}]", app.severity.label()),
                                Style::default().fg(Color::Cyan),
                            ),
                        ]));
                    }
                }
            }
        }
        lines.push(Line::raw(""));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_complete(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::raw(""),
        Line::raw(""),
        Line::from(Span::styled(
            "Congratulations! 🎉",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("You have successfully onboarded to InstaMonitor"),
        Line::raw(""),
        Line::from(Span::styled(
            "Your servers are now being monitored.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "The configured summary is printed on exit.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        Line::raw(""),
        Line::from(Span::styled(
            "[r] Restart onboarding   [q] Quit",
            Style::default().fg(Color::Cyan),
        )),
    ];
    let para = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(para, inner);

    // Paint confetti over the celebration screen.
    let buf = f.buffer_mut();
    for p in &app.confetti {
        let x = inner.x + (p.x * inner.width.saturating_sub(1) as f32) as u16;
        let y = inner.y + (p.y * inner.height.saturating_sub(1) as f32) as u16;
        if x >= inner.x
            && x < inner.x + inner.width
            && y >= inner.y
            && y < inner.y + inner.height
        {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(p.glyph).set_fg(p.color);
            }
        }
    }
}

fn render_events(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Events ");

    let visible = area.height.saturating_sub(2) as usize;
    let mut recent: Vec<&String> = app.events.iter().rev().take(visible.max(1)).collect();
    recent.reverse();
    let text = recent
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let delay_secs = app.session.delay().as_secs_f32();
    let help = match app.session.step() {
        WizardStep::SelectServers => {
            " ↑/↓: Move | Space: Select | Enter/Tab: Next | q: Quit".to_string()
        }
        WizardStep::CheckConnectivity => format!(
            " Checks resolve in ~{:.0}s | Enter/Tab: Next | Shift+Tab: Back | q: Quit",
            delay_secs
        ),
        WizardStep::ChooseServices => {
            " ↑/↓: Move | ←/→: Service | Space: Toggle | Enter/Tab: Next | Shift+Tab: Back"
                .to_string()
        }
        WizardStep::ConfigurePaths => {
            " ↑/↓: Server | Type path, Enter: Add | Tab: Next | Shift+Tab: Back | Esc: Quit"
                .to_string()
        }
        WizardStep::SetupAlerts => {
            " ↑/↓: Rule | Space: Toggle | +/-: Thresholds | ←/→: Column/Severity | Tab: Finish"
                .to_string()
        }
        WizardStep::Complete => " r: Restart | q: Quit".to_string(),
    };

    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
