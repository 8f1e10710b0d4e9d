// src/tui/mod.rs
use crate::types::{CategorizedView, Listing, UiEvent};
use chrono::{DateTime, Local, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc;

const MAX_LOGS: usize = 20;

pub struct App {
    pub title: String,
    pub view: CategorizedView,
    pub polls: u64,
    pub last_poll: Option<DateTime<Utc>>,
    pub next_poll_in: Option<Duration>,
    pub logs: Vec<String>,
}

impl App {
    pub fn new(title: String) -> Self {
        Self {
            title,
            view: CategorizedView::default(),
            polls: 0,
            last_poll: None,
            next_poll_in: None,
            logs: Vec::new(),
        }
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PollCompleted { at, view, notified } => {
                self.polls += 1;
                self.last_poll = Some(at);
                self.next_poll_in = None;
                self.view = view;
                if notified > 0 {
                    self.push_log(format!("{} listing(s) sent to notifier", notified));
                }
            }
            UiEvent::NextPollIn(delay) => {
                self.next_poll_in = Some(delay);
            }
            UiEvent::Log(msg) => self.push_log(msg),
        }
    }

    fn push_log(&mut self, msg: String) {
        self.logs.push(msg);
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }
}

/// Owns the terminal until `q`/`Esc` is pressed or the engine hangs up.
/// Blocking: run it on a blocking thread.
pub fn run(mut rx: mpsc::Receiver<UiEvent>, title: String) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(title);

    let result: anyhow::Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            break Err(e.into());
        }

        match next_key(Duration::from_millis(100)) {
            Ok(Some(KeyCode::Char('q') | KeyCode::Esc)) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }

        let mut engine_gone = false;
        loop {
            match rx.try_recv() {
                Ok(event) => app.on_event(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    engine_gone = true;
                    break;
                }
            }
        }
        if engine_gone {
            break Ok(());
        }
    };

    restore(terminal)?;
    result
}

fn next_key(timeout: Duration) -> io::Result<Option<KeyCode>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            return Ok(Some(key.code));
        }
    }
    Ok(None)
}

fn restore(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Min(5),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(f.size());

    render_header(f, app, chunks[0]);

    render_table(
        f,
        chunks[1],
        "Listings Under Budget",
        Color::Cyan,
        ["Price ($)", "Size (GB/TB)", "Condition", "Link"],
        listing_rows(&app.view.under_budget),
    );

    if app.view.significant.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No significant listings found based on dynamic thresholds.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Significant Listings (Dynamic Threshold)"),
        );
        f.render_widget(empty, chunks[2]);
    } else {
        render_table(
            f,
            chunks[2],
            "Significant Listings (Dynamic Threshold)",
            Color::Red,
            ["Price ($)", "Size (GB/TB)", "Condition", "Link"],
            listing_rows(&app.view.significant),
        );
    }

    let cheapest: Vec<[String; 4]> = app
        .view
        .cheapest
        .iter()
        .map(|o| {
            [
                o.price.to_string(),
                o.condition.to_string(),
                o.size.clone(),
                o.link.clone(),
            ]
        })
        .collect();
    render_table(
        f,
        chunks[3],
        "Cheapest Listings by Condition and Size (Sorted)",
        Color::Green,
        ["Price ($)", "Condition", "Size (GB/TB)", "Link"],
        cheapest,
    );

    let logs: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .map(|s| ListItem::new(Line::from(Span::raw(s.as_str()))))
        .collect();
    let logs_list =
        List::new(logs).block(Block::default().borders(Borders::ALL).title("System Logs"));
    f.render_widget(logs_list, chunks[4]);
}

fn listing_rows(listings: &[Listing]) -> Vec<[String; 4]> {
    listings
        .iter()
        .map(|l| {
            [
                l.price.to_string(),
                l.size.clone(),
                l.condition.to_string(),
                l.link.clone(),
            ]
        })
        .collect()
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let last = match app.last_poll {
        Some(at) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "Waiting for first poll...".to_string(),
    };
    let next = match app.next_poll_in {
        Some(d) => format!("{}s", d.as_secs()),
        None => "-".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | Polls: {} | Last: ", app.polls)),
        Span::styled(
            last,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | Next in: {} | q to quit", next)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(header, area);
}

fn render_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    accent: Color,
    headers: [&str; 4],
    rows: Vec<[String; 4]>,
) {
    let header = Row::new(headers.to_vec()).style(
        Style::default()
            .fg(accent)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = rows.into_iter().map(Row::new).collect();
    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Min(20),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title.to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
