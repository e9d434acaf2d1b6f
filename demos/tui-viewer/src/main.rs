//! Terminal viewer for a running game.
//!
//! Run with: cargo run -p tui-viewer-demo -- http://localhost:8888/games/tictactoe/view/0
//!
//! Logs are written to stderr; redirect them (`2>viewer.log`) to keep the
//! board readable.

use std::{io, time::Duration};

use anyhow::Context as _;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
};
use stratum_view_core::{CellGrid, StateRenderer};
use stratum_view_transport::{
    Connection, Connector, PageLocation, Viewer,
    tui::{BoardWidget, StatusBar, ViewerCommand, command_for_event},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const BOARD_ROWS: usize = 3;
const BOARD_COLS: usize = 3;

type GameViewer = Viewer<Connection, CellGrid>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let page = std::env::args()
        .nth(1)
        .context("usage: tui-viewer-demo <page-url>")?;
    let location = PageLocation::parse(&page)?;
    let connector = Connector::new(&location)?;
    tracing::info!(endpoint = %connector.endpoint(), "Connecting");
    let connection = connector.connect().await?;

    let viewer = Viewer::new(
        connection,
        StateRenderer::new(CellGrid::new(BOARD_ROWS, BOARD_COLS)),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, viewer).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Default)]
struct App {
    winner: Option<String>,
    error: Option<String>,
    stream_open: bool,
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut viewer: GameViewer,
) -> anyhow::Result<()> {
    let mut app = App {
        stream_open: true,
        ..App::default()
    };

    loop {
        terminal.draw(|f| ui(f, &viewer, &app))?;

        if app.stream_open {
            tokio::select! {
                next = viewer.next_render() => match next {
                    Some(Ok(outcome)) => {
                        app.winner = outcome.winner;
                        app.error = None;
                    }
                    Some(Err(e)) => {
                        tracing::error!("Failed to render message: {e}");
                        app.error = Some(e.to_string());
                    }
                    None => app.stream_open = false,
                },
                () = tokio::time::sleep(Duration::from_millis(50)) => {}
            }
        }

        let timeout = if app.stream_open {
            Duration::ZERO
        } else {
            Duration::from_millis(100)
        };
        if event::poll(timeout)? {
            match command_for_event(&event::read()?) {
                ViewerCommand::Quit => return Ok(()),
                ViewerCommand::Redraw | ViewerCommand::Ignore => {}
            }
        }
    }
}

fn ui(f: &mut Frame, viewer: &GameViewer, app: &App) {
    let board = BoardWidget::new(viewer.surface()).title("tictactoe");
    let (width, height) = board.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(height), // Board
            Constraint::Min(0),
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    let board_area = Rect {
        width: width.min(chunks[0].width),
        ..chunks[0]
    };
    f.render_widget(board, board_area);

    let status = StatusBar {
        state: viewer.inbound().state(),
        winner: app.winner.as_deref(),
        error: app.error.as_deref(),
    };
    f.render_widget(status, chunks[2]);
}
