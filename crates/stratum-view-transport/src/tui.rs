//! Terminal front-end for ratatui applications.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};
use stratum_view_core::CellGrid;

use crate::websocket::ConnectionState;

/// What the front-end should do after a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Leave the viewer.
    Quit,
    /// Redraw the screen.
    Redraw,
    /// Nothing to do.
    Ignore,
}

/// Map a crossterm event to a viewer command.
///
/// The view is read-only, so only quitting and resizing matter.
#[must_use]
pub fn command_for_event(event: &Event) -> ViewerCommand {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL) => ViewerCommand::Quit,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }) => ViewerCommand::Quit,
        Event::Resize(_, _) => ViewerCommand::Redraw,
        _ => ViewerCommand::Ignore,
    }
}

/// Draws a [`CellGrid`] as a bordered table.
pub struct BoardWidget<'a> {
    grid: &'a CellGrid,
    title: &'a str,
    cell_width: u16,
}

impl<'a> BoardWidget<'a> {
    /// Create a widget for `grid`.
    #[must_use]
    pub const fn new(grid: &'a CellGrid) -> Self {
        Self {
            grid,
            title: "Board",
            cell_width: 3,
        }
    }

    /// Set the block title.
    #[must_use]
    pub const fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Set the width of each column.
    #[must_use]
    pub const fn cell_width(mut self, width: u16) -> Self {
        self.cell_width = width;
        self
    }

    /// Width and height needed to draw the whole grid.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        let cols = u16::try_from(self.grid.cols()).unwrap_or(u16::MAX);
        let rows = u16::try_from(self.grid.rows().count()).unwrap_or(u16::MAX);
        let width = cols
            .saturating_mul(self.cell_width.saturating_add(1))
            .saturating_add(1);
        (width, rows.saturating_add(2))
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widths = vec![Constraint::Length(self.cell_width); self.grid.cols()];
        let rows: Vec<Row> = self
            .grid
            .rows()
            .map(|row| {
                Row::new(
                    row.iter()
                        .map(|value| Cell::from(Line::from(value.as_str()).centered())),
                )
            })
            .collect();

        let table = Table::new(rows, widths)
            .column_spacing(1)
            .block(Block::default().borders(Borders::ALL).title(self.title));
        Widget::render(table, area, buf);
    }
}

/// One-line status bar: connection state, winner and last error.
pub struct StatusBar<'a> {
    /// Connection state.
    pub state: ConnectionState,
    /// Winner from the latest render.
    pub winner: Option<&'a str>,
    /// Latest render error.
    pub error: Option<&'a str>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label, color) = match self.state {
            ConnectionState::Connected => ("Connected", Color::Green),
            ConnectionState::Closed => ("Closed", Color::Yellow),
            ConnectionState::Failed => ("Failed", Color::Red),
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(label, Style::default().fg(color)),
        ];
        if let Some(winner) = self.winner {
            spans.push(Span::raw(" | winner: "));
            spans.push(Span::styled(winner, Style::default().fg(Color::Cyan)));
        }
        if let Some(error) = self.error {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(error, Style::default().fg(Color::Red)));
        }
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" quit "));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
