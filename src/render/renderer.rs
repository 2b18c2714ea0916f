use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::Screen;
use crate::game::{CellId, CellView, GameConfig, GameOverKind, Phase};
use crate::input::key_for_cell;
use crate::metrics::GameMetrics;

/// Width of one cell on screen, borders included
const CELL_WIDTH: u16 = 9;
/// Height of one cell on screen, borders included
const CELL_HEIGHT: u16 = 3;

pub struct Renderer {
    columns: usize,
    rows: usize,
    /// Screen rectangle of every cell as last drawn, indexed by cell id
    cell_rects: Vec<Rect>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::for_config(&GameConfig::default())
    }

    /// Renderer for the board shape of `config`
    pub fn for_config(config: &GameConfig) -> Self {
        Self {
            columns: config.columns.max(1),
            rows: config.rows(),
            cell_rects: Vec::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        screen: &Screen,
        phase: Phase,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(screen, metrics);
        frame.render_widget(stats, chunks[0]);

        let frame_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Whack-a-Mole ");
        let inner = frame_block.inner(chunks[1]);
        frame.render_widget(frame_block, chunks[1]);

        // Game-over panel goes under the board so the final board stays visible
        let message_height = if matches!(phase, Phase::Over(_)) { 7 } else { 0 };
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(message_height)])
            .split(inner);
        let board_area = body[0];

        self.layout_board(board_area, screen.board.len());
        for (id, (view, rect)) in screen.board.cells.iter().zip(&self.cell_rects).enumerate() {
            if !rect.is_empty() {
                frame.render_widget(self.render_cell(id, *view), *rect);
            }
        }

        if let Phase::Over(kind) = phase {
            let panel = centered(body[1], 44, message_height);
            frame.render_widget(self.render_game_over(kind, screen), panel);
        }

        let controls = self.render_controls(phase);
        frame.render_widget(controls, chunks[2]);
    }

    /// Lay `grid_size` cells out on the configured columns, centered in `area`.
    ///
    /// Cells that do not fit in `area` get an empty rectangle.
    pub fn layout_board(&mut self, area: Rect, grid_size: usize) {
        let cell_width = usize::from(CELL_WIDTH);
        let cell_height = usize::from(CELL_HEIGHT);
        let board_width = self.columns.saturating_mul(cell_width);
        let board_height = self.rows.saturating_mul(cell_height);
        let origin_x = usize::from(area.x) + usize::from(area.width).saturating_sub(board_width) / 2;
        let origin_y =
            usize::from(area.y) + usize::from(area.height).saturating_sub(board_height) / 2;
        let right = usize::from(area.right());
        let bottom = usize::from(area.bottom());

        self.cell_rects.clear();
        for id in 0..grid_size {
            let x = origin_x.saturating_add((id % self.columns).saturating_mul(cell_width));
            let y = origin_y.saturating_add((id / self.columns).saturating_mul(cell_height));
            let fits =
                x.saturating_add(cell_width) <= right && y.saturating_add(cell_height) <= bottom;
            let rect = match (u16::try_from(x).ok(), u16::try_from(y).ok()) {
                (Some(x), Some(y)) if fits => Rect::new(x, y, CELL_WIDTH, CELL_HEIGHT),
                _ => Rect::default(),
            };
            self.cell_rects.push(rect);
        }
    }

    pub fn cell_rect(&self, cell_id: CellId) -> Option<Rect> {
        self.cell_rects.get(cell_id).copied()
    }

    /// Cell drawn at terminal position `(column, row)`, if any
    pub fn cell_at(&self, column: u16, row: u16) -> Option<CellId> {
        self.cell_rects.iter().position(|rect| {
            !rect.is_empty()
                && column >= rect.x
                && column < rect.right()
                && row >= rect.y
                && row < rect.bottom()
        })
    }

    fn render_cell(&self, id: CellId, view: CellView) -> Paragraph<'static> {
        let (symbol, style) = match view {
            CellView::Empty => ("   ", Style::default().fg(Color::DarkGray)),
            CellView::Mole => (
                "(o)",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            // The snake is drawn on top of a mole sharing its cell
            CellView::Snake | CellView::MoleAndSnake => (
                "~S~",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        let title = key_for_cell(id).map(|key| format!(" {key} ")).unwrap_or_default();

        Paragraph::new(Line::from(Span::styled(symbol, style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Gray))
                    .title(title),
            )
    }

    fn render_stats(&self, screen: &Screen, metrics: &GameMetrics) -> Paragraph<'static> {
        let time_style = if screen.time_left <= 5 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                screen.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(screen.time_left.to_string(), time_style),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, kind: GameOverKind, screen: &Screen) -> Paragraph<'static> {
        let text = vec![
            Line::from(vec![Span::styled(
                kind.message(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    screen.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let start_hint = match phase {
            Phase::Idle => " to start | ",
            Phase::Running => " to restart | ",
            Phase::Over(_) => " to play again | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("Click", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("cell key", Style::default().fg(Color::Cyan)),
            Span::raw(" to whack | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(start_hint),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BoardView;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_layout_centers_board() {
        let mut renderer = Renderer::new();
        renderer.layout_board(Rect::new(0, 0, 80, 24), 12);

        assert_eq!(renderer.cell_rect(0), Some(Rect::new(22, 7, 9, 3)));
        assert_eq!(renderer.cell_rect(6), Some(Rect::new(40, 10, 9, 3)));
        assert_eq!(renderer.cell_rect(12), None);
    }

    #[test]
    fn test_hit_testing() {
        let mut renderer = Renderer::new();
        renderer.layout_board(Rect::new(0, 0, 80, 24), 12);

        assert_eq!(renderer.cell_at(22, 7), Some(0));
        assert_eq!(renderer.cell_at(30, 9), Some(0));
        assert_eq!(renderer.cell_at(31, 7), Some(1));
        assert_eq!(renderer.cell_at(57, 15), Some(11));
        assert_eq!(renderer.cell_at(21, 7), None);
        assert_eq!(renderer.cell_at(58, 16), None);
    }

    #[test]
    fn test_cells_that_do_not_fit_are_not_clickable() {
        let mut renderer = Renderer::new();
        renderer.layout_board(Rect::new(0, 0, 20, 4), 12);

        assert_eq!(renderer.cell_at(0, 0), Some(0));
        assert_eq!(renderer.cell_rect(2), Some(Rect::default()));
        assert_eq!(renderer.cell_rect(11), Some(Rect::default()));
        assert_eq!(renderer.cell_at(19, 1), None);
    }

    #[test]
    fn test_tall_board_beyond_terminal_coordinates() {
        let config = GameConfig::new(30_000, 1);
        assert!(config.validate().is_ok());
        let mut renderer = Renderer::for_config(&config);
        renderer.layout_board(Rect::new(0, 0, 80, 24), config.grid_size);

        assert_eq!(renderer.cell_rect(0), Some(Rect::new(35, 0, 9, 3)));
        assert_eq!(renderer.cell_rect(7), Some(Rect::new(35, 21, 9, 3)));
        assert_eq!(renderer.cell_rect(8), Some(Rect::default()));
        // Row 25_000 starts past u16::MAX
        assert_eq!(renderer.cell_rect(25_000), Some(Rect::default()));
        assert_eq!(renderer.cell_rect(29_999), Some(Rect::default()));
        assert_eq!(renderer.cell_at(36, 23), Some(7));
        assert_eq!(renderer.cell_at(36, 24), None);
    }

    #[test]
    fn test_draws_tall_board() {
        let config = GameConfig::new(30_000, 1);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut renderer = Renderer::for_config(&config);
        let screen = Screen {
            board: BoardView {
                cells: vec![CellView::Mole; config.grid_size],
            },
            score: 0,
            time_left: 30,
            message: None,
        };

        terminal
            .draw(|frame| renderer.render(frame, &screen, Phase::Running, &GameMetrics::new()))
            .unwrap();
        assert!(renderer.cell_rect(0).is_some_and(|rect| !rect.is_empty()));
    }

    #[test]
    fn test_draws_board_and_game_over() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut renderer = Renderer::new();
        let mut cells = vec![CellView::Empty; 12];
        cells[0] = CellView::Mole;
        cells[1] = CellView::Snake;
        let screen = Screen {
            board: BoardView { cells },
            score: 7,
            time_left: 21,
            message: Some(GameOverKind::Timeout),
        };

        terminal
            .draw(|frame| {
                renderer.render(
                    frame,
                    &screen,
                    Phase::Over(GameOverKind::Timeout),
                    &GameMetrics::new(),
                )
            })
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Score: 7"));
        assert!(content.contains("(o)"));
        assert!(content.contains("~S~"));
        assert!(content.contains("Time is over!"));
    }
}
