use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, CollisionType, EndReason, Grid, Phase, Snapshot, format_duration};

/// Who is playing and the latest status notice, shown around the board
#[derive(Debug, Clone, Default)]
pub struct Hud<'a> {
    pub player: Option<&'a str>,
    pub notice: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, grid: Grid, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(snapshot, hud);
        frame.render_widget(stats, chunks[0]);

        // Two columns per cell plus the border
        let board_width = board_side(grid.width).saturating_mul(2).saturating_add(2);
        let board_height = board_side(grid.height).saturating_add(2);
        let [game_area] = Layout::horizontal([Constraint::Length(board_width)])
            .flex(Flex::Center)
            .areas(chunks[1]);
        let [game_area] = Layout::vertical([Constraint::Length(board_height)])
            .flex(Flex::Center)
            .areas(game_area);

        let board = self.render_grid(snapshot, grid);
        frame.render_widget(board, game_area);

        match snapshot.phase {
            Phase::Playing => {}
            Phase::Paused => {
                let area = centered(chunks[1], 24, 3);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_paused(), area);
            }
            Phase::GameOver => {
                let area = centered(chunks[1], 46, 12);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(snapshot, hud), area);
            }
        }

        // Render footer with controls
        let controls = self.render_controls(snapshot.phase);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, grid: Grid) -> Paragraph<'_> {
        let head = snapshot.head();
        let mut lines = Vec::with_capacity(grid.height);

        for y in 0..grid.height {
            let mut spans = Vec::with_capacity(grid.width);

            for x in 0..grid.width {
                let cell = Cell::new(x as i32, y as i32);

                let span = if Some(cell) == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.body.contains(&cell) {
                    // Snake body
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if cell == snapshot.food {
                    // Food
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    // Empty cell
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, hud: &Hud) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.snake_length().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::LightGreen),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(format_duration(snapshot.elapsed), Style::default().fg(Color::White)),
        ];

        if let Some(player) = hud.player {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Player: ", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(player.to_string(), Style::default().fg(Color::Cyan)));
        }

        let mut text = vec![Line::from(spans)];
        if snapshot.phase != Phase::GameOver && snapshot.high_score > 0 && snapshot.score > snapshot.high_score {
            text.push(Line::from(Span::styled(
                "NEW RECORD!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, snapshot: &Snapshot, hud: &Hud) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                end_reason_text(snapshot.end_reason),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", label),
                Span::styled(snapshot.score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Length Achieved: ", label),
                Span::styled(snapshot.snake_length().to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Time Played: ", label),
                Span::styled(format!("{}s", snapshot.elapsed.as_secs()), value),
            ]),
        ];

        if snapshot.is_new_record() {
            text.push(Line::from(Span::styled(
                "NEW HIGH SCORE!",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if let Some(notice) = hud.notice {
            text.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "SPACE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'_> {
        let pause_label = match phase {
            Phase::Paused => " to resume | ",
            _ => " to pause | ",
        };
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(pause_label),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// Grid side as a terminal length, clamped to what a terminal can address
fn board_side(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn end_reason_text(reason: Option<EndReason>) -> &'static str {
    match reason {
        Some(EndReason::Collision(CollisionType::Wall)) => "You hit the wall",
        Some(EndReason::Collision(CollisionType::SelfCollision)) => "You bit your own tail",
        Some(EndReason::BoardFull) => "The board is full - you win!",
        None => "",
    }
}

/// A `width` x `height` rect centered in `area`, clipped to it
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}
