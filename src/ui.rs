//! Terminal UI rendering with ratatui
//!
//! Pure presentation: reads the engine snapshot and score state, never writes
//! engine state.

use crate::board::{BOARD_COLS, BOARD_ROWS, Cell};
use crate::game::{Game, GameState};
use crate::menu::{Menu, MenuScreen};
use crate::mode::GameMode;
use crate::settings::Settings;
use crate::tetromino::{Rotation, TetrominoType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Total width needed: hold(12) + board(22) + next/stats(18)
const GAME_WIDTH: u16 = 52;
/// Board plus borders
const GAME_HEIGHT: u16 = 22;

/// Render the menu screens
pub fn render_menu(frame: &mut Frame, menu: &Menu, settings: &Settings) {
    let area = frame.area();
    let menu_area = center_rect(area, 46, 18);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8)])
        .split(menu_area);

    let title_lines = vec![
        Line::raw(""),
        Line::styled(
            "▐▛▀▖ QUADFALL",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Line::styled(
            "▝▙▄▘ falling blocks, no mercy",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(
        Paragraph::new(title_lines).alignment(Alignment::Center),
        layout[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    match menu.screen {
        MenuScreen::Main => render_main_menu(frame, menu, inner),
        MenuScreen::HighScores => render_high_scores(frame, menu, settings, inner),
    }
}

fn render_main_menu(frame: &mut Frame, menu: &Menu, area: Rect) {
    let mut lines = vec![Line::raw("")];
    for (i, label) in menu.labels().iter().enumerate() {
        let selected = i == menu.selected;
        let prefix = if selected { "▶ " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::styled(format!("{}{}", prefix, label), style));
        lines.push(Line::raw(""));
    }
    if let Some(mode) = GameMode::all().get(menu.selected) {
        lines.push(Line::styled(
            mode.description().to_string(),
            Style::default().fg(Color::Gray),
        ));
    }
    lines.push(Line::styled(
        "↑↓ Select  Enter Confirm  q Quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_high_scores(frame: &mut Frame, menu: &Menu, settings: &Settings, area: Rect) {
    let mode = menu.high_score_mode();
    let mut lines = vec![
        Line::styled(
            format!("◀ {} ▶", mode.name().to_uppercase()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Line::raw(""),
    ];

    let table = match mode {
        GameMode::Marathon => &settings.high_scores.marathon,
        GameMode::Sprint => &settings.high_scores.sprint,
        GameMode::Ultra => &settings.high_scores.ultra,
        GameMode::Zen => unreachable!("zen is not ranked"),
    };

    if table.is_empty() {
        lines.push(Line::styled(
            "No scores yet",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (i, entry) in table.iter().enumerate() {
        let value = match entry.time_ms {
            Some(ms) => format!("{:>2}. {:>7}.{:02}s", i + 1, ms / 1000, (ms % 1000) / 10),
            None => format!("{:>2}. {:>9}", i + 1, entry.score),
        };
        lines.push(Line::from(vec![
            Span::styled(value, Style::default().fg(Color::White)),
            Span::styled(
                format!("  L{} {}", entry.level, entry.date),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "←→ Mode  Esc Back",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings, flash: Option<&str>) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Hold box
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(18), // Next queue + stats
        ])
        .split(game_area);

    render_hold(frame, main_layout[0], game);
    render_board(frame, main_layout[1], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(main_layout[2]);

    render_next_queue(frame, right_layout[0], game);
    render_stats(frame, right_layout[1], game, flash);

    render_overlay(frame, main_layout[1], game);
}

fn render_hold(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default().borders(Borders::ALL).title(" HOLD ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece_type) = game.hold else { return };
    let mut lines = vec![Line::raw("")];
    let shape = piece_type.shape(Rotation::North);
    for row in 0..shape.size() {
        let mut spans = vec![Span::raw(" ")];
        for col in 0..shape.size() {
            if shape.filled(col, row) {
                spans.push(Span::styled("██", Style::default().fg(piece_type.color())));
            } else {
                spans.push(Span::raw("  "));
            }
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    // Flash the border while the board is still shaking from an impact
    let border_style = if game.shake() > 2.0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = game.snapshot();
    let (piece_cells, piece_color) = match snapshot.piece {
        Some(piece) => (piece.cells().collect::<Vec<_>>(), piece.piece_type.color()),
        None => (Vec::new(), Color::Reset),
    };
    let ghost_cells: Vec<(i32, i32)> = match (snapshot.piece, snapshot.ghost_y) {
        (Some(piece), Some(ghost_y)) if settings.visual.show_ghost => {
            let dy = ghost_y - piece.y;
            piece.cells().map(|(x, y)| (x, y + dy)).collect()
        }
        _ => Vec::new(),
    };

    let (solid, shade) = settings.visual.block_chars();
    let mut lines = Vec::with_capacity(BOARD_ROWS);
    for (y, row) in snapshot.board.rows().enumerate() {
        let mut spans = Vec::with_capacity(BOARD_COLS);
        for (x, cell) in row.iter().enumerate() {
            let here = (x as i32, y as i32);
            let span = if piece_cells.contains(&here) {
                Span::styled(solid, Style::default().fg(piece_color))
            } else if ghost_cells.contains(&here) {
                Span::styled(shade, Style::default().fg(Color::DarkGray))
            } else {
                match cell {
                    Cell::Filled(color) => Span::styled(solid, Style::default().fg(*color)),
                    Cell::Empty => Span::raw("  "),
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next_queue(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default().borders(Borders::ALL).title(" NEXT ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for piece_type in game.preview() {
        // The spawn shape's occupied cells all sit in the top two matrix rows
        lines.push(shape_row_line(piece_type, 0));
        lines.push(shape_row_line(piece_type, 1));
        lines.push(Line::raw(""));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn shape_row_line(piece_type: TetrominoType, row: usize) -> Line<'static> {
    let shape = piece_type.shape(Rotation::North);
    let mut spans = vec![Span::raw(" ")];
    for col in 0..shape.size() {
        if shape.filled(col, row) {
            spans.push(Span::styled("██", Style::default().fg(piece_type.color())));
        } else {
            spans.push(Span::raw("  "));
        }
    }
    Line::from(spans)
}

fn render_stats(frame: &mut Frame, area: Rect, game: &Game, flash: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", game.mode().name().to_uppercase()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        stat_line("Score", game.score.points.to_string()),
        stat_line("Level", game.score.level.to_string()),
        stat_line("Lines", game.score.lines.to_string()),
    ];

    match game.mode() {
        GameMode::Sprint => {
            if let Some(remaining) = game.clock.lines_remaining(game.score.lines) {
                lines.push(stat_line("Left", remaining.to_string()));
            }
            lines.push(stat_line("Time", game.clock.format_elapsed()));
        }
        GameMode::Ultra => {
            if let Some(remaining) = game.clock.format_remaining() {
                lines.push(stat_line("Time", remaining));
            }
        }
        _ => {}
    }

    if game.score.combo > 1 {
        lines.push(Line::styled(
            format!(" Combo x{}", game.score.combo),
            Style::default().fg(Color::Yellow).bold(),
        ));
    }
    if let Some(text) = flash {
        lines.push(Line::styled(
            format!(" {}", text),
            Style::default().fg(Color::Cyan).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<6}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White).bold()),
    ])
}

fn render_overlay(frame: &mut Frame, board_area: Rect, game: &Game) {
    let text = match game.state {
        GameState::Paused => vec![
            Line::styled("PAUSED", Style::default().fg(Color::Yellow).bold()),
            Line::raw(""),
            Line::styled("p to resume", Style::default().fg(Color::Gray)),
        ],
        GameState::GameOver => vec![
            Line::styled("GAME OVER", Style::default().fg(Color::Red).bold()),
            Line::raw(""),
            Line::styled(
                format!("Score {}", game.score.points),
                Style::default().fg(Color::White),
            ),
        ],
        GameState::Complete => vec![
            Line::styled("FINISHED!", Style::default().fg(Color::Green).bold()),
            Line::raw(""),
            Line::styled(
                match game.mode() {
                    GameMode::Sprint => format!("Time {}", game.clock.format_elapsed()),
                    _ => format!("Score {}", game.score.points),
                },
                Style::default().fg(Color::White),
            ),
        ],
        GameState::Playing => return,
    };

    let overlay = center_rect(board_area, 16, 5);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        inner,
    );
}

/// Center a fixed-size rect inside an area, clamped to fit
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
