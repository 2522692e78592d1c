pub mod field;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::game::Game;

const SEPARATOR: Color = Color::Rgb(60, 60, 60);

pub fn render(frame: &mut Frame, app: &App) {
    let game = &app.game;
    let area = frame.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" Rustroids ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(130, 220, 255))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(4),    // Playfield
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(game)), chunks[0]);

    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let lines = field::render_field(game, fw, fh);
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    frame.render_widget(Paragraph::new(help_line()), chunks[2]);

    if game.is_over() {
        render_game_over(frame, chunks[1], game);
    }
}

fn status_line(game: &Game) -> Line<'static> {
    let lives = "\u{25B2} ".repeat(game.ship.lives as usize);
    Line::from(vec![
        Span::styled(" \u{2604} ", Style::default()),
        Span::styled(
            format!("Score: {} ", game.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Level: {} ", game.level),
            Style::default().fg(Color::Green),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("High: {} ", game.high_score),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            lives,
            Style::default().fg(Color::Rgb(80, 255, 140)).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn help_line() -> Line<'static> {
    Line::from(vec![
        Span::styled(" \u{2190}\u{2192} Rotate ", Style::default().fg(Color::DarkGray)),
        Span::styled("| ", Style::default().fg(SEPARATOR)),
        Span::styled("\u{2191} Thrust ", Style::default().fg(Color::DarkGray)),
        Span::styled("| ", Style::default().fg(SEPARATOR)),
        Span::styled(
            "Space Fire ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(SEPARATOR)),
        Span::styled("H Hyperspace ", Style::default().fg(Color::DarkGray)),
        Span::styled("| ", Style::default().fg(SEPARATOR)),
        Span::styled("Esc Quit", Style::default().fg(Color::DarkGray)),
    ])
}

fn render_game_over(frame: &mut Frame, area: Rect, game: &Game) {
    let overlay_w = 32u16.min(area.width);
    let overlay_h = 6u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));

    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Score: {}", game.score),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press ENTER to play again",
            Style::default().fg(Color::Gray),
        )),
    ];

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(p, overlay_area);
}
