use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::difficulty_color;
use crate::app::{App, QuizMode, format_clock};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.title().to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        summary_line(app),
        Line::from(""),
    ];

    match app.notice() {
        Some(notice) => {
            content.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Red),
            )));
            content.push(Line::from(""));
            content.push(Line::from("q to quit".fg(Color::DarkGray)));
        }
        None => {
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                "ENTER",
                Style::default().fg(Color::Green).bold(),
            )));
            content.push(Line::from("to start".fg(Color::DarkGray)));
        }
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);
}

fn summary_line(app: &App) -> Line<'static> {
    let config = app.config();
    match app.mode() {
        QuizMode::Chapter { difficulty, .. } => Line::from(vec![
            Span::styled(
                difficulty.label().to_uppercase(),
                Style::default().fg(difficulty_color(*difficulty)).bold(),
            ),
            Span::styled(
                format!(
                    "  ·  up to {} questions  ·  {} per question",
                    config.questions_per_quiz,
                    format_clock(config.seconds_per_question)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        QuizMode::Mixed => Line::from(Span::styled(
            format!(
                "{} random questions  ·  {} total",
                config.mixed.count,
                format_clock(config.mixed.time_limit_seconds)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    }
}
