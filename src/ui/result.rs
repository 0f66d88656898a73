use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::difficulty_color;
use crate::app::App;
use crate::models::Question;
use crate::session::{CompletionReason, QuizResult};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.last_result() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], result);
    render_question_breakdown(frame, chunks[2], app, app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        80..=100 => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &QuizResult) {
    let percentage = result.percentage();
    let heading = match result.reason {
        CompletionReason::Finished => "RESULTS",
        CompletionReason::TimeExpired => "TIME'S UP",
    };

    let achievements = if result.achievements.is_empty() {
        "no achievements".to_string()
    } else {
        result
            .achievements
            .iter()
            .map(|a| a.title())
            .collect::<Vec<_>>()
            .join("  ")
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(result.label.as_str().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", result.score, result.total, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} points  ·  best streak {}",
                result.points, result.best_streak
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            achievements,
            Style::default().fg(Color::Yellow),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App, scroll: usize) {
    let session = app.session();
    let lines: Vec<Line> = session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| breakdown_line(index, question, session.answer_at(index)))
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn breakdown_line(index: usize, question: &Question, answer: Option<&str>) -> Line<'static> {
    let (symbol, color) = match answer {
        Some(answer) if question.is_correct(answer) => ("+", Color::Green),
        Some(_) => ("-", Color::Red),
        None => ("?", Color::DarkGray),
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
        Span::styled(
            format!("{:2}. ", index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("[{:<6}] ", question.difficulty.label()),
            Style::default().fg(difficulty_color(question.difficulty)),
        ),
    ];
    if let Some(topic) = &question.topic {
        spans.push(Span::styled(
            format!("{}: ", topic),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled(
        truncate_question(&question.text),
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
