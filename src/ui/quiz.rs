use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use super::difficulty_color;
use crate::app::{App, ToastKind, format_clock};
use crate::models::Question;
use crate::session::QuizSession;

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const LOW_TIME_SECONDS: u32 = 30;
const ANSWERING_HINT: &str = "j/k navigate  ·  space/a-h select  ·  enter submit  ·  q quit";

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app, question);
    render_stats(frame, chunks[1], session);
    render_question_text(frame, chunks[2], &question.text);
    render_options(frame, chunks[3], session, question, app.highlighted());
    if session.feedback_active() {
        render_feedback(frame, chunks[4], session, question);
    }
    render_controls(frame, chunks[5], session.feedback_active());
    render_toasts(frame, area, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let session = app.session();
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let title = Line::from(vec![
        Span::styled(app.title(), Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            question.difficulty.label().to_uppercase(),
            Style::default().fg(difficulty_color(question.difficulty)),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), left);

    let progress = format!(
        "{}/{}",
        session.position() + 1,
        session.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, right);
}

fn render_stats(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let remaining = session.remaining_seconds();
    let clock_color = if remaining <= LOW_TIME_SECONDS {
        Color::Red
    } else {
        Color::Gray
    };

    let stats = Line::from(vec![
        Span::styled("points ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            session.points().to_string(),
            Style::default().fg(Color::Blue).bold(),
        ),
        Span::styled("   streak ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            session.streak().to_string(),
            Style::default().fg(Color::LightRed).bold(),
        ),
        Span::styled("   best ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            session.best_streak().to_string(),
            Style::default().fg(Color::Green).bold(),
        ),
        Span::styled("   time ", Style::default().fg(Color::DarkGray)),
        Span::styled(format_clock(remaining), Style::default().fg(clock_color).bold()),
    ]);
    frame.render_widget(Paragraph::new(stats), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    session: &QuizSession,
    question: &Question,
    highlighted: usize,
) {
    let feedback = session.feedback_active();
    let chosen = if feedback {
        session.answer_at(session.position())
    } else {
        session.pending()
    };

    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);
    for (index, option) in question.options.iter().enumerate() {
        let is_chosen = chosen == Some(option.as_str());
        let is_correct = question.is_correct(option);

        let style = if feedback && is_correct {
            Style::default().fg(Color::Green).bold()
        } else if feedback && is_chosen {
            Style::default().fg(Color::Red).bold()
        } else if is_chosen {
            Style::default().fg(Color::Cyan).bold()
        } else if index == highlighted && !feedback {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };

        let marker = match (feedback, is_correct, is_chosen) {
            (true, true, _) => "+",
            (true, false, true) => "x",
            (false, _, _) if index == highlighted => ">",
            _ => " ",
        };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, session: &QuizSession, question: &Question) {
    let correct = session
        .answer_at(session.position())
        .is_some_and(|answer| question.is_correct(answer));

    let verdict = if correct {
        Span::styled("Correct!", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(
            format!("The answer is {}", question.correct_answer),
            Style::default().fg(Color::Red).bold(),
        )
    };

    let mut lines = vec![Line::from(verdict)];
    if let Some(explanation) = &question.explanation {
        lines.push(Line::from(Span::styled(
            explanation.as_str(),
            Style::default().fg(Color::Blue),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Color::Blue)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, feedback: bool) {
    let hint = if feedback {
        "enter continue  ·  q quit"
    } else {
        ANSWERING_HINT
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_toasts(frame: &mut Frame, area: Rect, app: &App) {
    let mut row = area.y + 1;
    for toast in app.toasts() {
        let (text, color) = match &toast.kind {
            ToastKind::Achievement(achievement) => {
                (format!("* {} *", achievement.title()), Color::Yellow)
            }
            ToastKind::Points(points) => (format!("+{} points!", points), Color::Green),
        };

        let width = (text.chars().count() as u16 + 4).min(area.width);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let toast_area = Rect::new(x, row, width, 3).intersection(area);

        frame.render_widget(Clear, toast_area);
        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).bold())
            .block(Block::default().borders(Borders::ALL).border_style(color));
        frame.render_widget(widget, toast_area);
        row += 3;
    }
}
