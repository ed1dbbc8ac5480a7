use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, ScreenState};
use crate::scoring::Outcome;
use crate::session::Session;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.state, self.session.as_ref()) {
            (ScreenState::Start, _) | (ScreenState::Typing, None) => render_start(area, buf),
            (ScreenState::Typing, Some(session)) => render_typing(session, area, buf),
            (ScreenState::Complete | ScreenState::ReplayPrompt, Some(session)) => {
                render_complete(session, area, buf)
            }
            _ => {}
        }
    }
}

fn render_start(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_dim_style = Style::default()
        .add_modifier(Modifier::ITALIC)
        .add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length((area.height / 2).saturating_sub(2)),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled("Welcome to the Speed Typing Test", bold_style)),
        Line::default(),
        Line::from(Span::styled(
            "press any key to begin / (esc)ape to quit",
            italic_dim_style,
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    welcome.render(chunks[1], buf);
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    // styles
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);

    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((session.passage().width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if session.passage().width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let vertical_pad = area.height.saturating_sub(prompt_occupied_lines) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(vertical_pad.saturating_sub(2)),
            Constraint::Length(2),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Min(0),
        ])
        .split(area);

    let wpm_line = Paragraph::new(Span::styled(
        format!("{} wpm", session.wpm()),
        dim_bold_style,
    ))
    .alignment(Alignment::Center);

    wpm_line.render(chunks[1], buf);

    let outcomes = session.outcomes();
    let mut spans = session
        .typed()
        .iter()
        .zip(outcomes.iter())
        .enumerate()
        .map(|(idx, (typed_char, outcome))| match outcome {
            Outcome::Incorrect => Span::styled(
                match typed_char {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            Outcome::Correct => Span::styled(
                session
                    .get_expected_char(idx)
                    .unwrap_or(*typed_char)
                    .to_string(),
                green_bold_style,
            ),
        })
        .collect::<Vec<Span>>();

    let cursor_pos = session.typed().len();
    if let Some(under_cursor) = session.get_expected_char(cursor_pos) {
        spans.push(Span::styled(
            under_cursor.to_string(),
            underlined_dim_bold_style,
        ));
    }

    let rest = session
        .passage()
        .chars()
        .skip(cursor_pos + 1)
        .collect::<String>();
    spans.push(Span::styled(rest, dim_bold_style));

    let passage = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // when the passage is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });

    passage.render(chunks[2], buf);
}

fn render_complete(session: &Session, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length((area.height / 2).saturating_sub(2)),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let message = Paragraph::new(Span::styled("You completed the passage!", bold_style))
        .alignment(Alignment::Center);
    message.render(chunks[1], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {:.1}s",
            session.wpm(),
            session.accuracy(),
            session.elapsed_secs()
        ),
        bold_style,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[2], buf);

    let legend = Paragraph::new(Span::styled(
        "press any key to replay / (esc)ape to quit",
        italic_style,
    ))
    .alignment(Alignment::Center);
    legend.render(chunks[4], buf);
}
