pub mod palette;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, metrics::MetricsSnapshot, session::Phase, ui::palette::speed_band};

const HORIZONTAL_MARGIN: u16 = 5;
const TEXT_LINES: u16 = 6;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.engine.snapshot();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header + legend
                Constraint::Min(1),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        render_header(chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1), // chapter label
                Constraint::Length(TEXT_LINES),
                Constraint::Min(0),
            ])
            .split(chunks[1]);

        let dim_bold_style = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM);

        match snapshot.phase {
            Phase::Idle => {
                Paragraph::new(Span::styled(
                    "Press (enter) to begin",
                    dim_bold_style.add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(body[2], buf);
            }
            Phase::Active => {
                if let Some(label) = snapshot.group_label {
                    Paragraph::new(Span::styled(
                        label.to_string(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::ITALIC),
                    ))
                    .alignment(Alignment::Center)
                    .render(body[1], buf);
                }

                let width = body[2].width.max(1) as usize;
                let spans = target_spans(snapshot.target_text, snapshot.typed_text, width);
                Paragraph::new(Line::from(spans))
                    .wrap(Wrap { trim: false })
                    .render(body[2], buf);
            }
            Phase::Finished => {
                let result = self.engine.final_result().unwrap_or_default();
                render_results(result, body[2], buf);
            }
        }

        let shown = match snapshot.phase {
            Phase::Finished => self.engine.final_result().unwrap_or_default(),
            _ => MetricsSnapshot {
                words_per_minute: snapshot.words_per_minute,
                accuracy_percent: snapshot.accuracy_percent,
            },
        };
        render_status(
            snapshot.phase,
            shown,
            snapshot.seconds_remaining,
            self.corpus_name(),
            chunks[2],
            buf,
        );
    }
}

fn render_header(area: Rect, buf: &mut Buffer) {
    let title = "clacker";
    let mut legend = Vec::new();
    for band in palette::SPEED_BANDS.iter() {
        legend.push(Span::styled("■ ", Style::default().fg(band.color)));
        legend.push(Span::raw(format!("{}  ", band.label)));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(title.width() as u16 + 2), Constraint::Min(0)])
        .split(area);

    Paragraph::new(Span::styled(
        format!(" {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .render(chunks[0], buf);

    Paragraph::new(Line::from(legend))
        .alignment(Alignment::Right)
        .render(chunks[1], buf);
}

fn render_results(result: MetricsSnapshot, area: Rect, buf: &mut Buffer) {
    let band = speed_band(result.words_per_minute);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let text = Text::from(vec![
        Line::from(Span::styled(
            format!(
                "{:.0} wpm   {}% acc",
                result.words_per_minute, result.accuracy_percent
            ),
            bold_style.fg(band.color),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) new / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ]);

    Paragraph::new(text)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_status(
    phase: Phase,
    shown: MetricsSnapshot,
    seconds_remaining: u32,
    corpus: &str,
    area: Rect,
    buf: &mut Buffer,
) {
    let band = speed_band(shown.words_per_minute);
    let action = if phase == Phase::Active {
        "[ (tab) restart ]"
    } else {
        "[ (enter) start ]"
    };

    let line = Line::from(vec![
        Span::styled(format!(" {action}  "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("Speed: "),
        Span::styled(
            format!("{:.0} WPM", shown.words_per_minute),
            Style::default().fg(band.color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   Accuracy: {}%", shown.accuracy_percent)),
        Span::raw(format!("   Time Left: {seconds_remaining} sec")),
        Span::styled(
            format!("   {corpus}"),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    Paragraph::new(line).render(area, buf);
}

/// Style each target char against what was typed, starting a line or so
/// before the cursor so it stays on screen as the buffer grows
fn target_spans(target: &str, typed: &str, width: usize) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let start = window_start(&target, typed.len(), width);
    let end = target.len().min(start + width * TEXT_LINES as usize);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for (idx, &expected) in target.iter().enumerate().take(end).skip(start) {
        let (symbol, style) = match typed.get(idx) {
            Some(&actual) if actual == expected => (expected, green_bold_style),
            Some(_) => (if expected == ' ' { '·' } else { expected }, red_bold_style),
            None if idx == typed.len() => (expected, underlined_dim_bold_style),
            None => (expected, dim_bold_style),
        };

        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(symbol);
    }

    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    spans
}

fn window_start(target: &[char], cursor: usize, width: usize) -> usize {
    let back = cursor.saturating_sub(width).min(target.len());
    if back == 0 {
        return 0;
    }

    target[..back]
        .iter()
        .rposition(|&c| c == ' ')
        .map_or(0, |pos| pos + 1)
}
