pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    engine::{CharCell, Snapshot},
    session::{Mode, SessionState},
    stats::CharState,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Lines of target text shown around the cursor
const PROMPT_LINES: usize = 4;

/// Range of `characters` to draw so the cursor stays on screen.
///
/// Starts at a word boundary one line before the cursor.
pub fn visible_window(
    characters: &[CharCell],
    current: usize,
    line_width: usize,
) -> (usize, usize) {
    let line_width = line_width.max(1);
    let mut start = current.saturating_sub(line_width).min(characters.len());
    if start > 0 {
        while start < current && characters[start - 1].ch != ' ' {
            start += 1;
        }
    }
    let end = (start + line_width * PROMPT_LINES).min(characters.len());
    (start, end)
}

fn status_line(snapshot: &Snapshot) -> String {
    let mut parts = vec![
        format!("{} wpm", snapshot.wpm),
        format!("best {}", snapshot.best_wpm),
        format!("{}% acc", snapshot.accuracy),
        format!("{} / {} chars", snapshot.chars_typed, snapshot.chars_total),
    ];
    if let Some(remaining) = snapshot.remaining_secs {
        parts.push(format!("{remaining:.1}s left"));
    }
    parts.join("   ")
}

fn legend(snapshot: &Snapshot) -> &'static str {
    match snapshot.state {
        SessionState::Idle => "(enter) start / (tab) difficulty / (m) mode / (esc)ape",
        SessionState::Running => "(esc) reset / (ctrl+r) restart / (ctrl+c) quit",
        SessionState::Finished => "(r)estart / (n)ew / (esc)ape",
    }
}

fn mode_banner(snapshot: &Snapshot) -> String {
    match snapshot.mode {
        Mode::Endless => format!(
            "endless mode · {} · type as long as you like",
            snapshot.difficulty
        ),
        Mode::Timed => format!("timed mode · {}", snapshot.difficulty),
    }
}

impl Widget for &Snapshot {
    fn render(self, area: Rect, buf: &mut Buffer) {
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

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let magenta_style = Style::default().fg(Color::Magenta);

        match self.state {
            SessionState::Idle | SessionState::Running => {
                let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
                let (start, end) = visible_window(
                    &self.characters,
                    self.current_index,
                    max_chars_per_line as usize,
                );
                let window = &self.characters[start..end];

                let window_text: String = window.iter().map(|c| c.ch).collect();
                let prompt_occupied_lines = if window_text.width() <= max_chars_per_line as usize {
                    1
                } else {
                    PROMPT_LINES as u16 + 1
                };

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(
                                ((area.height as f64 - prompt_occupied_lines as f64) / 2.0 - 2.0)
                                    .max(0.0) as u16,
                            ),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(prompt_occupied_lines),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                            Constraint::Length(1),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                let spans = window
                    .iter()
                    .map(|cell| match cell.state {
                        CharState::Correct => Span::styled(cell.ch.to_string(), green_bold_style),
                        CharState::Incorrect => Span::styled(
                            match cell.ch {
                                ' ' => "·".to_owned(),
                                c => c.to_string(),
                            },
                            red_bold_style,
                        ),
                        CharState::Current => {
                            Span::styled(cell.ch.to_string(), underlined_dim_bold_style)
                        }
                        CharState::Untyped => Span::styled(cell.ch.to_string(), dim_bold_style),
                    })
                    .collect::<Vec<Span>>();

                let banner = Paragraph::new(Span::styled(mode_banner(self), italic_style))
                    .alignment(Alignment::Center);
                banner.render(chunks[1], buf);

                let widget = Paragraph::new(Line::from(spans))
                    .alignment(if prompt_occupied_lines == 1 {
                        // when the prompt is small enough to fit on one line
                        // centering the text gives a nice zen feeling
                        Alignment::Center
                    } else {
                        Alignment::Left
                    })
                    .wrap(Wrap { trim: true });

                widget.render(chunks[3], buf);

                let stats = Paragraph::new(Span::styled(status_line(self), bold_style))
                    .alignment(Alignment::Center);
                stats.render(chunks[5], buf);

                let legend = Paragraph::new(Span::styled(legend(self), italic_style));
                legend.render(chunks[7], buf);
            }
            SessionState::Finished => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(1),    // chart
                        Constraint::Length(1), // stats
                        Constraint::Length(1), // padding
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let (overall_duration, highest_wpm) =
                    charting::compute_chart_params(&self.wpm_samples, self.elapsed_secs);

                let tuples: Vec<(f64, f64)> =
                    self.wpm_samples.iter().map(|p| (p.t, p.wpm)).collect();
                let datasets = vec![Dataset::default()
                    .marker(ratatui::symbols::Marker::Braille)
                    .style(magenta_style)
                    .graph_type(GraphType::Line)
                    .data(&tuples)];

                let chart = Chart::new(datasets)
                    .x_axis(
                        Axis::default()
                            .title("seconds")
                            .bounds([1.0, overall_duration])
                            .labels(vec![
                                Span::styled("1", bold_style),
                                Span::styled(charting::format_label(overall_duration), bold_style),
                            ]),
                    )
                    .y_axis(
                        Axis::default()
                            .title("wpm")
                            .bounds([0.0, highest_wpm])
                            .labels(vec![
                                Span::styled("0", bold_style),
                                Span::styled(charting::format_label(highest_wpm), bold_style),
                            ]),
                    );

                chart.render(chunks[0], buf);

                let best_marker = if self.wpm > 0 && self.wpm >= self.best_wpm {
                    "   new best!"
                } else {
                    ""
                };
                let stats = Paragraph::new(Span::styled(
                    format!(
                        "{} wpm   {}% acc   best {}{}",
                        self.wpm, self.accuracy, self.best_wpm, best_marker
                    ),
                    bold_style,
                ))
                .alignment(Alignment::Center);

                stats.render(chunks[1], buf);

                let legend = Paragraph::new(Span::styled(legend(self), italic_style));
                legend.render(chunks[3], buf);
            }
        }
    }
}
