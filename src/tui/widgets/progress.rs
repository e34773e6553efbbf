// ABOUTME: Progress view shown while an analysis session is streaming.
// ABOUTME: Heading, current repository, processed counter, gauge, and the analysis-limits note.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph, Wrap};

use crate::format::{percent, thousands};
use crate::stream::{Lifecycle, ProgressSnapshot, SessionView};
use crate::theme::Palette;

pub const ANALYSIS_NOTE: &str =
    "This may take a while. Only the first 100 repositories and under 150mb will be analyzed.";

/// Text above the gauge.
pub fn progress_lines(
    lifecycle: &Lifecycle,
    progress: &ProgressSnapshot,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let heading = match lifecycle {
        Lifecycle::Connecting => "Connecting...",
        _ => "Analyzing Repositories",
    };
    let current = if progress.current_repo.is_empty() {
        "Preparing...".to_string()
    } else {
        format!("Current: {}", progress.current_repo)
    };

    vec![
        Line::from(Span::styled(
            heading,
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(current, Style::default().fg(palette.accent))),
        Line::from(Span::styled(
            format!(
                "Processed: {} / {} repositories",
                thousands(progress.processed),
                thousands(progress.total)
            ),
            Style::default().fg(palette.fg),
        )),
    ]
}

pub fn render_progress(frame: &mut Frame, area: Rect, session: &SessionView, palette: &Palette) {
    let [text_area, gauge_area, _, note_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    let lines = progress_lines(&session.lifecycle, &session.progress, palette);
    frame.render_widget(Paragraph::new(lines), text_area);

    let percentage = session.progress.percentage;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.gauge).bg(palette.bg))
        .ratio((percentage / 100.0).clamp(0.0, 1.0))
        .label(percent(percentage));
    frame.render_widget(gauge, gauge_area);

    let note = Paragraph::new(Span::styled(ANALYSIS_NOTE, Style::default().fg(palette.muted)))
        .wrap(Wrap { trim: true });
    frame.render_widget(note, note_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn preparing_before_first_repo() {
        let lines = progress_lines(
            &Lifecycle::Streaming,
            &ProgressSnapshot::default(),
            &Theme::Dark.palette(),
        );
        let out = text(&lines);
        assert!(out.contains("Analyzing Repositories"));
        assert!(out.contains("Preparing..."));
        assert!(out.contains("Processed: 0 / 0 repositories"));
    }

    #[test]
    fn shows_current_repo_and_counts() {
        let progress = ProgressSnapshot {
            current_repo: "octocat/Hello-World".to_string(),
            processed: 1,
            total: 4,
            percentage: 25.0,
        };
        let out = text(&progress_lines(&Lifecycle::Streaming, &progress, &Theme::Light.palette()));
        assert!(out.contains("Current: octocat/Hello-World"));
        assert!(out.contains("Processed: 1 / 4 repositories"));
    }

    #[test]
    fn connecting_heading() {
        let out = text(&progress_lines(
            &Lifecycle::Connecting,
            &ProgressSnapshot::default(),
            &Theme::Dark.palette(),
        ));
        assert!(out.starts_with("Connecting..."));
    }
}
