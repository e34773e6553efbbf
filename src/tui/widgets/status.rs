// ABOUTME: Status bar widget. Renders screen, session state, theme, and backend address.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::stream::Lifecycle;
use crate::theme::{Palette, Theme};
use crate::tui::state::Screen;

pub struct StatusBarParams<'a> {
    pub screen: Screen,
    pub session: Option<&'a Lifecycle>,
    pub theme: Theme,
    pub service: &'a str,
}

fn screen_name(screen: Screen) -> &'static str {
    match screen {
        Screen::Landing => "search",
        Screen::User => "user",
        Screen::Leaderboard => "leaderboard",
    }
}

fn key_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Landing => "Ctrl+T theme  Ctrl+Q quit",
        Screen::User => "r refresh  c cancel  Esc back",
        Screen::Leaderboard => "←/→ page  Home/End first/last  Esc back",
    }
}

pub fn status_line(params: &StatusBarParams, palette: &Palette) -> Line<'static> {
    let dim = Style::default().fg(palette.muted);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", screen_name(params.screen)),
            Style::default().fg(palette.accent),
        ),
        Span::styled("| ", dim),
    ];

    if let Some(lifecycle) = params.session {
        let color = match lifecycle {
            Lifecycle::Completed => palette.success,
            Lifecycle::Failed(_) => palette.error,
            _ => palette.highlight,
        };
        spans.push(Span::styled(format!("{} ", lifecycle.label()), Style::default().fg(color)));
        spans.push(Span::styled("| ", dim));
    }

    spans.push(Span::styled(format!("{} ", params.theme), Style::default().fg(palette.fg)));
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(format!("{} ", params.service), dim));
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(key_hints(params.screen), dim));

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn status_line_shows_session_state() {
        let lifecycle = Lifecycle::Streaming;
        let line = status_line(
            &StatusBarParams {
                screen: Screen::User,
                session: Some(&lifecycle),
                theme: Theme::Dark,
                service: "http://localhost:8000",
            },
            &Theme::Dark.palette(),
        );
        let out = text(&line);
        assert!(out.contains("user"));
        assert!(out.contains("streaming"));
        assert!(out.contains("dark"));
        assert!(out.contains("http://localhost:8000"));
    }

    #[test]
    fn status_line_without_session() {
        let line = status_line(
            &StatusBarParams {
                screen: Screen::Landing,
                session: None,
                theme: Theme::Light,
                service: "svc",
            },
            &Theme::Light.palette(),
        );
        let out = text(&line);
        assert!(out.contains("search"));
        assert!(!out.contains("streaming"));
        assert!(out.contains("light"));
    }
}
