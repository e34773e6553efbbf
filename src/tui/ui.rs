// ABOUTME: Main TUI rendering function. Assembles header, screen body, toasts, and status bar.
// ABOUTME: The theme's palette is resolved once per frame and passed down to every widget.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::stream::Lifecycle;
use crate::theme::Palette;
use crate::tui::state::{AppState, Screen, UserScreen};
use crate::tui::widgets::leaderboard::render_leaderboard;
use crate::tui::widgets::progress::render_progress;
use crate::tui::widgets::search::render_landing;
use crate::tui::widgets::stats::render_stats;
use crate::tui::widgets::status::{StatusBarParams, status_line};
use crate::tui::widgets::toast::render_toasts;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let palette = state.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let header = Line::from(vec![
        Span::styled(
            " ghdev",
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(header_suffix(state), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(header), header_area);

    let body = inset(body_area);
    match state.screen {
        Screen::Landing => {
            if let Some(cursor) = render_landing(frame, body, &state.landing, &palette) {
                frame.set_cursor_position(cursor);
            }
        }
        Screen::User => match &state.user {
            Some(user) => render_user(frame, body, user, &palette),
            None => frame.render_widget(
                Paragraph::new(Span::styled(
                    "No user selected",
                    Style::default().fg(palette.muted),
                )),
                body,
            ),
        },
        Screen::Leaderboard => render_leaderboard(frame, body, &state.leaderboard, &palette),
    }

    render_toasts(frame, body_area, &state.toasts, &palette);

    let status = status_line(
        &StatusBarParams {
            screen: state.screen,
            session: state
                .user
                .as_ref()
                .filter(|_| state.screen == Screen::User)
                .map(|u| &u.session.lifecycle),
            theme: state.theme,
            service: &state.service,
        },
        &palette,
    );
    frame.render_widget(Paragraph::new(status), status_area);
}

fn header_suffix(state: &AppState) -> String {
    match (state.screen, &state.user) {
        (Screen::User, Some(user)) => format!(" / {}", user.username),
        (Screen::Leaderboard, _) => " / leaderboard".to_string(),
        _ => String::new(),
    }
}

/// One column of padding on each side of the body.
fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}

fn render_user(frame: &mut Frame, area: Rect, user: &UserScreen, palette: &Palette) {
    match &user.session.lifecycle {
        Lifecycle::Completed => render_stats(frame, area, user, palette),
        Lifecycle::Failed(reason) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Could not analyze {}", user.username),
                    Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(reason.clone(), Style::default().fg(palette.fg))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to try again or Esc to go back.",
                    Style::default().fg(palette.muted),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
        }
        _ => render_progress(frame, area, &user.session, palette),
    }
}
