// ABOUTME: Leaderboard table and its pagination controls.
// ABOUTME: Rank, username, and total lines per row; first/prev/next/last with disabled states.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::api::Pagination;
use crate::format::thousands;
use crate::theme::Palette;
use crate::tui::state::LeaderboardState;

/// `« First  ‹ Prev  Page X of Y  Next ›  Last »`, or `None` for a single page.
pub fn page_controls_line(pagination: &Pagination, palette: &Palette) -> Option<Line<'static>> {
    if !pagination.shows_controls() {
        return None;
    }
    let enabled = Style::default().fg(palette.accent);
    let disabled = Style::default().fg(palette.muted).add_modifier(Modifier::DIM);
    let prev_style = if pagination.prev_disabled() { disabled } else { enabled };
    let next_style = if pagination.next_disabled() { disabled } else { enabled };

    Some(Line::from(vec![
        Span::styled("« First", prev_style),
        Span::raw("  "),
        Span::styled("‹ Prev", prev_style),
        Span::raw("  "),
        Span::styled(
            format!("Page {} of {}", pagination.current, pagination.total_pages),
            Style::default().fg(palette.fg),
        ),
        Span::raw("  "),
        Span::styled("Next ›", next_style),
        Span::raw("  "),
        Span::styled("Last »", next_style),
    ]))
}

pub fn render_leaderboard(
    frame: &mut Frame,
    area: Rect,
    board: &LeaderboardState,
    palette: &Palette,
) {
    let [table_area, controls_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(Span::styled(
            " Leaderboard ",
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ));

    if board.users.is_empty() {
        let message = if board.loading {
            Span::styled("Loading...", Style::default().fg(palette.muted))
        } else if let Some(err) = &board.error {
            Span::styled(
                format!("Could not load leaderboard: {}", err),
                Style::default().fg(palette.error),
            )
        } else {
            Span::styled("No users ranked yet", Style::default().fg(palette.muted))
        };
        frame.render_widget(Paragraph::new(message).block(block), table_area);
    } else {
        let header = Row::new(vec!["Rank", "Username", "Lines of Code"]).style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        );
        let rows = board.users.iter().enumerate().map(|(i, user)| {
            Row::new(vec![
                Cell::from(format!("#{}", board.pagination.rank(i))),
                Cell::from(user.username.clone()),
                Cell::from(thousands(user.lines_of_code)),
            ])
            .style(Style::default().fg(palette.fg))
        });
        let table = Table::new(
            rows,
            [Constraint::Length(8), Constraint::Min(16), Constraint::Length(16)],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, table_area);
    }

    if let Some(controls) = page_controls_line(&board.pagination, palette) {
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn single_page_hides_controls() {
        let p = Pagination::new(1, 20);
        assert!(page_controls_line(&p, &Theme::Dark.palette()).is_none());
    }

    #[test]
    fn controls_show_page_of_total() {
        let p = Pagination::new(2, 45);
        let line = page_controls_line(&p, &Theme::Dark.palette()).unwrap();
        assert!(text(&line).contains("Page 2 of 3"));
    }

    #[test]
    fn first_page_dims_previous_controls() {
        let palette = Theme::Dark.palette();
        let line = page_controls_line(&Pagination::new(1, 45), &palette).unwrap();
        assert_eq!(line.spans[0].style.fg, Some(palette.muted));
        assert_eq!(line.spans[2].style.fg, Some(palette.muted));
        assert_eq!(line.spans[6].style.fg, Some(palette.accent));
        assert_eq!(line.spans[8].style.fg, Some(palette.accent));
    }

    #[test]
    fn last_page_dims_next_controls() {
        let palette = Theme::Dark.palette();
        let line = page_controls_line(&Pagination::new(3, 45), &palette).unwrap();
        assert_eq!(line.spans[0].style.fg, Some(palette.accent));
        assert_eq!(line.spans[6].style.fg, Some(palette.muted));
        assert_eq!(line.spans[8].style.fg, Some(palette.muted));
    }
}
