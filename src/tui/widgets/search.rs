// ABOUTME: Landing screen: username search box and the customize panel for the ignore lists.
// ABOUTME: Returns the cursor position for whichever text field has focus.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs};
use unicode_width::UnicodeWidthStr;

use crate::prefs::IgnoreList;
use crate::theme::Palette;
use crate::tui::state::{LandingFocus, LandingState};
use crate::tui::text_input::TextInput;

pub const TITLE: &str = "GitHub Lines of Code";
pub const SUBTITLE: &str =
    "See how much code a GitHub user has written across their public repositories.";

fn input_box(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &TextInput,
    focused: bool,
    palette: &Palette,
) -> Option<Position> {
    let border = if focused { palette.accent } else { palette.muted };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(border)));
    frame.render_widget(
        Paragraph::new(Span::styled(input.value().to_string(), Style::default().fg(palette.fg)))
            .block(block),
        area,
    );

    if !focused || area.width < 3 || area.height < 3 {
        return None;
    }
    let prefix: String = input.value().chars().take(input.cursor()).collect();
    let col = UnicodeWidthStr::width(prefix.as_str()).min(usize::from(area.width - 3));
    Some(Position::new(area.x + 1 + col as u16, area.y + 1))
}

fn hint_line(customize_open: bool, palette: &Palette) -> Line<'static> {
    let key = Style::default().fg(palette.accent);
    let text = Style::default().fg(palette.muted);
    if customize_open {
        Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(" add  ", text),
            Span::styled("↑↓", key),
            Span::styled(" select  ", text),
            Span::styled("Ctrl+D", key),
            Span::styled(" remove  ", text),
            Span::styled("Ctrl+X", key),
            Span::styled(" clear  ", text),
            Span::styled("Ctrl+E", key),
            Span::styled(" switch list  ", text),
            Span::styled("Tab", key),
            Span::styled(" focus  ", text),
            Span::styled("Esc", key),
            Span::styled(" close", text),
        ])
    } else {
        Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(" search  ", text),
            Span::styled("Ctrl+O", key),
            Span::styled(" customize  ", text),
            Span::styled("Ctrl+L", key),
            Span::styled(" leaderboard  ", text),
            Span::styled("Esc", key),
            Span::styled(" quit", text),
        ])
    }
}

fn render_customize(
    frame: &mut Frame,
    area: Rect,
    landing: &LandingState,
    palette: &Palette,
) -> Option<Position> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(Span::styled(" Customize Search ", Style::default().fg(palette.fg)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [tabs_area, new_item_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(inner);

    let selected_tab = match landing.active_list {
        IgnoreList::Dirs => 0,
        IgnoreList::Extensions => 1,
    };
    let tabs = Tabs::new(vec![IgnoreList::Dirs.label(), IgnoreList::Extensions.label()])
        .select(selected_tab)
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, tabs_area);

    let placeholder = match landing.active_list {
        IgnoreList::Dirs => "Add directory",
        IgnoreList::Extensions => "Add extension",
    };
    let cursor = input_box(
        frame,
        new_item_area,
        placeholder,
        &landing.new_item,
        landing.focus == LandingFocus::NewItem,
        palette,
    );

    let items = landing.active_items();
    if items.is_empty() {
        let empty = if landing.options_loading {
            "Loading defaults..."
        } else {
            "Nothing ignored"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(empty, Style::default().fg(palette.muted))),
            list_area,
        );
    } else {
        let list = List::new(
            items
                .iter()
                .map(|item| {
                    ListItem::new(Span::styled(item.clone(), Style::default().fg(palette.fg)))
                }),
        )
        .highlight_style(Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
        let mut list_state = ListState::default().with_selected(Some(landing.selected_item));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    cursor
}

/// Draw the landing screen. Returns where the terminal cursor belongs.
pub fn render_landing(
    frame: &mut Frame,
    area: Rect,
    landing: &LandingState,
    palette: &Palette,
) -> Option<Position> {
    let customize_height = if landing.customize_open { 14 } else { 0 };
    let [title_area, input_area, hint_area, customize_area, _] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(customize_height),
        Constraint::Min(0),
    ])
    .areas(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(palette.muted))),
    ])
    .centered();
    frame.render_widget(title, title_area);

    let username_cursor = input_box(
        frame,
        input_area,
        "GitHub username",
        &landing.username,
        landing.focus == LandingFocus::Username,
        palette,
    );
    frame.render_widget(Paragraph::new(hint_line(landing.customize_open, palette)), hint_area);

    let customize_cursor = if landing.customize_open {
        render_customize(frame, customize_area, landing, palette)
    } else {
        None
    };

    username_cursor.or(customize_cursor)
}
