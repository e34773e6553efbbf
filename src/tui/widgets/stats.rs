// ABOUTME: Completed-analysis view: profile card, stat cards, and the language bar chart.
// ABOUTME: Card and bar contents are built as plain data so they can be checked without a terminal.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::format::{percent, plural, thousands};
use crate::stream::{DerivedMetrics, LanguageLines};
use crate::theme::{Palette, chart_color};
use crate::tui::state::{ProfileState, UserScreen};

/// Title and value for one stat card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

pub fn stat_cards(metrics: &DerivedMetrics) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Lines of Code",
            value: thousands(metrics.total_lines),
        },
        StatCard {
            title: "Characters",
            value: thousands(metrics.characters),
        },
        StatCard {
            title: "Words",
            value: thousands(metrics.words),
        },
        StatCard {
            title: "Shakespeare",
            value: plural(metrics.hamlets, "Hamlet"),
        },
        StatCard {
            title: "Novels",
            value: plural(metrics.novels, "Novel"),
        },
        StatCard {
            title: "Harry Potter",
            value: format!("{} Series", thousands(metrics.harry_potter_series)),
        },
    ]
}

pub fn profile_lines(
    profile: &ProfileState,
    username: &str,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let muted = Style::default().fg(palette.muted);
    match profile {
        ProfileState::Loading => vec![Line::from(Span::styled("Loading profile...", muted))],
        ProfileState::NotFound => vec![Line::from(Span::styled(
            "User not found",
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        ))],
        ProfileState::Unavailable => vec![
            Line::from(Span::styled(
                format!("@{}", username),
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Profile unavailable", muted)),
        ],
        ProfileState::Loaded(user) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    user.display_name().to_string(),
                    Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("@{}", user.login),
                    Style::default().fg(palette.accent),
                )),
            ];
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.trim().is_empty()) {
                lines.push(Line::from(Span::styled(
                    bio.to_string(),
                    Style::default().fg(palette.fg),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(thousands(user.public_repos), Style::default().fg(palette.highlight)),
                Span::styled(" repos  ", muted),
                Span::styled(thousands(user.followers), Style::default().fg(palette.highlight)),
                Span::styled(" followers  ", muted),
                Span::styled(thousands(user.following), Style::default().fg(palette.highlight)),
                Span::styled(" following", muted),
            ]));
            if let Some(year) = user.joined_year() {
                lines.push(Line::from(Span::styled(format!("Joined {}", year), muted)));
            }
            lines
        }
    }
}

/// One horizontal bar per language, scaled against the largest entry.
pub fn language_lines(
    languages: &[LanguageLines],
    width: u16,
    palette: &Palette,
) -> Vec<Line<'static>> {
    if languages.is_empty() {
        return vec![Line::from(Span::styled(
            "No language data",
            Style::default().fg(palette.muted),
        ))];
    }

    let name_width = languages
        .iter()
        .map(|l| UnicodeWidthStr::width(l.language.as_str()))
        .max()
        .unwrap_or(0)
        .min(16);
    let max_lines = languages.iter().map(|l| l.lines).max().unwrap_or(0).max(1);
    // name, gap, bar, gap, "100.00%", gap, count
    let reserved = name_width + 1 + 1 + 7 + 2 + 12;
    let bar_width = usize::from(width).saturating_sub(reserved).max(1);

    languages
        .iter()
        .enumerate()
        .map(|(i, lang)| {
            let filled =
                ((lang.lines as f64 / max_lines as f64) * bar_width as f64).round() as usize;
            let name: String = lang.language.chars().take(16).collect();
            let pad = name_width.saturating_sub(UnicodeWidthStr::width(name.as_str()));
            Line::from(vec![
                Span::styled(
                    format!("{}{} ", name, " ".repeat(pad)),
                    Style::default().fg(palette.fg),
                ),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(chart_color(i))),
                Span::raw(" ".repeat(bar_width.saturating_sub(filled.max(1)) + 1)),
                Span::styled(
                    format!("{:>7}", percent(lang.share)),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    format!("  {}", thousands(lang.lines)),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect()
}

fn render_card(frame: &mut Frame, area: Rect, card: &StatCard, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(Span::styled(card.title, Style::default().fg(palette.muted)));
    let value = Paragraph::new(Span::styled(
        card.value.clone(),
        Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
    ))
    .block(block);
    frame.render_widget(value, area);
}

pub fn render_stats(frame: &mut Frame, area: Rect, user: &UserScreen, palette: &Palette) {
    let [profile_area, cards_area, chart_area] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Min(3),
    ])
    .areas(area);

    let profile = Paragraph::new(profile_lines(&user.profile, &user.username, palette))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted)),
        );
    frame.render_widget(profile, profile_area);

    let metrics = user.metrics.unwrap_or_default();
    let cards = stat_cards(&metrics);
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).split(cards_area);
    for (row, chunk) in cards.chunks(3).enumerate() {
        let cols = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(rows[row]);
        for (col, card) in chunk.iter().enumerate() {
            render_card(frame, cols[col], card, palette);
        }
    }

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(Span::styled(" Top Languages ", Style::default().fg(palette.fg)));
    let inner_width = chart_area.width.saturating_sub(2);
    let chart =
        Paragraph::new(language_lines(&user.languages, inner_width, palette)).block(chart_block);
    frame.render_widget(chart, chart_area);
}
