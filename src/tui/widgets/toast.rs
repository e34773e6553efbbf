// ABOUTME: Toast notifications stacked in the bottom-right corner of the body.
// ABOUTME: Newest toast sits lowest; each toast is a bordered box colored by kind.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Palette;
use crate::tui::state::{Toast, ToastKind};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

pub fn toast_lines(toast: &Toast, palette: &Palette) -> Vec<Line<'static>> {
    let color = match toast.kind {
        ToastKind::Info => palette.accent,
        ToastKind::Success => palette.success,
        ToastKind::Error => palette.error,
    };
    vec![
        Line::from(Span::styled(
            toast.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(toast.message.clone(), Style::default().fg(palette.fg))),
    ]
}

/// Areas for up to as many toasts as fit, newest at the bottom.
pub fn toast_areas(area: Rect, count: usize) -> Vec<Rect> {
    let width = TOAST_WIDTH.min(area.width);
    let fit = usize::from(area.height / TOAST_HEIGHT);
    (0..count.min(fit))
        .map(|i| Rect {
            x: area.x + area.width - width,
            y: area.y + area.height - TOAST_HEIGHT * (i as u16 + 1),
            width,
            height: TOAST_HEIGHT,
        })
        .collect()
}

pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast], palette: &Palette) {
    let areas = toast_areas(area, toasts.len());
    for (toast, rect) in toasts.iter().rev().zip(areas) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted))
            .style(Style::default().bg(palette.bg));
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(toast_lines(toast, palette))
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_stack_upward_from_bottom_right() {
        let area = Rect::new(0, 0, 100, 20);
        let rects = toast_areas(area, 2);
        assert_eq!(rects[0], Rect::new(56, 16, 44, 4));
        assert_eq!(rects[1], Rect::new(56, 12, 44, 4));
    }

    #[test]
    fn only_fitting_toasts_get_areas() {
        let area = Rect::new(0, 0, 30, 9);
        let rects = toast_areas(area, 5);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].width, 30);
    }
}
