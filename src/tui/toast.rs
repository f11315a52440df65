use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Widget};
use unicode_display_width::width as display_width;

use crate::TypeaheadOptions;
use crate::notify::{Notification, NotificationKind};
use crate::theme::ColorTheme;
use crate::tui::widget::{TypeaheadWidget, WidgetRender};

const TOAST_WIDTH: u16 = 40;
const CLOSE_MARKER: &str = "×";

/// Stack of toasts drawn over the top-right corner
#[derive(Default)]
pub struct Toasts {
    theme: Arc<ColorTheme>,
    shown: Vec<Notification>,
    close_areas: Vec<(Rect, u64)>,
}

impl Toasts {
    /// Replace the toasts to draw, oldest first
    pub fn update<'a>(&mut self, notifications: impl Iterator<Item = &'a Notification>) {
        self.shown = notifications.cloned().collect();
    }

    /// Id of the toast whose close marker is at `pos`
    pub fn close_hit(&self, pos: Position) -> Option<u64> {
        self.close_areas
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, id)| *id)
    }

    fn style(&self, kind: NotificationKind) -> Style {
        match kind {
            NotificationKind::Success => self.theme.toast_success,
            NotificationKind::Error => self.theme.toast_error,
            NotificationKind::Info => self.theme.toast_info,
        }
    }
}

impl TypeaheadWidget for Toasts {
    fn from_options(_options: &TypeaheadOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            theme,
            ..Default::default()
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) -> WidgetRender {
        self.close_areas.clear();
        let width = TOAST_WIDTH.min(area.width);
        if width < 4 {
            return WidgetRender::default();
        }
        let x = area.right() - width;
        // one line per toast, separated by a blank line
        for (i, notification) in self.shown.iter().enumerate() {
            let y = area.y + 1 + 2 * i as u16;
            if y >= area.bottom() {
                break;
            }
            let toast = Rect::new(x, y, width, 1);
            let style = self.style(notification.kind);
            Clear.render(toast, buf);
            buf.set_style(toast, style);

            let [text, _, close] = Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(display_width(CLOSE_MARKER) as u16 + 1),
            ])
            .areas(toast);
            Line::styled(format!(" {}", notification.message), style).render(text, buf);
            Line::styled(CLOSE_MARKER, style).render(close, buf);
            self.close_areas.push((close, notification.id));
        }
        WidgetRender::default()
    }
}
