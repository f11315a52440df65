use std::ops::Deref;
use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_display_width::width as display_width;

use crate::TypeaheadOptions;
use crate::theme::ColorTheme;
use crate::tui::widget::{TypeaheadWidget, WidgetRender};

/// Label of the clear button
pub const CLEAR_BUTTON: &str = "[x]";

/// Single line text input with a placeholder and a clear button.
///
/// The cursor is a char index into `value`.
pub struct Input {
    /// Shown in place of the value while it is empty
    pub placeholder: String,
    /// Block title
    pub title: Option<String>,
    value: String,
    cursor: usize,
    theme: Arc<ColorTheme>,
    clear_area: Option<Rect>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            placeholder: String::from("Search..."),
            title: None,
            value: String::new(),
            cursor: 0,
            theme: Arc::new(ColorTheme::default()),
            clear_area: None,
        }
    }
}

impl Input {
    fn nchars(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.value.len())
    }

    /// Cursor position, in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole value and put the cursor at its end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.nchars();
    }

    /// Empty the input
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.value.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the char before the cursor
    pub fn delete_backward(&mut self) -> Option<char> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        Some(self.value.remove(at))
    }

    /// Delete the char under the cursor
    pub fn delete_forward(&mut self) -> Option<char> {
        if self.cursor >= self.nchars() {
            return None;
        }
        let at = self.byte_index(self.cursor);
        Some(self.value.remove(at))
    }

    pub fn move_cursor(&mut self, offset: i32) {
        let target = self.cursor as i64 + offset as i64;
        self.cursor = target.clamp(0, self.nchars() as i64) as usize;
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.nchars();
    }

    /// Delete from the cursor to the end of the line
    pub fn kill_to_end(&mut self) -> String {
        let at = self.byte_index(self.cursor);
        self.value.split_off(at)
    }

    /// Delete from the beginning of the line to the cursor
    pub fn delete_to_beginning(&mut self) -> String {
        let at = self.byte_index(self.cursor);
        let rest = self.value.split_off(at);
        let deleted = std::mem::replace(&mut self.value, rest);
        self.cursor = 0;
        deleted
    }

    /// Area of the clear button as of the last render
    pub fn clear_area(&self) -> Option<Rect> {
        self.clear_area
    }
}

impl TypeaheadWidget for Input {
    fn from_options(options: &TypeaheadOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            placeholder: options.placeholder.clone(),
            theme,
            ..Default::default()
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) -> WidgetRender {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        if let Some(title) = &self.title {
            block = block.title(Line::from(title.as_str()).style(self.theme.title));
        }
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            self.clear_area = None;
            return WidgetRender::default();
        }

        let text_area = if self.value.is_empty() {
            self.clear_area = None;
            Paragraph::new(Span::styled(&self.placeholder, self.theme.placeholder)).render(inner, buf);
            inner
        } else {
            let [text_area, _, clear_area] = Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(CLEAR_BUTTON.len() as u16),
            ])
            .areas(inner);
            Paragraph::new(Span::styled(&self.value, self.theme.query))
                .style(self.theme.normal)
                .render(text_area, buf);
            Span::styled(CLEAR_BUTTON, self.theme.clear).render(clear_area, buf);
            self.clear_area = Some(clear_area);
            text_area
        };

        let col = display_width(&self.value[..self.byte_index(self.cursor)]) as u16;
        WidgetRender {
            cursor: Some(Position {
                x: text_area.x + col.min(text_area.width.saturating_sub(1)),
                y: text_area.y,
            }),
        }
    }
}

impl Deref for Input {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
