use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use std::ops::BitOrAssign;
use std::sync::Arc;

use crate::options::TypeaheadOptions;
use crate::theme::ColorTheme;

/// Result of rendering a TypeaheadWidget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetRender {
    /// Where the terminal cursor should be placed, if the widget owns it
    pub cursor: Option<Position>,
}

impl BitOrAssign for WidgetRender {
    fn bitor_assign(&mut self, rhs: Self) {
        self.cursor = self.cursor.or(rhs.cursor);
    }
}

/// Trait for the TUI widgets
pub trait TypeaheadWidget: Sized {
    /// Create a widget from options and theme
    fn from_options(options: &TypeaheadOptions, theme: Arc<ColorTheme>) -> Self;

    /// Render the widget to the buffer
    fn render(&mut self, area: Rect, buf: &mut Buffer) -> WidgetRender;
}
