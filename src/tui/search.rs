//! Debounced, keyboard navigable search-select widget.
//!
//! Typing only edits the query and (re)arms the debounce timer. When the timer fires the
//! settled query is committed and handed to the [`QuerySource`] in a spawned task; its
//! completion comes back through the event channel tagged with a request generation, and
//! anything tagged with an older generation is dropped.

use std::sync::Arc;
use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use unicode_display_width::width as display_width;

use crate::debounce::Debouncer;
use crate::item::SearchResult;
use crate::options::TypeaheadOptions;
use crate::source::QuerySource;
use crate::theme::ColorTheme;
use crate::tui::event::Action;
use crate::tui::input::Input;
use crate::tui::widget::{TypeaheadWidget, WidgetRender};
use crate::tui::Event;

/// Most result rows shown at once
pub const DROPDOWN_ROWS: u16 = 8;

/// Callback invoked with the selected item, or `None` when the widget is cleared
pub type SelectCallback = Box<dyn FnMut(Option<Arc<SearchResult>>) + Send>;

/// Keys understood by the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Focus the next row, wrapping
    Down,
    /// Focus the previous row, wrapping
    Up,
    /// Select the focused row
    Enter,
    /// Close the dropdown
    Escape,
}

/// The search widget and its state
pub struct SearchWidget {
    input: Input,
    debounced_query: String,
    results: Vec<Arc<SearchResult>>,
    is_loading: bool,
    error: Option<String>,
    is_open: bool,
    focused: Option<usize>,
    debouncer: Debouncer,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    source: Arc<dyn QuerySource>,
    on_select: SelectCallback,
    event_tx: UnboundedSender<Event>,
    theme: Arc<ColorTheme>,
    scroll: usize,
    rows_area: Option<Rect>,
}

impl SearchWidget {
    /// Creates a widget querying `source`. Timer fires and query completions are posted on
    /// `event_tx` and must be fed back through [`SearchWidget::handle_event`].
    pub fn new(
        options: &TypeaheadOptions,
        theme: Arc<ColorTheme>,
        source: Arc<dyn QuerySource>,
        event_tx: UnboundedSender<Event>,
    ) -> Self {
        Self {
            input: Input::from_options(options, theme.clone()),
            debounced_query: String::new(),
            results: Vec::new(),
            is_loading: false,
            error: None,
            is_open: false,
            focused: None,
            debouncer: Debouncer::new(Duration::from_millis(options.debounce), event_tx.clone()),
            generation: 0,
            in_flight: None,
            source,
            on_select: Box::new(|_| {}),
            event_tx,
            theme,
            scroll: 0,
            rows_area: None,
        }
    }

    /// Set the selection callback
    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Option<Arc<SearchResult>>) + Send + 'static,
    {
        self.on_select = Box::new(callback);
        self
    }

    /// Current text of the input
    pub fn query(&self) -> &str {
        self.input.as_str()
    }

    /// Last committed query
    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    /// Results of the last completed query
    pub fn results(&self) -> &[Arc<SearchResult>] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed query
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Focused row, `-1` when nothing is focused
    pub fn focused_index(&self) -> isize {
        self.focused.map_or(-1, |i| i as isize)
    }

    /// Whether a debounce timer is armed
    pub fn is_debouncing(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Replace the query text. Nothing is searched until the text settles.
    pub fn on_text_change(&mut self, new_text: impl Into<String>) {
        self.input.set_value(new_text);
        self.text_changed();
    }

    /// Insert pasted text at the cursor
    pub fn paste(&mut self, text: &str) {
        let line: String = text.chars().filter(|c| !c.is_control()).collect();
        if !line.is_empty() {
            self.input.insert_str(&line);
            self.text_changed();
        }
    }

    fn text_changed(&mut self) {
        trace!("query changed to {:?}", self.input.as_str());
        self.debouncer.schedule();
    }

    /// Apply an action. Returns whether the widget consumed it.
    pub fn handle_action(&mut self, act: &Action) -> bool {
        use Action::*;
        match act {
            AddChar(c) => {
                self.input.insert(*c);
                self.text_changed();
            }
            BackwardDeleteChar => {
                if self.input.delete_backward().is_some() {
                    self.text_changed();
                }
            }
            DeleteChar => {
                if self.input.delete_forward().is_some() {
                    self.text_changed();
                }
            }
            KillLine => {
                if !self.input.kill_to_end().is_empty() {
                    self.text_changed();
                }
            }
            UnixLineDiscard => {
                if !self.input.delete_to_beginning().is_empty() {
                    self.text_changed();
                }
            }
            SetQuery(text) => self.on_text_change(text.clone()),
            BackwardChar => self.input.move_cursor(-1),
            ForwardChar => self.input.move_cursor(1),
            BeginningOfLine => self.input.move_to_start(),
            EndOfLine => self.input.move_to_end(),
            ClearQuery => self.clear(),
            Down => return self.on_key_down(NavKey::Down),
            Up => return self.on_key_down(NavKey::Up),
            Accept => return self.on_key_down(NavKey::Enter),
            Close => return self.on_key_down(NavKey::Escape),
            Abort | Ignore | Redraw => return false,
        }
        true
    }

    /// Dropdown navigation. A no-op unless the dropdown is open with settled results; returns
    /// whether the key was handled.
    pub fn on_key_down(&mut self, key: NavKey) -> bool {
        // while loading, `results` still belong to the previous query
        if !self.is_open || self.is_loading || self.results.is_empty() {
            return false;
        }
        let len = self.results.len();
        match key {
            NavKey::Down => {
                self.focused = Some(self.focused.map_or(0, |i| (i + 1) % len));
            }
            NavKey::Up => {
                self.focused = Some(self.focused.map_or(len - 1, |i| (i + len - 1) % len));
            }
            NavKey::Enter => {
                if let Some(item) = self.focused.and_then(|i| self.results.get(i)).cloned() {
                    self.select(item);
                }
            }
            NavKey::Escape => {
                self.is_open = false;
                self.focused = None;
                self.rows_area = None;
            }
        }
        true
    }

    /// Select `item`: report it and reset the widget
    pub fn select(&mut self, item: Arc<SearchResult>) {
        debug!("selected {}", item.id);
        (self.on_select)(Some(item));
        self.input.clear();
        self.reset();
    }

    /// Clear the query and report that nothing is selected
    pub fn clear(&mut self) {
        self.input.clear();
        self.reset();
        (self.on_select)(None);
    }

    fn reset(&mut self) {
        self.debouncer.cancel();
        self.invalidate_in_flight();
        self.debounced_query.clear();
        self.results.clear();
        self.is_loading = false;
        self.error = None;
        self.is_open = false;
        self.focused = None;
        self.scroll = 0;
        self.rows_area = None;
    }

    fn invalidate_in_flight(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    /// Commit the current query and search it, or close the dropdown when it is blank
    pub fn commit_query(&mut self) {
        self.debounced_query = self.input.to_string();
        self.invalidate_in_flight();
        if self.debounced_query.trim().is_empty() {
            self.results.clear();
            self.is_open = false;
            self.focused = None;
            self.is_loading = false;
            self.error = None;
            return;
        }

        self.is_loading = true;
        self.error = None;
        self.focused = None;
        let generation = self.generation;
        let query = self.source.query(&self.debounced_query);
        let tx = self.event_tx.clone();
        debug!("searching {:?} (generation {generation})", self.debounced_query);
        self.in_flight = Some(tokio::spawn(async move {
            let result = query.await.map_err(|e| e.to_string());
            _ = tx.send(Event::QueryDone { generation, result });
        }));
    }

    /// Feed an event posted by this widget's timer or query task. Returns whether the state
    /// changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::DebounceFired(ticket) => {
                if self.debouncer.fired(*ticket) {
                    self.commit_query();
                    true
                } else {
                    false
                }
            }
            Event::QueryDone { generation, result } => {
                if *generation != self.generation {
                    debug!("discarding stale results of generation {generation}");
                    return false;
                }
                self.in_flight = None;
                self.is_loading = false;
                match result {
                    Ok(results) => {
                        self.results = results.clone();
                        self.error = None;
                    }
                    Err(msg) => {
                        warn!("search failed: {msg}");
                        self.results.clear();
                        self.error = Some(msg.clone());
                    }
                }
                self.focused = None;
                self.scroll = 0;
                self.is_open = true;
                true
            }
            _ => false,
        }
    }

    /// Left click at `pos`. Returns whether it hit the widget.
    pub fn on_click(&mut self, pos: Position) -> bool {
        if self.input.clear_area().is_some_and(|a| a.contains(pos)) {
            self.clear();
            return true;
        }
        let Some(rows) = self.rows_area.filter(|_| self.is_open && !self.is_loading) else {
            return false;
        };
        if !rows.contains(pos) {
            return false;
        }
        let row = self.scroll + (pos.y - rows.y) as usize;
        if let Some(item) = self.results.get(row).cloned() {
            self.select(item);
        }
        true
    }

    fn dropdown_lines(&self) -> u16 {
        if !self.is_loading && self.error.is_none() && !self.results.is_empty() {
            self.results.len().min(DROPDOWN_ROWS as usize) as u16
        } else {
            1
        }
    }

    /// Rows needed to draw the widget with its dropdown
    pub fn height(&self) -> u16 {
        if self.is_open || self.is_loading {
            3 + self.dropdown_lines() + 2
        } else {
            3
        }
    }

    fn scroll_to_focus(&mut self, visible: usize) {
        if let Some(focused) = self.focused {
            if focused < self.scroll {
                self.scroll = focused;
            } else if focused >= self.scroll + visible {
                self.scroll = focused + 1 - visible;
            }
        }
    }

    /// Draw the input line and, when open, the dropdown below it
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) -> WidgetRender {
        let [input_area, dropdown_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
        let res = self.input.render(input_area, buf);
        self.rows_area = None;

        if !(self.is_open || self.is_loading) || dropdown_area.height < 3 {
            return res;
        }
        let height = (self.dropdown_lines() + 2).min(dropdown_area.height);
        let dropdown_area = Rect { height, ..dropdown_area };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(dropdown_area);
        block.render(dropdown_area, buf);

        if self.is_loading {
            Paragraph::new(Span::styled("Loading...", self.theme.loading)).render(inner, buf);
        } else if let Some(msg) = &self.error {
            Paragraph::new(Span::styled(msg.as_str(), self.theme.error)).render(inner, buf);
        } else if self.results.is_empty() {
            Paragraph::new(Span::styled("No results found.", self.theme.empty)).render(inner, buf);
        } else {
            let visible = inner.height as usize;
            self.scroll_to_focus(visible);
            for (offset, item) in self.results.iter().skip(self.scroll).take(visible).enumerate() {
                let row_area = Rect {
                    y: inner.y + offset as u16,
                    height: 1,
                    ..inner
                };
                let is_focused = self.focused == Some(self.scroll + offset);
                let (row_style, category_style) = if is_focused {
                    (self.theme.focused, self.theme.focused_category)
                } else {
                    (self.theme.normal, self.theme.category)
                };
                buf.set_style(row_area, row_style);
                let category_width = display_width(&item.category) as u16;
                let [title_area, _, category_area] = Layout::horizontal([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Length(category_width),
                ])
                .areas(row_area);
                Line::styled(item.title.as_str(), row_style).render(title_area, buf);
                Line::styled(item.category.as_str(), category_style).render(category_area, buf);
            }
            self.rows_area = Some(inner);
        }
        res
    }
}

impl Drop for SearchWidget {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
