use std::sync::Arc;

use color_eyre::eyre::{Result, bail};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::prelude::Backend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use tokio::sync::mpsc::UnboundedSender;

use crate::item::SearchResult;
use crate::notify::{NotificationKind, NotificationStore, Notifier};
use crate::source::QuerySource;
use crate::theme::ColorTheme;
use crate::tui::search::SearchWidget;
use crate::tui::toast::Toasts;
use crate::tui::widget::{TypeaheadWidget, WidgetRender};
use crate::TypeaheadOptions;

use super::Event;
use super::Tui;
use super::event::Action;

/// Pages of the application
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Page {
    /// Menu leading to the other pages
    #[default]
    Welcome,
    /// Selected item and the search widget
    Search,
    /// Buttons raising toasts
    Notifications,
}

// page, shortcut, name, description
const MENU: [(Page, char, &str, &str); 2] = [
    (Page::Search, 's', "Search", "Search Component"),
    (Page::Notifications, 'n', "Notifications", "Notifications Component"),
];

const BUTTONS: [(char, NotificationKind, &str); 3] = [
    ('s', NotificationKind::Success, "Show Success"),
    ('e', NotificationKind::Error, "Show Error"),
    ('i', NotificationKind::Info, "Show Info"),
];

/// Application state
pub struct App {
    /// Page currently shown
    pub page: Page,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Whether the user aborted
    pub aborted: bool,
    /// Last item selected on the search page
    pub selected: Option<Arc<SearchResult>>,
    /// Current cursor position, if a text input is shown
    pub cursor_pos: Option<Position>,
    /// The search widget
    pub search: SearchWidget,
    /// Visible toast notifications
    pub notifications: NotificationStore,
    /// Toast overlay
    pub toasts: Toasts,
    /// Typeahead configuration options
    pub options: TypeaheadOptions,
    notifier: Notifier,
    menu_index: usize,
    click_targets: Vec<(Rect, Action)>,
    theme: Arc<ColorTheme>,
    dirty: bool,
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title_area, _, body_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let (title, help) = match self.page {
            Page::Welcome => ("Welcome", "↑/↓ move · enter open · q quit"),
            Page::Search => ("Search", "↑/↓ move · enter select · esc close/back · ctrl-x clear"),
            Page::Notifications => ("Notifications", "s/e/i show a toast · esc back · q quit"),
        };
        Line::styled(title, self.theme.title).render(title_area, buf);
        Line::styled(help, self.theme.placeholder).render(help_area, buf);

        self.click_targets.clear();
        let mut res = WidgetRender::default();
        match self.page {
            Page::Welcome => self.render_welcome(body_area, buf),
            Page::Search => res |= self.render_search(body_area, buf),
            Page::Notifications => self.render_notifications(body_area, buf),
        }

        self.toasts.update(self.notifications.iter());
        res |= self.toasts.render(area, buf);
        self.cursor_pos = res.cursor;
    }
}

impl App {
    /// Creates the application. Widgets post their timer and query events on `event_tx`.
    pub fn from_options(
        options: TypeaheadOptions,
        theme: Arc<ColorTheme>,
        source: Arc<dyn QuerySource>,
        event_tx: UnboundedSender<Event>,
    ) -> Self {
        let select_tx = event_tx.clone();
        let search = SearchWidget::new(&options, theme.clone(), source, event_tx.clone()).on_select(move |item| {
            _ = select_tx.send(Event::Selected(item));
        });
        let notifications = NotificationStore::new(event_tx);
        Self {
            page: options.page,
            should_quit: false,
            aborted: false,
            selected: None,
            cursor_pos: None,
            search,
            notifier: notifications.notifier(),
            notifications,
            toasts: Toasts::from_options(&options, theme.clone()),
            options,
            menu_index: 0,
            click_targets: Vec::new(),
            theme,
            dirty: true,
        }
    }

    fn render_welcome(&mut self, area: Rect, buf: &mut Buffer) {
        Line::styled("Choose where you'd like to go:", self.theme.normal).render(area, buf);
        for (i, (_, shortcut, name, description)) in MENU.iter().enumerate() {
            let entry = Rect::new(area.x, area.y + 2 + 3 * i as u16, area.width, 2).intersection(area);
            if entry.is_empty() {
                break;
            }
            let style = if i == self.menu_index {
                self.theme.focused
            } else {
                self.theme.normal
            };
            let marker = if i == self.menu_index { "> " } else { "  " };
            buf.set_style(entry, style);
            let [name_area, description_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(entry);
            Line::from(vec![Span::raw(marker), Span::styled(*name, self.theme.title)])
                .style(style)
                .render(name_area, buf);
            Line::styled(format!("  {description}"), style).render(description_area, buf);
            self.click_targets.push((entry, Action::AddChar(*shortcut)));
        }
    }

    fn render_search(&mut self, area: Rect, buf: &mut Buffer) -> WidgetRender {
        let panel_height = if self.selected.is_some() { 3 } else { 0 };
        let [panel_area, widget_area] =
            Layout::vertical([Constraint::Length(panel_height), Constraint::Fill(1)]).areas(area);
        if let Some(item) = &self.selected {
            let [label, value] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(panel_area);
            Line::styled("Selected Item:", self.theme.normal).render(label, buf);
            Line::from(vec![
                Span::styled(item.title.as_str(), self.theme.selected),
                Span::raw("  "),
                Span::styled(item.category.as_str(), self.theme.category),
            ])
            .render(value, buf);
        }
        self.search.render(widget_area, buf)
    }

    fn render_notifications(&mut self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        for (key, kind, label) in BUTTONS {
            let text = format!(" [{key}] {label} ");
            let width = (text.chars().count() as u16).min(area.right().saturating_sub(x));
            if width == 0 || area.height == 0 {
                break;
            }
            let button = Rect::new(x, area.y, width, 1);
            let style: Style = match kind {
                NotificationKind::Success => self.theme.toast_success,
                NotificationKind::Error => self.theme.toast_error,
                NotificationKind::Info => self.theme.toast_info,
            };
            Line::styled(text, style).render(button, buf);
            self.click_targets.push((button, Action::AddChar(key)));
            x += width + 2;
        }
    }

    /// Handles a TUI event and updates application state
    pub fn handle_event<B: Backend>(&mut self, tui: &mut Tui<B>, event: &Event) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        match event {
            Event::Render => {
                if self.dirty {
                    tui.draw(|f| {
                        f.render_widget(&mut *self, f.area());
                        if let Some(pos) = self.cursor_pos {
                            f.set_cursor_position(pos);
                        }
                    })?;
                    self.dirty = false;
                }
                return Ok(());
            }
            Event::Quit => {
                tui.exit()?;
                self.should_quit = true;
            }
            Event::Error(msg) => {
                tui.exit()?;
                bail!(msg.to_owned());
            }
            Event::Action(act) => {
                for evt in self.handle_action(act) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Key(key) => {
                for evt in self.handle_key(key) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Paste(text) => {
                if self.page == Page::Search {
                    self.search.paste(text);
                }
            }
            Event::Mouse(mouse_event) => {
                for evt in self.handle_mouse(mouse_event) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Redraw => {
                tui.clear()?;
            }
            Event::Resize => (),
            Event::DebounceFired(_) | Event::QueryDone { .. } => {
                self.search.handle_event(event);
            }
            Event::Selected(item) => self.on_selected(item.clone()),
            Event::Notify(msg) => {
                self.notifications.apply(msg);
            }
        };
        self.dirty = true;

        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Event> {
        debug!("key event: {:?}", key);

        if let Some(act) = self.options.keymap.actions_for(key) {
            debug!("{act:?}");
            return act.iter().map(|a| Event::Action(a.clone())).collect();
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, Char(c)) => vec![Event::Action(Action::AddChar(c))],
            (KeyModifiers::SHIFT, Char(c)) => c.to_uppercase().map(|c| Event::Action(Action::AddChar(c))).collect(),
            _ => vec![],
        }
    }

    fn handle_action(&mut self, act: &Action) -> Vec<Event> {
        match act {
            Action::Abort => {
                self.should_quit = true;
                self.aborted = true;
                return vec![];
            }
            Action::Redraw => return vec![Event::Redraw],
            _ => (),
        }
        match self.page {
            Page::Welcome => self.welcome_action(act),
            Page::Search => {
                if !self.search.handle_action(act) && *act == Action::Close {
                    self.goto(Page::Welcome);
                }
            }
            Page::Notifications => match act {
                Action::AddChar('q') => self.should_quit = true,
                Action::AddChar(c) => {
                    if let Some((_, kind, _)) = BUTTONS.iter().find(|(key, _, _)| key == c) {
                        self.notifier.notify(format!("This is a {kind} notification!"), *kind);
                    }
                }
                Action::Close => self.goto(Page::Welcome),
                _ => (),
            },
        }
        vec![]
    }

    fn welcome_action(&mut self, act: &Action) {
        match act {
            Action::Down => self.menu_index = (self.menu_index + 1) % MENU.len(),
            Action::Up => self.menu_index = (self.menu_index + MENU.len() - 1) % MENU.len(),
            Action::Accept => self.goto(MENU[self.menu_index].0),
            Action::AddChar('q') | Action::Close => self.should_quit = true,
            Action::AddChar(c) => {
                if let Some((page, _, _, _)) = MENU.iter().find(|(_, shortcut, _, _)| shortcut == c) {
                    self.goto(*page);
                }
            }
            _ => (),
        }
    }

    fn goto(&mut self, page: Page) {
        debug!("going to page {page:?}");
        if let Some(i) = MENU.iter().position(|(p, _, _, _)| *p == page) {
            self.menu_index = i;
        }
        self.page = page;
    }

    fn on_selected(&mut self, item: Option<Arc<SearchResult>>) {
        if let Some(item) = &item {
            self.notifier
                .notify(format!("Selected {}", item.title), NotificationKind::Info);
        }
        self.selected = item;
    }

    fn handle_mouse(&mut self, mouse_event: &MouseEvent) -> Vec<Event> {
        let pos = Position {
            x: mouse_event.column,
            y: mouse_event.row,
        };
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.toasts.close_hit(pos) {
                    self.notifier.dismiss(id);
                    return vec![];
                }
                if self.page == Page::Search {
                    self.search.on_click(pos);
                    return vec![];
                }
                self.click_targets
                    .iter()
                    .find(|(area, _)| area.contains(pos))
                    .map(|(_, act)| vec![Event::Action(act.clone())])
                    .unwrap_or_default()
            }
            MouseEventKind::ScrollDown if self.page == Page::Search => vec![Event::Action(Action::Down)],
            MouseEventKind::ScrollUp if self.page == Page::Search => vec![Event::Action(Action::Up)],
            _ => vec![],
        }
    }
}
