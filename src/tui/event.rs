use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent};

use crate::item::SearchResult;
use crate::notify::NotificationMsg;

/// Events flowing through the application's single event loop
#[derive(Clone, Debug)]
pub enum Event {
    /// Quit the application
    Quit,
    /// An error occurred
    Error(String),
    /// Render the UI if anything changed
    Render,
    /// A key was pressed
    Key(KeyEvent),
    /// Text was pasted (bracketed paste)
    Paste(String),
    /// A mouse event occurred
    Mouse(MouseEvent),
    /// An action was triggered
    Action(Action),
    /// Redraw the screen
    Redraw,
    /// The terminal was resized
    Resize,
    /// The search debounce timer with this ticket elapsed
    DebounceFired(u64),
    /// A query issued for `generation` completed
    QueryDone {
        /// Request generation the result belongs to
        generation: u64,
        /// Results, or the error message
        result: Result<Vec<Arc<SearchResult>>, String>,
    },
    /// The search widget selected an item, or was cleared (`None`)
    Selected(Option<Arc<SearchResult>>),
    /// A message for the notification store
    Notify(NotificationMsg),
}

/// Actions that can be bound to keys
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// Abort and exit
    Abort,
    /// Select the focused result / open the focused menu entry
    Accept,
    /// Add a character to the query
    AddChar(char),
    /// Move cursor backward one character
    BackwardChar,
    /// Delete character before cursor
    BackwardDeleteChar,
    /// Move cursor to beginning of line
    BeginningOfLine,
    /// Clear the query and the selection
    ClearQuery,
    /// Close the dropdown, or leave the current page
    Close,
    /// Delete character under cursor
    DeleteChar,
    /// Move the focus down
    Down,
    /// Move cursor to end of line
    EndOfLine,
    /// Move cursor forward one character
    ForwardChar,
    /// Ignore the key
    Ignore,
    /// Delete from cursor to end of line
    KillLine,
    /// Redraw the screen
    Redraw,
    /// Replace the query
    SetQuery(String),
    /// Delete from cursor to beginning of line
    UnixLineDiscard,
    /// Move the focus up
    Up,
}

/// Parses an action string (`name` or `name:arg`) into an Action
pub fn parse_action(raw_action: &str) -> Option<Action> {
    let (action, arg) = match raw_action.split_once(':') {
        None => (raw_action, None),
        Some((act, "")) => (act, None),
        Some((act, a)) => (act, Some(a.to_string())),
    };
    debug!("parse_action: action={action}, arg={arg:?}");

    use Action::*;
    match action {
        "abort" => Some(Abort),
        "accept" => Some(Accept),
        "add-char" => arg.and_then(|a| a.chars().next()).map(AddChar),
        "backward-char" => Some(BackwardChar),
        "backward-delete-char" => Some(BackwardDeleteChar),
        "beginning-of-line" => Some(BeginningOfLine),
        "clear-query" => Some(ClearQuery),
        "close" => Some(Close),
        "delete-char" => Some(DeleteChar),
        "down" => Some(Down),
        "end-of-line" => Some(EndOfLine),
        "forward-char" => Some(ForwardChar),
        "ignore" => Some(Ignore),
        "kill-line" => Some(KillLine),
        "redraw" => Some(Redraw),
        "set-query" => Some(SetQuery(arg.unwrap_or_default())),
        "unix-line-discard" => Some(UnixLineDiscard),
        "up" => Some(Up),
        _ => None,
    }
}
