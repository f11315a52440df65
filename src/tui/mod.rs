//! Terminal UI: the application state, its widgets and the terminal event loop.

use std::num::ParseIntError;

pub use app::{App, Page};
pub use backend::Tui;
pub use event::Event;
pub use search::{NavKey, SearchWidget};
use thiserror::Error;
pub use widget::{TypeaheadWidget, WidgetRender};
mod app;
mod backend;
/// Event handling and action definitions
pub mod event;
mod input;
/// The search-select widget
pub mod search;
mod toast;
/// Widget rendering utilities
pub mod widget;

/// Represents a size value, either as a percentage or fixed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Size as a percentage (0-100)
    Percent(u16),
    /// Fixed size in terminal cells
    Fixed(u16),
}

/// Error returned when `--height` cannot be parsed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeParseError {
    /// Error parsing the size string
    #[error("Error parsing {0}: {1:?}")]
    ParseError(String, ParseIntError),
    /// Percentage value exceeds 100
    #[error("Invalid percentage {0}")]
    InvalidPercent(u16),
}

impl TryFrom<&str> for Size {
    type Error = SizeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parse = |digits: &str| {
            digits
                .parse::<u16>()
                .map_err(|e| SizeParseError::ParseError(value.to_string(), e))
        };
        match value.strip_suffix('%') {
            Some(digits) => match parse(digits)? {
                percent if percent > 100 => Err(SizeParseError::InvalidPercent(percent)),
                percent => Ok(Self::Percent(percent)),
            },
            None => parse(value).map(Self::Fixed),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Percent(100)
    }
}
