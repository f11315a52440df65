//! Typeahead is a debounced, keyboard-navigable search-select widget for the terminal.
//!
//! Typing edits the query; once the user stops typing for the quiet period the settled query is
//! handed to a [`QuerySource`], and its results are shown in a dropdown that can be navigated
//! with the arrow keys or the mouse. Only the newest query's results are ever displayed.
//!
//! The crate also ships the small demo application around the widget: a welcome menu, the
//! search page and a page raising toast notifications.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use typeahead::{StaticCatalog, Typeahead, TypeaheadOptionsBuilder};
//!
//! let options = TypeaheadOptionsBuilder::default()
//!     .height(String::from("12"))
//!     .debounce(150u64)
//!     .build()
//!     .unwrap();
//!
//! let output = Typeahead::run_with(options, Some(Arc::new(StaticCatalog::demo()))).unwrap();
//! if let Some(item) = output.selected {
//!     println!("{item}");
//! }
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::item::SearchResult;
pub use crate::options::{TypeaheadOptions, TypeaheadOptionsBuilder};
pub use crate::output::TypeaheadOutput;
pub use crate::source::{QueryError, QuerySource, StaticCatalog};
pub use crate::typeahead::Typeahead;

pub mod binds;
pub mod debounce;
pub mod item;
pub mod notify;
pub mod options;
mod output;
pub mod source;
pub mod theme;
pub mod tui;
mod typeahead;
