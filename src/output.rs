use std::sync::Arc;

use crate::item::SearchResult;
use crate::tui::Event;

/// Result of a typeahead session
#[derive(Debug)]
pub struct TypeaheadOutput {
    /// The last event processed before quitting
    pub final_event: Event,

    /// true if the user aborted (ctrl-c, ctrl-g)
    pub is_abort: bool,

    /// Last item picked on the search page, if any
    pub selected: Option<Arc<SearchResult>>,
}

impl TypeaheadOutput {
    /// Process exit code: 130 on abort, 0 when an item was selected, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match (self.is_abort, &self.selected) {
            (true, _) => 130,
            (false, Some(_)) => 0,
            (false, None) => 1,
        }
    }
}
