//! Configuration options for typeahead.
//!
//! This module provides the `TypeaheadOptions` struct and its builder.

use derive_builder::Builder;

use crate::binds::KeyMap;
use crate::tui::Page;

/// typeahead - debounced search-as-you-type demo
///
/// Type to search the catalog, pick a result with the arrow keys and Enter or with the mouse.
/// The selected item is printed on exit as `id<TAB>title<TAB>category`.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "typeahead", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct TypeaheadOptions {
    //  --- Search ---
    /// Text shown in the search box while it is empty
    #[cfg_attr(feature = "cli", arg(long, default_value = "Search...", help_heading = "Search"))]
    pub placeholder: String,

    /// Quiet period in milliseconds before the typed query is searched
    #[cfg_attr(feature = "cli", arg(long, default_value = "200", help_heading = "Search"))]
    pub debounce: u64,

    /// Simulated latency of the catalog, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, default_value = "0", help_heading = "Search"))]
    pub latency: u64,

    /// Load the catalog from a RON file instead of the built-in one
    ///
    /// Format: `[(id: "1", title: "React Basics", category: "Frontend"), ...]`
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Search", verbatim_doc_comment))]
    pub catalog: Option<String>,

    //  --- Interface ---
    /// Page to open on start
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "welcome", help_heading = "Interface")
    )]
    pub page: Page,

    /// Comma separated list of bindings
    ///
    /// Format: `<key>:<action>[+<action>...]`, e.g. `ctrl-j:down,ctrl-r:set-query:react`
    ///
    /// Keys: `ctrl-<c>`, `alt-<c>`, `shift-<c>`, `enter`, `esc`, `tab`, `btab`, `bspace`, `del`,
    /// `up`, `down`, `left`, `right`, `home`, `end`, `pgup`, `pgdown`, `f<n>`, `space`
    #[cfg_attr(feature = "cli", arg(long, short, help_heading = "Interface", verbatim_doc_comment))]
    pub bind: Vec<String>,

    /// Disable mouse
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_mouse: bool,

    /// Color configuration
    ///
    /// Base themes: `dark` (default), `light`, `none`; components are set with `name:color`
    /// where color is a 256 color index or `#rrggbb`, optionally followed by `:bold`, `:dim`...
    ///
    /// Components: normal, query, placeholder, clear, focused, category, focused_category,
    /// loading, error, empty, title, selected, border; suffix with `_bg` to set the background
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface", verbatim_doc_comment))]
    pub color: Option<String>,

    //  --- Layout ---
    /// Height of the window, in lines or percent of the terminal (`10`, `40%`)
    #[cfg_attr(feature = "cli", arg(long, default_value = "100%", help_heading = "Layout"))]
    pub height: String,

    //  --- Scripting ---
    /// Pipe log output to a file
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub log_file: Option<String>,

    /// The internal (parsed) keymap
    #[cfg_attr(feature = "cli", clap(skip))]
    pub keymap: KeyMap,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            placeholder: String::from("Search..."),
            debounce: 200,
            latency: 0,
            catalog: None,
            page: Page::default(),
            bind: Vec::new(),
            no_mouse: false,
            color: None,
            height: String::from("100%"),
            log_file: None,
            keymap: KeyMap::default(),
        }
    }
}

impl TypeaheadOptionsBuilder {
    /// Builds the TypeaheadOptions from the builder
    pub fn build(&mut self) -> Result<TypeaheadOptions, TypeaheadOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl TypeaheadOptions {
    /// Finalizes the options: parses the bindings into the keymap
    pub fn build(mut self) -> Self {
        self.keymap = self.bind.iter().fold(KeyMap::default(), |mut res, part| {
            res.add_keymaps(part.split(','));
            res
        });
        self
    }
}
