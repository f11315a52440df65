use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use typeahead::tui::{App, Event, event::Action};
use typeahead::{QuerySource, StaticCatalog, Typeahead, TypeaheadOptions};

/// A test harness driving the whole application on a [`TestBackend`].
///
/// Events go through the same channel and `App::handle_event` as in the real event loop. The
/// harness is meant to run inside `#[tokio::test(start_paused = true)]` so that
/// [`TestHarness::advance`] moves the debounce, latency and toast timers deterministically.
pub struct TestHarness {
    /// The typeahead instance, backed by a TestBackend
    pub typeahead: Typeahead<TestBackend>,
    /// The event that made the app quit
    pub final_event: Option<Event>,
}

impl TestHarness {
    /// Process all pending events, including the ones queued while processing.
    pub fn tick(&mut self) -> Result<()> {
        loop {
            let mut events = Vec::new();
            while let Ok(event) = self.typeahead.tui_mut().event_rx.try_recv() {
                events.push(event);
            }
            if events.is_empty() {
                break;
            }
            for event in events {
                self.process_event(event)?;
            }
        }
        Ok(())
    }

    fn process_event(&mut self, event: Event) -> Result<()> {
        let (app, tui) = self.typeahead.app_and_tui();
        app.handle_event(tui, &event)?;
        if self.typeahead.should_quit() && self.final_event.is_none() {
            self.final_event = Some(event);
        }
        Ok(())
    }

    /// Queue an event; call `tick()` to process it.
    pub fn send(&mut self, event: Event) -> Result<()> {
        self.typeahead.tui_mut().event_tx.send(event)?;
        Ok(())
    }

    /// Let `ms` milliseconds of (paused) time pass, then run whatever the timers produced.
    pub async fn advance(&mut self, ms: u64) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        // timer fire -> commit -> query task -> completion
        for _ in 0..4 {
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            self.tick()?;
        }
        Ok(())
    }

    /// Send a key event and process it
    pub fn key(&mut self, key: KeyEvent) -> Result<()> {
        self.send(Event::Key(key))?;
        self.tick()
    }

    /// Send a character key event.
    pub fn char(&mut self, c: char) -> Result<()> {
        self.key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Type a string, one key event per character
    pub fn type_str(&mut self, s: &str) -> Result<()> {
        for c in s.chars() {
            self.char(c)?;
        }
        Ok(())
    }

    /// Send an action and process it
    pub fn action(&mut self, action: Action) -> Result<()> {
        self.send(Event::Action(action))?;
        self.tick()
    }

    /// Left click at column `x`, row `y`
    pub fn click(&mut self, x: u16, y: u16) -> Result<()> {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }))?;
        self.tick()
    }

    /// Render the current state to the test terminal
    pub fn render(&mut self) -> Result<()> {
        self.send(Event::Render)?;
        self.tick()?;
        // a Render event only draws dirty state
        let (app, tui) = self.typeahead.app_and_tui();
        tui.draw(|frame| {
            frame.render_widget(&mut *app, frame.area());
        })?;
        Ok(())
    }

    /// Get a string representation of the current buffer for snapshot testing.
    pub fn buffer_view(&self) -> String {
        self.typeahead.tui_ref().backend().to_string()
    }

    /// Rendered screen, one string per row
    pub fn rows(&mut self) -> Result<Vec<String>> {
        self.render()?;
        Ok(self
            .buffer_view()
            .lines()
            .map(|row| row.trim_matches('"').to_string())
            .collect())
    }

    /// Rendered screen, as shown in snapshots
    pub fn screen(&mut self) -> Result<String> {
        self.render()?;
        Ok(self.buffer_view())
    }

    /// Row index of the first line containing `text`
    pub fn find_row(&mut self, text: &str) -> Result<Option<u16>> {
        Ok(self.rows()?.iter().position(|row| row.contains(text)).map(|y| y as u16))
    }

    /// Shortcut to the application state
    pub fn app(&self) -> &App {
        self.typeahead.app()
    }

    /// Ids of the results currently shown by the search widget
    pub fn result_ids(&self) -> Vec<String> {
        self.app().search.results().iter().map(|r| r.id.clone()).collect()
    }

    /// Id of the last selected item
    pub fn selected_id(&self) -> Option<String> {
        self.app().selected.as_ref().map(|item| item.id.clone())
    }

    /// Messages of the visible toasts, oldest first
    pub fn toasts(&self) -> Vec<String> {
        self.app().notifications.iter().map(|n| n.message.clone()).collect()
    }

    /// Exit code the binary would return, `None` while the app is running
    pub fn app_exit_code(&self) -> Option<i32> {
        if !self.typeahead.should_quit() {
            return None;
        }
        let app = self.app();
        Some(match (app.aborted, &app.selected) {
            (true, _) => 130,
            (false, Some(_)) => 0,
            (false, None) => 1,
        })
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Initialize a test harness querying `source`, on a `width`x`height` terminal.
///
/// Uses [`Typeahead::init`] and [`Typeahead::init_tui_with`] so that the production code path
/// is exercised.
pub fn enter_with(
    options: TypeaheadOptions,
    source: Arc<dyn QuerySource>,
    width: u16,
    height: u16,
) -> Result<TestHarness> {
    let mut typeahead = Typeahead::<TestBackend>::init(options, Some(source))?;
    typeahead.init_tui_with(TestBackend::new(width, height))?;
    Ok(TestHarness {
        typeahead,
        final_event: None,
    })
}

/// Initialize a test harness on the demo catalog, on an 80x24 terminal.
pub fn enter(options: TypeaheadOptions) -> Result<TestHarness> {
    let latency = Duration::from_millis(options.latency);
    enter_with(options, Arc::new(StaticCatalog::demo().latency(latency)), 80, 24)
}

/// Parse options from CLI-style arguments.
pub fn parse_options(args: &[&str]) -> TypeaheadOptions {
    let mut full_args = vec!["typeahead"];
    full_args.extend(args);
    TypeaheadOptions::try_parse_from(full_args)
        .expect("Failed to parse options")
        .build()
}

// ============================================================================
// Macros
// ============================================================================

/// Render and compare the screen with an inline snapshot.
///
/// The last line of the snapshot is the 1-based `(row, column)` of the cursor.
#[macro_export]
macro_rules! snap {
    ($harness:ident, @$snapshot:literal) => {
        let buf = $harness.screen()?;
        let cursor = $harness.app().cursor_pos.map_or_else(
            || String::from("cursor: none"),
            |pos| format!("cursor: ({}, {})", pos.y + 1, pos.x + 1),
        );
        insta::assert_snapshot!(buf + &cursor, @$snapshot);
    };
}

/// Macro for writing compact scenario tests on the demo catalog.
///
/// ```ignore
/// typeahead_test!(test_name, &["--page", "search"], {
///     @type "react";      // Type a string
///     @wait 200;          // Let 200ms pass
///     @key Down;          // Send a special key
///     @ctrl 'x';          // Send a key with Ctrl
///     @action Up;         // Send an action
///     @click (3, 7);      // Left click at column 3, row 7
///     @contains "React";  // Assert the screen contains a text
///     @absent "Loading";  // Assert the screen does not contain a text
///     @snap r#"..."#;     // Compare the screen with an inline snapshot
///     @assert(|h| h.app().search.is_open());
///     @exited 0;          // Assert the exit code
/// });
/// ```
#[macro_export]
macro_rules! typeahead_test {
    ($name:ident, $options:expr, { $($content:tt)* }) => {
        #[tokio::test(start_paused = true)]
        async fn $name() -> color_eyre::Result<()> {
            let options = $crate::common::harness::parse_options($options);
            #[allow(unused_mut)]
            let mut h = $crate::common::harness::enter(options)?;

            typeahead_test!(@expand h; $($content)*);

            Ok(())
        }
    };

    (@expand $h:ident; ) => {};

    (@expand $h:ident; @snap $snapshot:literal ; $($rest:tt)*) => {
        $crate::snap!($h, @$snapshot);
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @char $c:expr ; $($rest:tt)*) => {
        $h.char($c)?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @type $text:expr ; $($rest:tt)*) => {
        $h.type_str($text)?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @wait $ms:expr ; $($rest:tt)*) => {
        $h.advance($ms).await?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @action $action:ident ; $($rest:tt)*) => {
        $h.action(typeahead::tui::event::Action::$action)?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @action $action:ident ($($args:tt)*) ; $($rest:tt)*) => {
        $h.action(typeahead::tui::event::Action::$action($($args)*))?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @key $key:ident ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$key,
            crossterm::event::KeyModifiers::NONE
        ))?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @ctrl $key:literal ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($key),
            crossterm::event::KeyModifiers::CONTROL
        ))?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @click ($x:expr, $y:expr) ; $($rest:tt)*) => {
        $h.click($x, $y)?;
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @contains $text:expr ; $($rest:tt)*) => {
        let screen = $h.screen()?;
        assert!(screen.contains($text), "expected {:?} on screen:\n{}", $text, screen);
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @absent $text:expr ; $($rest:tt)*) => {
        let screen = $h.screen()?;
        assert!(!screen.contains($text), "did not expect {:?} on screen:\n{}", $text, screen);
        typeahead_test!(@expand $h; $($rest)*);
    };

    // Usage: @assert(|h| h.app().search.is_open());
    (@expand $h:ident; @assert ( | $p:ident | $body:expr ) ; $($rest:tt)*) => {
        {
            let $p = &$h;
            assert!($body, "assertion failed: {}", stringify!($body));
        }
        typeahead_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @exited $code:expr ; $($rest:tt)*) => {
        assert_eq!(
            $h.app_exit_code(),
            Some($code),
            "Expected app to exit with status code {}, but got {:?}",
            $code,
            $h.app_exit_code()
        );
        typeahead_test!(@expand $h; $($rest)*);
    };
}
