//! Module containing typeahead's entry point
use std::io::{BufWriter, Stderr};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{self, OptionExt, Result};
use ratatui::Viewport;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::block_in_place;

use crate::source::{QuerySource, StaticCatalog};
use crate::theme::ColorTheme;
use crate::tui::{App, Event, Size, Tui};
use crate::{TypeaheadOptions, TypeaheadOutput};

/// Main entry point for running typeahead
pub struct Typeahead<Backend = ratatui::backend::CrosstermBackend<BufWriter<Stderr>>>
where
    Backend: ratatui::backend::Backend,
    Backend::Error: Send + Sync + 'static,
{
    app: App,
    tui: Option<Tui<Backend>>,
    height: Size,
    event_tx: UnboundedSender<Event>,
    // handed over to the TUI once it is created
    event_rx: Option<UnboundedReceiver<Event>>,
    final_event: Event,
}

impl Typeahead {
    /// Run typeahead until the user quits
    ///
    /// # Params
    ///
    /// - options: controls the pages, the search timing, the theme and the bindings
    /// - source: where search queries go. If None is given, the catalog file from the options is
    ///   loaded, falling back to the built-in demo catalog.
    ///
    /// # Returns
    ///
    /// The last selected item and whether the user aborted
    pub fn run_with(options: TypeaheadOptions, source: Option<Arc<dyn QuerySource>>) -> Result<TypeaheadOutput> {
        trace!("running typeahead");
        let mut typeahead = Self::init(options, source)?;
        typeahead.init_tui()?;
        let task = async {
            typeahead.enter()?;
            typeahead.run().await?;
            eyre::Ok(())
        };

        if let Ok(handle) = Handle::try_current() {
            block_in_place(|| handle.block_on(task))?;
        } else {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(task)?;
        }
        let output = typeahead.output();
        debug!("output: {output:?}");

        Ok(output)
    }

    /// Initialize the TUI on stderr, but do not enter it yet
    pub fn init_tui(&mut self) -> Result<()> {
        let event_rx = self.event_rx.take().ok_or_eyre("TUI already initialized")?;
        let mut tui = Tui::new_with_height(self.height, self.event_tx.clone(), event_rx)?;
        tui.mouse = !self.app.options.no_mouse;
        self.tui = Some(tui);
        Ok(())
    }
}

impl<Backend: ratatui::backend::Backend + 'static> Typeahead<Backend>
where
    Backend::Error: Send + Sync + 'static,
{
    /// Initialize typeahead, without starting anything yet
    pub fn init(options: TypeaheadOptions, source: Option<Arc<dyn QuerySource>>) -> Result<Self> {
        let height = Size::try_from(options.height.as_str())?;
        let theme = Arc::new(ColorTheme::init_from_options(&options));
        let source = match source {
            Some(source) => source,
            None => Arc::new(Self::default_source(&options)?),
        };
        let (event_tx, event_rx) = unbounded_channel();
        let app = App::from_options(options, theme, source, event_tx.clone());

        Ok(Self {
            app,
            tui: None,
            height,
            event_tx,
            event_rx: Some(event_rx),
            final_event: Event::Quit,
        })
    }

    fn default_source(options: &TypeaheadOptions) -> Result<StaticCatalog> {
        let catalog = match &options.catalog {
            Some(path) => {
                debug!("loading catalog from {path}");
                StaticCatalog::from_ron_file(path)?
            }
            None => StaticCatalog::demo(),
        };
        Ok(catalog.latency(Duration::from_millis(options.latency)))
    }

    /// Initialize the TUI on a caller-provided backend, full screen.
    ///
    /// Use this instead of [`init_tui()`](Typeahead::init_tui) when you need a
    /// non-default backend (e.g. `TestBackend` in tests).
    pub fn init_tui_with(&mut self, backend: Backend) -> Result<()> {
        let event_rx = self.event_rx.take().ok_or_eyre("TUI already initialized")?;
        let mut tui = Tui::new(backend, Viewport::Fullscreen, self.event_tx.clone(), event_rx)?;
        tui.mouse = !self.app.options.no_mouse;
        self.tui = Some(tui);
        Ok(())
    }

    /// Returns a shared reference to the application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns a mutable reference to the application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Returns a shared reference to the TUI.
    ///
    /// # Panics
    ///
    /// Panics if the TUI has not been initialized yet.
    pub fn tui_ref(&self) -> &Tui<Backend> {
        self.tui.as_ref().expect("TUI needs to be initialized before access")
    }

    /// Returns a mutable reference to the TUI.
    ///
    /// # Panics
    ///
    /// Panics if the TUI has not been initialized yet.
    pub fn tui_mut(&mut self) -> &mut Tui<Backend> {
        self.tui.as_mut().expect("TUI needs to be initialized before access")
    }

    /// Returns mutable references to both the app and the TUI, for `app.handle_event(tui, ...)`.
    ///
    /// # Panics
    ///
    /// Panics if the TUI has not been initialized yet.
    pub fn app_and_tui(&mut self) -> (&mut App, &mut Tui<Backend>) {
        (
            &mut self.app,
            self.tui.as_mut().expect("TUI needs to be initialized before access"),
        )
    }

    /// Returns a shared reference to the final event processed before quitting.
    pub fn final_event(&self) -> &Event {
        &self.final_event
    }

    /// Returns a clone of the event sender, to drive the application from outside the event loop.
    pub fn event_sender(&self) -> UnboundedSender<Event> {
        self.event_tx.clone()
    }

    /// Enter the TUI. Must be called from within a tokio runtime.
    pub fn enter(&mut self) -> Result<()> {
        debug!("Entering TUI");
        self.tui
            .as_mut()
            .ok_or_eyre("TUI needs to be initialized using Typeahead::init_tui before entering")?
            .enter()
    }

    /// Returns true once the user quit or aborted
    pub fn should_quit(&self) -> bool {
        self.app.should_quit
    }

    /// Process a single event.
    ///
    /// Returns `Ok(true)` if typeahead should quit, `Ok(false)` to continue.
    pub async fn tick(&mut self) -> Result<bool> {
        let tui = self
            .tui
            .as_mut()
            .ok_or_eyre("TUI should be initialized before the event loop can start")?;
        let evt = tui.next().await.ok_or_eyre("Could not acquire next event")?;
        if !matches!(evt, Event::Render) {
            self.final_event = evt.clone();
        }
        self.app.handle_event(tui, &evt)?;

        Ok(self.app.should_quit)
    }

    /// Run the event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        trace!("Starting event loop");
        loop {
            if self.tick().await? {
                break Ok(());
            }
        }
    }

    /// Capture `self` and extract the output, restoring the terminal
    pub fn output(mut self) -> TypeaheadOutput {
        if let Some(mut tui) = self.tui.take()
            && let Err(e) = tui.exit()
        {
            warn!("could not restore the terminal: {e}");
        }
        TypeaheadOutput {
            final_event: self.final_event,
            is_abort: self.app.aborted,
            selected: self.app.selected.clone(),
        }
    }
}
