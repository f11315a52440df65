use std::io::{BufWriter, Stderr};
use std::ops::{Deref, DerefMut};
use std::sync::Once;

use color_eyre::eyre::Result;
use crossterm::cursor;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyEventKind};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt as _, StreamExt as _};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Backend;
use ratatui::{TerminalOptions, Viewport};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Event, Size};

const FRAME_RATE: f64 = 30.;
static PANIC_HOOK_SET: Once = Once::new();

/// Terminal user interface handler
pub struct Tui<B: Backend = CrosstermBackend<BufWriter<Stderr>>> {
    /// The ratatui terminal instance
    pub terminal: ratatui::Terminal<B>,
    /// Background task handle for event polling
    pub task: Option<JoinHandle<()>>,
    /// Receiver for TUI events
    pub event_rx: UnboundedReceiver<Event>,
    /// Sender for TUI events
    pub event_tx: UnboundedSender<Event>,
    /// Frame rate for rendering (frames per second)
    pub frame_rate: f64,
    /// Token for cancelling background tasks
    pub cancellation_token: CancellationToken,
    /// Whether running in fullscreen mode
    pub is_fullscreen: bool,
    /// Whether mouse events are captured
    pub mouse: bool,
}

impl Tui {
    /// Creates a TUI drawing on stderr, `height` lines tall (full screen at 100%)
    pub fn new_with_height(
        height: Size,
        event_tx: UnboundedSender<Event>,
        event_rx: UnboundedReceiver<Event>,
    ) -> Result<Self> {
        let backend = CrosstermBackend::new(BufWriter::new(std::io::stderr()));
        let term_height = crossterm::terminal::size()?.1;
        let viewport = match height {
            Size::Percent(100) => Viewport::Fullscreen,
            Size::Fixed(lines) => Viewport::Inline(lines.min(term_height)),
            Size::Percent(p) => Viewport::Inline(term_height * p / 100),
        };
        set_panic_hook();
        Tui::new(backend, viewport, event_tx, event_rx)
    }
}

impl<B: Backend> Tui<B>
where
    B::Error: Send + Sync + 'static,
{
    /// Creates a TUI on any backend, using an existing event channel
    pub fn new(
        backend: B,
        viewport: Viewport,
        event_tx: UnboundedSender<Event>,
        event_rx: UnboundedReceiver<Event>,
    ) -> Result<Self> {
        let is_fullscreen = matches!(viewport, Viewport::Fullscreen);
        Ok(Self {
            terminal: ratatui::Terminal::with_options(backend, TerminalOptions { viewport })?,
            task: None,
            event_rx,
            event_tx,
            frame_rate: FRAME_RATE,
            cancellation_token: CancellationToken::default(),
            is_fullscreen,
            mouse: true,
        })
    }

    /// Enters the TUI by enabling raw mode and starting event handling
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnableBracketedPaste)?;
        if self.mouse {
            crossterm::execute!(std::io::stderr(), EnableMouseCapture)?;
        }
        if self.is_fullscreen {
            crossterm::execute!(std::io::stderr(), EnterAlternateScreen)?;
        }
        self.start();
        Ok(())
    }

    /// Exits the TUI by stopping event handling and disabling raw mode
    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            crossterm::execute!(
                std::io::stderr(),
                DisableMouseCapture,
                DisableBracketedPaste,
                LeaveAlternateScreen,
                cursor::Show
            )?;
            crossterm::terminal::disable_raw_mode()?;
            // the inline viewport leaves its last frame behind
            if !self.is_fullscreen {
                self.clear()?;
            }
        }
        Ok(())
    }

    /// Stops the TUI event loop
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    /// Starts the task forwarding terminal events and render ticks to the event channel
    pub fn start(&mut self) {
        let render_delay = std::time::Duration::from_secs_f64(1.0 / self.frame_rate);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.cancellation_token = CancellationToken::new();
        let event_tx = self.event_tx.clone();
        let cancellation_token = self.cancellation_token.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut render_interval = tokio::time::interval(render_delay);
            loop {
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    _ = cancellation_token.cancelled() => {
                        break;
                    }
                    maybe_event = crossterm_event => {
                        let event = match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key))) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            Some(Ok(crossterm::event::Event::Mouse(mouse))) => Some(Event::Mouse(mouse)),
                            Some(Ok(crossterm::event::Event::Paste(text))) => Some(Event::Paste(text)),
                            Some(Ok(crossterm::event::Event::Resize(_, _))) => Some(Event::Resize),
                            Some(Err(e)) => Some(Event::Error(e.to_string())),
                            None | Some(Ok(_)) => None,
                        };
                        if let Some(event) = event {
                            _ = event_tx.send(event);
                        }
                    }
                    _ = render_delay => {
                        _ = event_tx.send(Event::Render);
                    }
                }
            }
        }));
    }

    /// Gets the next event from the event queue
    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl<B: Backend> Deref for Tui<B> {
    type Target = ratatui::Terminal<B>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl<B: Backend> DerefMut for Tui<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        if let Some(t) = self.task.take() {
            t.abort();
        }
        self.cancellation_token.cancel();
        if crossterm::terminal::is_raw_mode_enabled().unwrap_or(false) {
            _ = self.terminal.flush();
            _ = crossterm::execute!(
                std::io::stderr(),
                DisableMouseCapture,
                DisableBracketedPaste,
                LeaveAlternateScreen,
                cursor::Show
            );
            _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            ratatui::restore(); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    });
}
