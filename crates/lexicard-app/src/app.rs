use anyhow::Context;
use kanal::AsyncReceiver;
use lexicard_io::ClipboardRead;
use lexicard_ui::{Dispatch, Key, Prompt, PromptAction, Request, ScreenBuffer};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::input::{interruptible, spawn_key_reader};
use crate::state::AppState;
use crate::tui::Tui;

const KEY_CAPACITY: usize = 64;

/// The running session: state, pages, terminal and the key feed.
pub struct App {
    pub(crate) state: AppState,
    pub(crate) buffer: ScreenBuffer,
    tui: Tui,
    keys: AsyncReceiver<Key>,
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

impl App {
    pub fn new(state: AppState, tui: Tui) -> Self {
        let (width, height) = tui.size();
        let buffer = ScreenBuffer::new(&state.config, width, height);

        let (tx, keys) = kanal::bounded_async(KEY_CAPACITY);
        let cancel = CancellationToken::new();
        let reader = spawn_key_reader(tx, cancel.child_token());

        Self {
            state,
            buffer,
            tui,
            keys,
            cancel,
            reader,
        }
    }

    pub async fn run(mut self, query: Option<String>) -> anyhow::Result<()> {
        self.state.load_cache().await;

        let result = self.main_loop(query).await;

        self.cancel.cancel();
        self.keys.close();
        if let Err(e) = (&mut self.reader).await {
            tracing::error!("Key reader panicked: {e}");
        }
        self.state.save_cache().await;
        result
    }

    async fn main_loop(&mut self, query: Option<String>) -> anyhow::Result<()> {
        if let Some(query) = query {
            self.search(&query).await?;
        }

        loop {
            self.draw(None)?;
            let Ok(key) = self.keys.recv().await else {
                tracing::warn!("Key feed closed");
                return Ok(());
            };
            if key == Key::Ctrl('c') {
                tracing::info!("Interrupted");
                return Ok(());
            }

            match self.buffer.dispatch(&key) {
                Dispatch::Request(Request::Quit) => {
                    tracing::info!("Quit requested");
                    return Ok(());
                }
                Dispatch::Request(request) => self.handle_request(request).await?,
                Dispatch::Handled | Dispatch::Ignored => {}
            }
        }
    }

    /// Render the pages, with `prompt` over the bottom rows when given.
    pub(crate) fn draw(&mut self, prompt: Option<&Prompt>) -> anyhow::Result<()> {
        let buffer = &mut self.buffer;
        self.tui
            .terminal
            .draw(|frame| {
                let area = frame.area();
                buffer.draw(area, frame.buffer_mut());
                if let Some(prompt) = prompt {
                    let cursor = prompt.draw(area, frame.buffer_mut(), buffer.palette());
                    frame.set_cursor_position(cursor);
                }
            })
            .context("draw frame")?;
        Ok(())
    }

    pub(crate) fn clear(&mut self) -> anyhow::Result<()> {
        self.tui.terminal.clear().context("clear terminal")
    }

    /// Read a line. `None` when cancelled.
    pub(crate) async fn prompt(&mut self, mut prompt: Prompt) -> anyhow::Result<Option<String>> {
        loop {
            self.draw(Some(&prompt))?;
            let Ok(key) = self.keys.recv().await else {
                return Ok(None);
            };
            if let Key::Resize(width, height) = key {
                self.buffer.resize(width, height);
                continue;
            }

            match prompt.handle(&key) {
                PromptAction::Continue => {}
                PromptAction::Accept(text) => return Ok(Some(text)),
                PromptAction::Cancel => return Ok(None),
                PromptAction::Paste => match self.state.clipboard.read() {
                    Ok(text) => prompt.insert_str(&text),
                    Err(e) => self.buffer.status_mut().error("ClipboardError", Some(&e.to_string())),
                },
            }
        }
    }

    /// Run a search unless an interrupt key arrives first.
    pub(crate) async fn search(&mut self, raw: &str) -> anyhow::Result<()> {
        if raw.trim().is_empty() {
            return Ok(());
        }
        self.buffer.status_mut().writeln("Searching", Some(raw));
        self.draw(None)?;

        let mut resized = None;
        let outcome = interruptible(self.state.orchestrator.search(raw), &self.keys, &mut resized).await;
        if let Some((width, height)) = resized {
            self.buffer.resize(width, height);
        }
        self.buffer.status_mut().clear();

        let Some(outcome) = outcome else {
            self.buffer.status_mut().attention("Search cancelled", None);
            return Ok(());
        };
        for line in crate::events::search::report_search(&mut self.buffer, outcome) {
            if let Err(e) = self.state.remember(&line) {
                self.buffer.status_mut().error("HistoryError", Some(&e.to_string()));
                break;
            }
        }
        Ok(())
    }
}
