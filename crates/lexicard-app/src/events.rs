use lexicard_anki::{AnkiError, AnkiPort};
use lexicard_io::ClipboardRead;
use lexicard_ui::{Completion, Prompt, Request};

use crate::app::App;

pub mod anki_setup;
pub mod command;
pub mod create_card;
pub mod search;

use anki_setup::{apply_setup, check_deck, describe_mapping, fetch_note_mapping};
use command::{CommandOutcome, apply_command, command_names};
use create_card::handle_card_creation;

impl App {
    pub(crate) async fn handle_request(&mut self, request: Request) -> anyhow::Result<()> {
        tracing::debug!("Request: {request:?}");
        match request {
            Request::Quit => {}
            Request::Redraw => self.clear()?,
            Request::Search(text) => self.search_prompt(text.as_deref()).await?,
            Request::Paste => match self.state.clipboard.read() {
                Ok(text) => self.search_prompt(Some(text.trim())).await?,
                Err(e) => self.buffer.status_mut().error("ClipboardError", Some(&e.to_string())),
            },
            Request::FindInPage => {
                let pattern = self.prompt(Prompt::new("/")).await?;
                match pattern {
                    Some(pattern) if !pattern.is_empty() => {
                        self.buffer.find_in_page(&pattern);
                    }
                    _ => {}
                }
            }
            Request::Command => self.command_prompt().await?,
            Request::AnkiSetup => self.anki_setup().await?,
            Request::CreateCards => {
                self.buffer.status_mut().writeln("Adding cards", None);
                self.draw(None)?;
                self.buffer.status_mut().clear();
                handle_card_creation(&self.state.anki, &self.state.config, &mut self.buffer).await;
            }
            Request::PlayAudio(Some(url)) => match self.state.audio.play(&url) {
                Ok(played) => {
                    if let (Some(previous), Some(status)) = (played.previous, played.previous_status) {
                        if !status.success() {
                            self.buffer
                                .status_mut()
                                .attention("Player failed", Some(&format!("{previous}: {status}")));
                        }
                    }
                    self.buffer.status_mut().writeln("Playing", Some(&url));
                }
                Err(e) => self.buffer.status_mut().error("AudioError", Some(&e.to_string())),
            },
            Request::PlayAudio(None) => self.buffer.status_mut().error("NoAudio", None),
            Request::OpenBrowser(Some(url)) => match lexicard_io::open_url(&url) {
                Ok(()) => self.buffer.status_mut().writeln("Opened", Some(&url)),
                Err(e) => self.buffer.status_mut().error("BrowserError", Some(&e.to_string())),
            },
            Request::OpenBrowser(None) => self.buffer.status_mut().error("NoUrl", None),
        }
        Ok(())
    }

    async fn search_prompt(&mut self, text: Option<&str>) -> anyhow::Result<()> {
        let history = self.state.history_entries();
        let prompt = Prompt::new("Search: ")
            .with_text(text.unwrap_or_default())
            .with_completion(Completion::new(history.clone()))
            .with_history(history);

        match self.prompt(prompt).await? {
            Some(query) => self.search(&query).await,
            None => Ok(()),
        }
    }

    async fn command_prompt(&mut self) -> anyhow::Result<()> {
        let prompt = Prompt::new(":").with_completion(Completion::new(command_names()));
        let Some(input) = self.prompt(prompt).await? else {
            return Ok(());
        };
        if input.trim().is_empty() {
            return Ok(());
        }

        match apply_command(&mut self.state.config, &input) {
            Ok(CommandOutcome::Shown { name, value }) => {
                self.buffer.status_mut().writeln(&name, Some(&value));
            }
            Ok(CommandOutcome::Changed { name, value }) => {
                self.buffer.apply_config(&self.state.config);
                self.state.refresh();
                match self.state.save_profile() {
                    Ok(()) => self.buffer.status_mut().success(&name, Some(&value)),
                    Err(e) => self.buffer.status_mut().error("ConfigError", Some(&e.to_string())),
                }
            }
            Err(e) => self.buffer.status_mut().error("ConfigError", Some(&e.to_string())),
        }
        Ok(())
    }

    fn report_anki(&mut self, e: &AnkiError) {
        self.buffer.status_mut().error(e.label(), Some(&e.to_string()));
    }

    async fn anki_setup(&mut self) -> anyhow::Result<()> {
        let models = match self.state.anki.model_names().await {
            Ok(models) => models,
            Err(e) => {
                self.report_anki(&e);
                return Ok(());
            }
        };
        let prompt = Prompt::new("Note type: ")
            .with_text(&self.state.config.anki.note)
            .with_completion(Completion::new(models));
        let Some(note) = self.prompt(prompt).await? else {
            return Ok(());
        };
        let note = note.trim().to_string();

        let fields = match fetch_note_mapping(&self.state.anki, &note).await {
            Ok(fields) => fields,
            Err(e) => {
                self.report_anki(&e);
                return Ok(());
            }
        };
        self.buffer
            .status_mut()
            .writeln("Fields", Some(&describe_mapping(&fields)));

        let decks = match self.state.anki.deck_names().await {
            Ok(decks) => decks,
            Err(e) => {
                self.report_anki(&e);
                return Ok(());
            }
        };
        let prompt = Prompt::new("Deck: ")
            .with_text(&self.state.config.anki.deck)
            .with_completion(Completion::new(decks));
        let Some(deck) = self.prompt(prompt).await? else {
            return Ok(());
        };
        let deck = deck.trim().to_string();
        if let Err(e) = check_deck(&self.state.anki, &deck).await {
            self.report_anki(&e);
            return Ok(());
        }

        apply_setup(&mut self.state.config.anki, &note, &deck, fields);
        self.state.refresh();
        match self.state.save_profile() {
            Ok(()) => self
                .buffer
                .status_mut()
                .success("Anki configured", Some(&format!("{note} into {deck}"))),
            Err(e) => self.buffer.status_mut().error("ConfigError", Some(&e.to_string())),
        }
        Ok(())
    }
}
