//! TUI state: the active tab plus both flows.
//!
//! `update` is pure. Requests come back out as [`Effect`]s for the event loop
//! to run, and their outcomes are fed back in through [`App::complete`].

use std::path::{Path, PathBuf};

use crate::backend::{Backend, NetworkError};
use crate::flow::{DocumentSummaryFlow, TextSummaryFlow};
use crate::summary::{DocumentRequest, DocumentResult, TextRequest, TextResult};

use super::input::Action;

/// Which tab is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Text,
    Document,
}

impl Tab {
    pub const TITLES: [&'static str; 2] = ["Text", "Document"];

    pub fn index(self) -> usize {
        match self {
            Tab::Text => 0,
            Tab::Document => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Tab::Text => Tab::Document,
            Tab::Document => Tab::Text,
        }
    }
}

/// A request the event loop should run in the background.
#[derive(Debug, Clone)]
pub enum Effect {
    SummarizeText(TextRequest),
    SummarizeDocument(DocumentRequest),
}

impl Effect {
    pub async fn run(self, backend: &Backend) -> Completion {
        match self {
            Effect::SummarizeText(request) => {
                Completion::Text(backend.summarize_text(&request).await)
            }
            Effect::SummarizeDocument(request) => {
                Completion::Document(backend.summarize_document(&request).await)
            }
        }
    }
}

/// Outcome of an [`Effect`], routed back to the flow that started it.
#[derive(Debug)]
pub enum Completion {
    Text(Result<TextResult, NetworkError>),
    Document(Result<DocumentResult, NetworkError>),
}

pub struct App {
    pub tab: Tab,
    pub text: TextSummaryFlow,
    pub document: DocumentSummaryFlow,
    /// Path typed on the document tab
    pub path_input: String,
    pub tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(show_error_detail: bool) -> Self {
        Self {
            tab: Tab::Text,
            text: TextSummaryFlow::new().with_error_detail(show_error_detail),
            document: DocumentSummaryFlow::new().with_error_detail(show_error_detail),
            path_input: String::new(),
            tick: 0,
            should_quit: false,
        }
    }

    /// Open on the document tab with `path` already selected.
    pub fn preselect(&mut self, path: &Path) {
        self.tab = Tab::Document;
        self.path_input = path.display().to_string();
        // A rejected path leaves its message in the flow state
        let _ = self.document.select_path(path);
    }

    /// Whether the active tab's submit trigger is enabled.
    pub fn can_submit(&self) -> bool {
        match self.tab {
            Tab::Text => self.text.can_submit(),
            Tab::Document => self.document.can_submit(),
        }
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextTab | Action::PrevTab => self.tab = self.tab.toggle(),
            Action::Tick => self.tick = self.tick.wrapping_add(1),
            Action::Submit => return self.submit(),
            Action::SelectPath => self.select_typed_path(),
            Action::Insert(c) => self.insert(c),
            Action::Paste(text) => {
                // Terminals deliver pasted line breaks as CR
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                for c in text.chars() {
                    self.insert(c);
                }
            }
            Action::Newline => {
                if self.tab == Tab::Text {
                    self.text.push_char('\n');
                }
            }
            Action::Backspace => match self.tab {
                Tab::Text => self.text.pop_char(),
                Tab::Document => {
                    self.path_input.pop();
                }
            },
            Action::ClearInput => match self.tab {
                Tab::Text => self.text.clear_content(),
                Tab::Document => {
                    self.path_input.clear();
                    self.document.clear_selection();
                }
            },
            Action::None => {}
        }
        None
    }

    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Text(outcome) => self.text.finish(outcome),
            Completion::Document(outcome) => self.document.finish(outcome),
        }
    }

    /// Disabled triggers do nothing; enabled ones may still fail validation,
    /// which the flow records as its error message.
    fn submit(&mut self) -> Option<Effect> {
        if !self.can_submit() {
            return None;
        }
        match self.tab {
            Tab::Text => self.text.begin().ok().flatten().map(Effect::SummarizeText),
            Tab::Document => self
                .document
                .begin()
                .ok()
                .flatten()
                .map(Effect::SummarizeDocument),
        }
    }

    fn insert(&mut self, c: char) {
        match self.tab {
            Tab::Text => {
                // Refused past the cap
                self.text.push_char(c);
            }
            Tab::Document => {
                if !c.is_control() {
                    self.path_input.push(c);
                }
            }
        }
    }

    fn select_typed_path(&mut self) {
        let typed = self.path_input.trim();
        if typed.is_empty() {
            return;
        }
        let path = expand_home(typed);
        let _ = self.document.select_path(&path);
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
