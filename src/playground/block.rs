//! Code blocks as seen by the run pipeline.

use std::sync::{Arc, OnceLock};

use crate::playground::panel::ResultPanel;
use crate::playground::types::Edition;

/// Class marking a block the reader may edit.
pub const EDITABLE_CLASS: &str = "editable";

/// A unit of source text on a page.
#[derive(Debug)]
pub struct CodeBlock {
    classes: Vec<String>,
    playground: bool,
    original: String,
    text: String,
    original_boring: Vec<usize>,
    boring_lines: Vec<usize>,
    hide_boring: bool,
    panel: OnceLock<Arc<ResultPanel>>,
}

impl CodeBlock {
    /// A plain, non-executable block.
    pub fn new<I, S>(text: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            playground: false,
            original: text.clone(),
            text,
            original_boring: Vec::new(),
            boring_lines: Vec::new(),
            hide_boring: false,
            panel: OnceLock::new(),
        }
    }

    /// A block that can be sent to the execution service.
    pub fn playground<I, S>(text: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            playground: true,
            ..Self::new(text, classes)
        }
    }

    /// Mark lines (0-based) as boring; they start hidden.
    pub fn with_boring_lines(mut self, lines: Vec<usize>) -> Self {
        self.hide_boring = !lines.is_empty();
        self.original_boring = lines.clone();
        self.boring_lines = lines;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn language(&self) -> Option<&str> {
        self.classes.iter().find_map(|c| c.strip_prefix("language-"))
    }

    pub fn is_playground(&self) -> bool {
        self.playground
    }

    pub fn is_editable(&self) -> bool {
        self.has_class(EDITABLE_CLASS)
    }

    pub fn edition(&self) -> Edition {
        Edition::from_tags(&self.classes)
    }

    /// The attached panel, if a run ever created one.
    pub fn result_panel(&self) -> Option<&Arc<ResultPanel>> {
        self.panel.get()
    }

    pub(crate) fn panel_or_init(&self) -> Arc<ResultPanel> {
        self.panel.get_or_init(|| Arc::new(ResultPanel::new())).clone()
    }

    /// Replace the text, as an editor would.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.boring_lines.clear();
        self.hide_boring = false;
    }

    /// Restore the original text. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        if self.text == self.original {
            return false;
        }
        self.text = self.original.clone();
        self.boring_lines = self.original_boring.clone();
        self.hide_boring = !self.boring_lines.is_empty();
        true
    }

    /// Text handed to the clipboard.
    pub fn clipboard_text(&self) -> &str {
        &self.text
    }

    pub fn boring_lines(&self) -> &[usize] {
        &self.boring_lines
    }

    pub fn has_boring_lines(&self) -> bool {
        !self.boring_lines.is_empty()
    }

    pub fn hides_boring(&self) -> bool {
        self.hide_boring
    }

    /// Flip boring-line visibility and return whether they are now hidden.
    pub fn toggle_boring(&mut self) -> bool {
        if self.has_boring_lines() {
            self.hide_boring = !self.hide_boring;
        }
        self.hide_boring
    }

    /// Text as currently shown, without hidden boring lines.
    pub fn visible_text(&self) -> String {
        if !self.hide_boring {
            return self.text.clone();
        }
        self.text
            .split_inclusive('\n')
            .enumerate()
            .filter(|(i, _)| !self.boring_lines.contains(i))
            .map(|(_, line)| line)
            .collect()
    }
}
