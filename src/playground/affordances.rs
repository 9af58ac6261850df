//! Buttons a renderer attaches to a code block.

use crate::playground::block::CodeBlock;

/// An interactive control next to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    UndoChanges,
    CopyToClipboard,
    Run,
    /// Show/hide boring lines; `hidden` is the current visibility.
    ToggleBoringLines { hidden: bool },
}

impl Affordance {
    /// Tooltip and accessible label.
    pub fn title(&self) -> &'static str {
        match self {
            Affordance::UndoChanges => "Undo changes",
            Affordance::CopyToClipboard => "Copy to clipboard",
            Affordance::Run => "Run this code",
            Affordance::ToggleBoringLines { hidden: true } => "Show hidden lines",
            Affordance::ToggleBoringLines { hidden: false } => "Hide lines",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Affordance::UndoChanges => "fa fa-history reset-button",
            Affordance::CopyToClipboard => "clip-button",
            Affordance::Run => "fa fa-play play-button",
            Affordance::ToggleBoringLines { hidden: true } => "fa fa-eye",
            Affordance::ToggleBoringLines { hidden: false } => "fa fa-eye-slash",
        }
    }
}

/// Page-wide switches that decide which buttons exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageOptions {
    /// Copy buttons are enabled.
    pub copyable: bool,
    /// An editor widget is present, so editable blocks can be reset.
    pub editor_available: bool,
}

/// Buttons for `block`, in display order.
pub fn affordances(block: &CodeBlock, options: PageOptions) -> Vec<Affordance> {
    let mut buttons = Vec::with_capacity(4);

    if block.is_playground() && block.is_editable() && options.editor_available {
        buttons.push(Affordance::UndoChanges);
    }
    if options.copyable {
        buttons.push(Affordance::CopyToClipboard);
    }
    if block.is_playground() {
        buttons.push(Affordance::Run);
    }
    if block.has_boring_lines() {
        buttons.push(Affordance::ToggleBoringLines {
            hidden: block.hides_boring(),
        });
    }

    buttons
}
