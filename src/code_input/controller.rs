//! Segmented one-time-code input.
//!
//! # Responsibilities
//! - Keep N single-digit slots and the hidden aggregate field consistent
//! - Advance, retreat and select focus in response to keyboard events
//! - Spread pasted codes across the slots
//! - Submit the form exactly once, when every slot is filled
//!
//! # Design Decisions
//! - Headless: every page mutation goes through [`CodeInputHost`]
//! - One entry point ([`CodeInputController::handle`]); each event runs to completion
//! - Submission guarded by a one-shot latch, so re-filling after a submit is inert

use crate::code_input::layout::FormLayout;

/// Receives the page mutations the controller decides on.
pub trait CodeInputHost {
    /// Write a slot's visible value (`None` clears it).
    fn set_slot(&mut self, slot: usize, value: Option<char>);
    /// Mirror the aggregate into the hidden field.
    fn set_aggregate(&mut self, code: &str);
    /// Move keyboard focus to a slot.
    fn focus(&mut self, slot: usize);
    /// Select a slot's content so typing overwrites it.
    fn select(&mut self, slot: usize);
    /// Submit the form with the complete code.
    fn submit(&mut self, code: &str);
}

/// Keys the controller reacts to on keydown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Backspace,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Backspace" => Key::Backspace,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

/// User events delivered to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeInputEvent {
    /// The slot's value changed to `value`.
    Input { slot: usize, value: String },
    KeyDown { slot: usize, key: Key },
    /// Clipboard text pasted while `slot` had focus.
    Paste { slot: usize, text: String },
    Focus { slot: usize },
}

impl CodeInputEvent {
    fn slot(&self) -> usize {
        match self {
            CodeInputEvent::Input { slot, .. }
            | CodeInputEvent::KeyDown { slot, .. }
            | CodeInputEvent::Paste { slot, .. }
            | CodeInputEvent::Focus { slot } => *slot,
        }
    }
}

/// State of one code-entry widget.
#[derive(Debug)]
pub struct CodeInputController<H> {
    slots: Vec<Option<char>>,
    focused: usize,
    submitted: bool,
    host: H,
}

impl<H: CodeInputHost> CodeInputController<H> {
    /// Bind to a page. Returns `None`, doing nothing, when any required
    /// element is missing. Otherwise focuses the first slot.
    pub fn attach(layout: &FormLayout, host: H) -> Option<Self> {
        if !layout.is_complete() {
            tracing::debug!(?layout, "Code input elements missing, controller not attached");
            return None;
        }

        let mut controller = Self {
            slots: vec![None; layout.inputs.len()],
            focused: 0,
            submitted: false,
            host,
        };
        controller.move_focus(0);
        Some(controller)
    }

    /// Process one event.
    pub fn handle(&mut self, event: CodeInputEvent) {
        if event.slot() >= self.slots.len() {
            tracing::debug!(slot = event.slot(), slots = self.slots.len(), "Event for unknown slot ignored");
            return;
        }

        match event {
            CodeInputEvent::Input { slot, value } => self.on_input(slot, &value),
            CodeInputEvent::KeyDown { slot, key } => self.on_key_down(slot, &key),
            CodeInputEvent::Paste { text, .. } => self.on_paste(&text),
            CodeInputEvent::Focus { slot } => {
                self.focused = slot;
                self.host.select(slot);
            }
        }
    }

    fn on_input(&mut self, slot: usize, value: &str) {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(digit), None) if digit.is_ascii_digit() => {
                self.write_slot(slot, Some(digit));
                if slot + 1 < self.slots.len() {
                    self.move_focus(slot + 1);
                }
            }
            _ => self.write_slot(slot, None),
        }

        self.sync_aggregate();
        self.submit_if_complete();
    }

    fn on_key_down(&mut self, slot: usize, key: &Key) {
        match key {
            Key::Backspace if self.slots[slot].is_none() && slot > 0 => self.move_focus(slot - 1),
            Key::Backspace => {
                self.write_slot(slot, None);
                self.sync_aggregate();
            }
            Key::ArrowLeft if slot > 0 => self.move_focus(slot - 1),
            Key::ArrowRight if slot + 1 < self.slots.len() => self.move_focus(slot + 1),
            _ => {}
        }
    }

    fn on_paste(&mut self, text: &str) {
        let digits: Vec<char> = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.slots.len())
            .collect();
        if digits.is_empty() {
            return;
        }

        for slot in 0..self.slots.len() {
            self.write_slot(slot, digits.get(slot).copied());
        }
        self.sync_aggregate();

        match self.slots.iter().position(Option::is_none) {
            Some(empty) => self.move_focus(empty),
            None => {
                self.move_focus(self.slots.len() - 1);
                self.submit_if_complete();
            }
        }
    }

    fn write_slot(&mut self, slot: usize, value: Option<char>) {
        self.slots[slot] = value;
        self.host.set_slot(slot, value);
    }

    fn move_focus(&mut self, slot: usize) {
        self.focused = slot;
        self.host.focus(slot);
        self.host.select(slot);
    }

    fn sync_aggregate(&mut self) {
        let code = self.aggregate();
        self.host.set_aggregate(&code);
    }

    fn submit_if_complete(&mut self) {
        if self.submitted || !self.is_complete() {
            return;
        }
        self.submitted = true;
        let code = self.aggregate();
        tracing::debug!(slots = self.slots.len(), "Code complete, submitting form");
        self.host.submit(&code);
    }

    /// Concatenation of all slot values; empty slots contribute nothing.
    pub fn aggregate(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
