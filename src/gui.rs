//! Menu widgets.
//!
//! Widgets are plain data: the presentation layer draws them and feeds pointer events back in.
//! Screens only ever react to the code name carried by [`GuiEvent::Activated`].

use glam::IVec2;
use tracing::debug;

use crate::geometry::Rect;

/// A clickable button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub code_name: String,
    pub rect: Rect,
    pub hovered: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, code_name: impl Into<String>, position: IVec2, size: IVec2) -> Self {
        Self {
            label: label.into(),
            code_name: code_name.into(),
            rect: Rect::new(position.x, position.y, size.x.max(0) as u32, size.y.max(0) as u32),
            hovered: false,
        }
    }
}

/// Static text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub at: IVec2,
}

impl Label {
    pub fn new(text: impl Into<String>, at: IVec2) -> Self {
        Self { text: text.into(), at }
    }
}

/// A modal message. While one is open, every other widget is inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub title: String,
    pub text: String,
}

impl MessageBox {
    pub fn new(text: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiEvent {
    /// A button was clicked.
    Activated(String),
    /// The open message box was closed.
    Dismissed,
}

/// The widgets of one screen.
#[derive(Debug, Clone, Default)]
pub struct GuiManager {
    buttons: Vec<Button>,
    labels: Vec<Label>,
    message: Option<MessageBox>,
}

impl GuiManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_button(&mut self, button: Button) -> &mut Self {
        self.buttons.push(button);
        self
    }

    pub fn add_label(&mut self, label: Label) -> &mut Self {
        self.labels.push(label);
        self
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn button(&self, code_name: &str) -> Option<&Button> {
        self.buttons.iter().find(|button| button.code_name == code_name)
    }

    pub fn show_message(&mut self, message: MessageBox) {
        debug!(title = %message.title, "Showing message box");
        self.message = Some(message);
    }

    pub fn message(&self) -> Option<&MessageBox> {
        self.message.as_ref()
    }

    pub fn pointer_moved(&mut self, at: IVec2) {
        let modal = self.message.is_some();
        for button in &mut self.buttons {
            button.hovered = !modal && button.rect.contains_point(at);
        }
    }

    /// Handles a click. A click anywhere closes an open message box.
    pub fn click(&mut self, at: IVec2) -> Option<GuiEvent> {
        if self.message.take().is_some() {
            return Some(GuiEvent::Dismissed);
        }
        self.buttons
            .iter()
            .find(|button| button.rect.contains_point(at))
            .map(|button| GuiEvent::Activated(button.code_name.clone()))
    }

    /// Activates a button by code name, as a keyboard shortcut would.
    pub fn activate(&mut self, code_name: &str) -> Option<GuiEvent> {
        if self.message.is_some() {
            return None;
        }
        self.button(code_name).map(|button| GuiEvent::Activated(button.code_name.clone()))
    }

    /// Closes the open message box, if any.
    pub fn dismiss(&mut self) -> Option<GuiEvent> {
        self.message.take().map(|_| GuiEvent::Dismissed)
    }
}
