use std::fmt;

use crate::menu::engine::Engine;

/// Handler bound to an action item. Receives the running engine so it can
/// open nested menus synchronously; returning `Some` overrides the raw
/// index in the session result.
pub type Callback = Box<dyn FnMut(&mut Engine) -> Option<String>>;

pub enum ItemKind {
    /// Pure value, no behavior. The payload stays readable through the
    /// caller's `MenuState` after the session ends.
    Data { value: Option<String> },
    /// Label plus a callback invoked on commit.
    Action { callback: Callback },
}

pub struct MenuItem {
    pub label: String,
    pub description: String,
    pub enabled: bool,
    pub kind: ItemKind,
}

impl MenuItem {
    pub fn data(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            enabled: true,
            kind: ItemKind::Data { value: None },
        }
    }

    pub fn action(
        label: impl Into<String>,
        description: impl Into<String>,
        callback: impl FnMut(&mut Engine) -> Option<String> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            enabled: true,
            kind: ItemKind::Action {
                callback: Box::new(callback),
            },
        }
    }

    /// Attach a value payload. Only meaningful on data items; a no-op on
    /// action items.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        if let ItemKind::Data { value: slot } = &mut self.kind {
            *slot = Some(value.into());
        }
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Data { value } => value.as_deref(),
            ItemKind::Action { .. } => None,
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ItemKind::Data { value } => format!("Data({value:?})"),
            ItemKind::Action { .. } => "Action(..)".to_string(),
        };
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("kind", &kind)
            .finish()
    }
}
