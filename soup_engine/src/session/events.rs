//! Host input events and their classification

use serde::{Deserialize, Serialize};

/// Which modifier acts as the platform's command key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Meta (Cmd) is the command modifier
    Mac,
    /// Ctrl is the command modifier
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A modifier pressed on its own (Shift, Control, Alt, Meta)
    Modifier,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
        }
    }

    pub fn character(ch: char) -> Self {
        Self::new(Key::Character(ch))
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    fn command(&self, platform: Platform) -> bool {
        match platform {
            Platform::Mac => self.meta,
            Platform::Other => self.ctrl,
        }
    }

    pub fn classify(&self, platform: Platform) -> EventCategory {
        match &self.key {
            Key::Character('z' | 'Z') if self.command(platform) => EventCategory::UndoOrRedo,
            Key::Tab => EventCategory::Tab,
            Key::Enter => EventCategory::Enter,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                EventCategory::Arrows
            }
            Key::Modifier => EventCategory::Ignored,
            _ => EventCategory::General,
        }
    }
}

/// Decides which history transition an event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    UndoOrRedo,
    Tab,
    Enter,
    Arrows,
    General,
    Ignored,
}
