#![forbid(unsafe_code)]

//! Normalized pointer and keyboard input.

use serde::{Deserialize, Serialize};

/// Pointer button reported with press/release events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    ///
    /// Codes other than 0/1/2 (back/forward buttons) return `None`.
    #[must_use]
    pub const fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Keys the editor reacts to. Everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, PointerButton};

    #[test]
    fn dom_button_codes() {
        assert_eq!(PointerButton::from_dom(0), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_dom(1), Some(PointerButton::Middle));
        assert_eq!(PointerButton::from_dom(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_dom(3), None);
    }

    #[test]
    fn dom_keys() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("Enter"), Key::Other("Enter".to_owned()));
    }

    #[test]
    fn button_serializes_snake_case() {
        let json = serde_json::to_string(&PointerButton::Secondary).expect("serialize");
        assert_eq!(json, "\"secondary\"");
    }
}
