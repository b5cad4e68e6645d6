//! Host-level keyboard input.

use crate::event::{kinds, RemotePayload};
use serde::{Deserialize, Serialize};

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A key event observed by the host before it reaches the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyInput {
    pub action: KeyAction,
    /// Logical key, e.g. `"a"` or `"Enter"`.
    pub key: String,
    /// Physical key code, e.g. `"KeyA"`.
    pub code: String,
    pub modifiers: KeyModifiers,
}

impl RawKeyInput {
    /// A key-down event.
    pub fn down(key: impl Into<String>, code: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self {
            action: KeyAction::Down,
            key: key.into(),
            code: code.into(),
            modifiers,
        }
    }

    /// The `keydown` payload for this event; key-up events are not recorded.
    pub fn to_payload(&self) -> Option<RemotePayload> {
        if self.action != KeyAction::Down {
            return None;
        }
        Some(
            RemotePayload::new(kinds::KEYDOWN)
                .with("key", self.key.clone())
                .with("code", self.code.clone())
                .with("ctrl", self.modifiers.ctrl)
                .with("shift", self.modifiers.shift)
                .with("alt", self.modifiers.alt)
                .with("meta", self.modifiers.meta),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keydown_payload_carries_every_modifier() {
        let input = RawKeyInput::down(
            "s",
            "KeyS",
            KeyModifiers {
                ctrl: true,
                meta: true,
                ..Default::default()
            },
        );
        let payload = input.to_payload().unwrap();

        assert_eq!(payload.kind, "keydown");
        assert_eq!(payload.field("key"), Some(&json!("s")));
        assert_eq!(payload.field("code"), Some(&json!("KeyS")));
        assert_eq!(payload.field("ctrl"), Some(&json!(true)));
        assert_eq!(payload.field("shift"), Some(&json!(false)));
        assert_eq!(payload.field("alt"), Some(&json!(false)));
        assert_eq!(payload.field("meta"), Some(&json!(true)));
    }

    #[test]
    fn test_key_up_is_not_recorded() {
        let mut input = RawKeyInput::down("a", "KeyA", KeyModifiers::default());
        input.action = KeyAction::Up;
        assert!(input.to_payload().is_none());
    }
}
