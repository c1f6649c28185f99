use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

use crate::view::ScopeId;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3; // Cmd on Mac, Win key on Windows
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F12
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            is_repeat: false,
        }
    }
}

/// Event names a host source can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Change,
    Focus,
    Blur,
    Input,
    KeyDown,
    Click,
    Submit,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
            EventKind::KeyDown => "keydown",
            EventKind::Click => "click",
            EventKind::Submit => "submit",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    None,
    Text(String),
    Checked(bool),
    Number(f64),
    Key(KeyEvent),
}

/// A UI event as delivered by the host, addressed to the scope of the
/// subtree it happened in (`None` for the form root).
#[derive(Clone, Debug)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: Option<ScopeId>,
    pub payload: EventPayload,
    default_prevented: Rc<Cell<bool>>,
}

impl DomEvent {
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        Self {
            kind,
            target: None,
            payload,
            default_prevented: Rc::new(Cell::new(false)),
        }
    }

    pub fn key_down(key: KeyEvent) -> Self {
        Self::new(EventKind::KeyDown, EventPayload::Key(key))
    }

    pub fn submit() -> Self {
        Self::new(EventKind::Submit, EventPayload::None)
    }

    pub fn at(mut self, scope: impl Into<ScopeId>) -> Self {
        self.target = Some(scope.into());
        self
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.payload {
            EventPayload::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Shared across clones: the host sees it on the event it dispatched.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseKeyChordError {
    #[error("empty keybinding")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// A key plus the modifiers that must be held, e.g. `Ctrl+Enter`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Modifiers outside the chord are ignored; the chord's own must all be held.
    pub fn matches(&self, ev: &KeyEvent) -> bool {
        ev.key == self.key && ev.modifiers.contains(self.modifiers)
    }
}

impl FromStr for KeyChord {
    type Err = ParseKeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key_name = match parts.pop() {
            Some(k) if !k.is_empty() => k,
            _ => return Err(ParseKeyChordError::Empty),
        };

        let mut modifiers = Modifiers::empty();
        for m in parts {
            modifiers |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "meta" | "cmd" | "super" => Modifiers::META,
                "alt" | "option" => Modifiers::ALT,
                "shift" => Modifiers::SHIFT,
                _ => return Err(ParseKeyChordError::UnknownModifier(m.to_string())),
            };
        }

        Ok(KeyChord::new(parse_key(key_name)?, modifiers))
    }
}

fn parse_key(name: &str) -> Result<Key, ParseKeyChordError> {
    // `+` separates the parts, so it is spelled out
    if name.eq_ignore_ascii_case("plus") {
        return Ok(Key::Character('+'));
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Key::Character(c.to_ascii_lowercase()));
    }
    let key = match name.to_ascii_lowercase().as_str() {
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "escape" | "esc" => Key::Escape,
        "left" | "arrowleft" => Key::ArrowLeft,
        "right" | "arrowright" => Key::ArrowRight,
        "up" | "arrowup" => Key::ArrowUp,
        "down" | "arrowdown" => Key::ArrowDown,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "space" => Key::Space,
        other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n @ 1..=12) => Key::F(n),
            _ => return Err(ParseKeyChordError::UnknownKey(name.to_string())),
        },
    };
    Ok(key)
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::META, "Meta"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match &self.key {
            Key::Character('+') => f.write_str("Plus"),
            Key::Character(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}
