use thiserror::Error;

pub(crate) const ESC: u8 = 0x1b;
pub(crate) const CSI_INTRODUCER: u8 = b'[';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Tab,
    Backspace,
    LineStart,
    LineEnd,
    KillLine,
    EndOfInput,
}

impl ControlKey {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x09 => Some(ControlKey::Tab),
            0x7f => Some(ControlKey::Backspace),
            0x01 => Some(ControlKey::LineStart),
            0x05 => Some(ControlKey::LineEnd),
            0x15 => Some(ControlKey::KillLine),
            0x04 => Some(ControlKey::EndOfInput),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            ControlKey::Tab => 0x09,
            ControlKey::Backspace => 0x7f,
            ControlKey::LineStart => 0x01,
            ControlKey::LineEnd => 0x05,
            ControlKey::KillLine => 0x15,
            ControlKey::EndOfInput => 0x04,
        }
    }

    /// Keys that end the session instead of being forwarded.
    pub fn ends_session(self) -> bool {
        self == ControlKey::EndOfInput
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKey {
    /// ESC not followed by `[`.
    Bare,
    Up,
    Down,
    Right,
    Left,
    Delete,
}

impl EscapeKey {
    pub fn bytes(self) -> &'static [u8] {
        match self {
            EscapeKey::Bare => &[ESC],
            EscapeKey::Up => b"\x1b[A",
            EscapeKey::Down => b"\x1b[B",
            EscapeKey::Right => b"\x1b[C",
            EscapeKey::Left => b"\x1b[D",
            EscapeKey::Delete => b"\x1b[3~",
        }
    }

    pub fn is_recall(self) -> bool {
        matches!(self, EscapeKey::Up | EscapeKey::Down)
    }
}

/// Multi-byte sequences recognised after `ESC [`.
pub(crate) const KNOWN_SEQUENCES: &[EscapeKey] = &[
    EscapeKey::Up,
    EscapeKey::Down,
    EscapeKey::Right,
    EscapeKey::Left,
    EscapeKey::Delete,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Char(u8),
    /// CR or LF.
    LineEnd(u8),
    Control(ControlKey),
    Escape(EscapeKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Token { token: Token, len: usize },
    /// The buffered bytes are a prefix of a longer sequence.
    NeedMore,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unrecognized escape sequence {}", format_bytes(.0))]
    UnknownEscape(Vec<u8>),
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:#04x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Bytes for the user's terminal.
    Display(Vec<u8>),
    /// Bytes for the controller's input.
    Forward(Vec<u8>),
    /// Print the command reference.
    Help,
    End(EndReason),
}
