//! Input types handed to element callbacks by the input dispatch layer

/// Mouse button reported with click events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl From<u8> for MouseButton {
    fn from(button: u8) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Right,
            2 => MouseButton::Middle,
            other => MouseButton::Other(other),
        }
    }
}
