//! Input events delivered to apps

/// An input event, published on [`Gui::input_pubsub`](crate::Gui::input_pubsub)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Finger down or moved
    Pressed { x: u16, y: u16 },
    /// Finger lifted
    Released { x: u16, y: u16 },
    /// Character from a keyboard
    Key(char),
    /// Hardware back button
    Back,
}
