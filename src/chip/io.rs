use ux::u4;

use crate::chip::{Error, FrameBuffer};

/// Physical keys on the left-hand side of a qwerty keyboard, laid out like the hexadecimal
/// keypad they stand in for:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  =>  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
pub const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Maps a physical key to its logical key, if it has one. Upper case keys map like their
/// lower case counterparts.
pub fn keymap(key: char) -> Option<u4> {
    let key = key.to_ascii_lowercase();
    CONVENTIONAL_KEYMAP
        .iter()
        .find(|(physical, _)| *physical == key)
        .map(|(_, logical)| u4::new(*logical))
}

/// Produces key presses for an interpreter.
pub trait InputSource {
    /// The currently pressed logical key, or `None`.
    fn pressed_key(&mut self) -> Option<u4>;
}

/// Consumes what an interpreter displays and plays.
pub trait OutputSink {
    /// Presents the current framebuffer. Called once per tick.
    fn refresh(&mut self, frame: &FrameBuffer) -> Result<(), Error>;

    fn start_tone(&mut self) -> Result<(), Error>;

    fn stop_tone(&mut self) -> Result<(), Error>;
}

/// The state of the 16 key keypad, fed by whatever the host receives key events from.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    held: [bool; 16],
    last_pressed: Option<u4>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    pub fn press(&mut self, key: u4) {
        self.held[usize::from(u8::from(key))] = true;
        self.last_pressed = Some(key);
    }

    pub fn release(&mut self, key: u4) {
        self.held[usize::from(u8::from(key))] = false;
    }

    /// Terminals report no key releases, so hosts built on them clear the whole keypad.
    pub fn release_all(&mut self) {
        self.held = [false; 16];
        self.last_pressed = None;
    }

    pub fn is_held(&self, key: u4) -> bool {
        self.held[usize::from(u8::from(key))]
    }
}

impl InputSource for Keypad {
    /// The most recently pressed key while it is held, otherwise the lowest held key.
    fn pressed_key(&mut self) -> Option<u4> {
        match self.last_pressed {
            Some(key) if self.is_held(key) => Some(key),
            _ => (0..16u8).map(u4::new).find(|key| self.is_held(*key)),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl OutputSink for NullOutput {
    fn refresh(&mut self, _frame: &FrameBuffer) -> Result<(), Error> {
        Ok(())
    }

    fn start_tone(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
