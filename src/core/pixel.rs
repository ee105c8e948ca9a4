use std::fmt::{self, Display, Formatter};

use crate::core::color::{Color, RESET};

/// Glyph of an untouched cell.
pub const BLANK: char = ' ';

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel {
    pub ch: char,
    pub color: Option<Color>, // foreground color, terminal default when None
}

impl Default for Pixel {
    fn default() -> Self {
        Pixel {
            ch: BLANK,
            color: None,
        }
    }
}

impl Pixel {
    pub fn new(ch: char, color: Option<Color>) -> Self {
        Pixel { ch, color }
    }

    /// Stamp a glyph, keeping the current color when none is given.
    pub fn set(&mut self, ch: char, color: Option<Color>) {
        self.ch = ch;
        if color.is_some() {
            self.color = color;
        }
    }

    pub fn reset(&mut self) {
        self.ch = BLANK;
        self.color = None;
    }

    pub fn is_blank(&self) -> bool {
        self.ch == BLANK && self.color.is_none()
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{}{}{}", color.to_ansii_escape(), self.ch, RESET),
            None => write!(f, "{}", self.ch),
        }
    }
}
