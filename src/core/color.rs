/// Escape sequence that ends a colored glyph.
pub const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32, // Red component (0.0 - 1.0)
    pub g: f32, // Green component (0.0 - 1.0)
    pub b: f32, // Blue component (0.0 - 1.0)
}

impl Color {
    const fn hex_char_to_u8(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0,
        }
    }

    const fn hex_pair_to_u8(high: u8, low: u8) -> u8 {
        (Self::hex_char_to_u8(high) << 4) | Self::hex_char_to_u8(low)
    }

    /// Compile-time constructor for the palette below. Expects "RRGGBB".
    const fn hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();

        let r = Self::hex_pair_to_u8(bytes[0], bytes[1]) as f32 / 255.0;
        let g = Self::hex_pair_to_u8(bytes[2], bytes[3]) as f32 / 255.0;
        let b = Self::hex_pair_to_u8(bytes[4], bytes[5]) as f32 / 255.0;

        Self { r, g, b }
    }

    pub fn to_crossterm_color(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: (self.r * 255.0).round() as u8,
            g: (self.g * 255.0).round() as u8,
            b: (self.b * 255.0).round() as u8,
        }
    }

    /// Convert the color to a terminal-compatible ANSI escape sequence.
    pub fn to_ansii_escape(&self) -> String {
        format!(
            "\x1b[38;2;{};{};{}m",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }
}

// Predefined colors
impl Color {
    pub const BLACK: Color = Color::hex("000000");
    pub const DARK_GRAY: Color = Color::hex("5C5C5C");
    pub const WHITE: Color = Color::hex("FFFFFF");
    pub const RED: Color = Color::hex("CD0000");
    pub const BRIGHT_RED: Color = Color::hex("FF5555");
    pub const BRIGHT_GREEN: Color = Color::hex("55FF55");
    pub const BRIGHT_YELLOW: Color = Color::hex("FFFF55");
    pub const BRIGHT_BLUE: Color = Color::hex("5555FF");
    pub const BRIGHT_MAGENTA: Color = Color::hex("FF55FF");
    pub const BRIGHT_CYAN: Color = Color::hex("55FFFF");
}
