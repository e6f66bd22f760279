//! Tint colors parsed from bundle documents

use image::Rgba;

/// A fill color for tile tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint(pub Rgba<u8>);

impl Tint {
    pub const WHITE: Tint = Tint(Rgba([255, 255, 255, 255]));

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Tint(Rgba([r, g, b, 255]))
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Tint(Rgba([r, g, b, a]))
    }

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a named color.
    ///
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<Tint> {
        let text = text.trim();
        match text.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => named(&text.to_ascii_lowercase()),
        }
    }

    pub fn rgba_array(&self) -> [u8; 4] {
        self.0 .0
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

fn parse_hex(hex: &str) -> Option<Tint> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Tint::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Tint::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Tint::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

/// CSS basic and common extended color keywords
fn named(name: &str) -> Option<Tint> {
    let tint = match name {
        "black" => Tint::rgb(0, 0, 0),
        "white" => Tint::rgb(255, 255, 255),
        "red" => Tint::rgb(255, 0, 0),
        "lime" => Tint::rgb(0, 255, 0),
        "green" => Tint::rgb(0, 128, 0),
        "blue" => Tint::rgb(0, 0, 255),
        "yellow" => Tint::rgb(255, 255, 0),
        "cyan" | "aqua" => Tint::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Tint::rgb(255, 0, 255),
        "silver" => Tint::rgb(192, 192, 192),
        "gray" | "grey" => Tint::rgb(128, 128, 128),
        "darkgray" | "darkgrey" => Tint::rgb(169, 169, 169),
        "lightgray" | "lightgrey" => Tint::rgb(211, 211, 211),
        "maroon" => Tint::rgb(128, 0, 0),
        "olive" => Tint::rgb(128, 128, 0),
        "purple" => Tint::rgb(128, 0, 128),
        "teal" => Tint::rgb(0, 128, 128),
        "navy" => Tint::rgb(0, 0, 128),
        "orange" => Tint::rgb(255, 165, 0),
        "gold" => Tint::rgb(255, 215, 0),
        "brown" => Tint::rgb(165, 42, 42),
        "crimson" => Tint::rgb(220, 20, 60),
        "pink" => Tint::rgb(255, 192, 203),
        "violet" => Tint::rgb(238, 130, 238),
        "indigo" => Tint::rgb(75, 0, 130),
        "turquoise" => Tint::rgb(64, 224, 208),
        "tan" => Tint::rgb(210, 180, 140),
        "beige" => Tint::rgb(245, 245, 220),
        "ivory" => Tint::rgb(255, 255, 240),
        "khaki" => Tint::rgb(240, 230, 140),
        "coral" => Tint::rgb(255, 127, 80),
        "salmon" => Tint::rgb(250, 128, 114),
        "chocolate" => Tint::rgb(210, 105, 30),
        "sienna" => Tint::rgb(160, 82, 45),
        "darkred" => Tint::rgb(139, 0, 0),
        "darkgreen" => Tint::rgb(0, 100, 0),
        "darkblue" => Tint::rgb(0, 0, 139),
        "skyblue" => Tint::rgb(135, 206, 235),
        "slategray" | "slategrey" => Tint::rgb(112, 128, 144),
        "forestgreen" => Tint::rgb(34, 139, 34),
        "firebrick" => Tint::rgb(178, 34, 34),
        "transparent" => Tint::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(tint)
}
