//! Kitty Graphics Protocol preview
//!
//! Shows a composed view inline in supporting terminals.
//! Supported by: Ghostty, Kitty, WezTerm, iTerm2
//!
//! Protocol documentation: https://sw.kovidgoyal.net/kitty/graphics-protocol/

use std::env;
use std::io::{self, Cursor, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageEncoder, RgbaImage};

/// Maximum payload bytes per escape sequence
const CHUNK_SIZE: usize = 4096;

/// One-shot image display over the Kitty protocol
pub struct KittyGraphics {
    /// Cell size in pixels (width, height) - defaults to 8x16
    cell_size: (u16, u16),
    /// Whether to suppress terminal responses
    quiet: bool,
}

impl KittyGraphics {
    pub fn new() -> Self {
        Self {
            cell_size: (8, 16), // Common default
            quiet: true,
        }
    }

    /// Transmit and display `image` at the cursor, sized in terminal cells
    pub fn display<W: Write>(&self, out: &mut W, image: &RgbaImage) -> io::Result<()> {
        let (cols, rows) = self.image_to_cells(image.width(), image.height());
        let png = encode_png(image)?;
        for sequence in self.transmit_sequences(&png, cols, rows) {
            out.write_all(sequence.as_bytes())?;
        }
        writeln!(out)?;
        out.flush()
    }

    /// Escape sequences for a transmit-and-display of PNG bytes.
    ///
    /// a=T (transmit and display), t=d (direct), f=100 (PNG), m=1 on all but
    /// the last chunk.
    pub fn transmit_sequences(&self, png: &[u8], cols: u16, rows: u16) -> Vec<String> {
        let encoded = BASE64.encode(png);
        let chunks: Vec<&[u8]> = encoded.as_bytes().chunks(CHUNK_SIZE).collect();
        let last = chunks.len().saturating_sub(1);

        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let more = if i == last { 0 } else { 1 };
                // Base64 output is ASCII, so every chunk is valid UTF-8
                let payload = String::from_utf8_lossy(chunk);
                if i == 0 {
                    format!(
                        "\x1b_Ga=T,t=d,f=100,c={},r={},q={},m={};{}\x1b\\",
                        cols,
                        rows,
                        if self.quiet { 2 } else { 0 },
                        more,
                        payload
                    )
                } else {
                    format!("\x1b_Gm={};{}\x1b\\", more, payload)
                }
            })
            .collect()
    }

    /// How many cells an image should occupy
    pub fn image_to_cells(&self, width: u32, height: u32) -> (u16, u16) {
        let cols = width.div_ceil(self.cell_size.0 as u32);
        let rows = height.div_ceil(self.cell_size.1 as u32);
        (
            cols.clamp(1, u16::MAX as u32) as u16,
            rows.clamp(1, u16::MAX as u32) as u16,
        )
    }
}

impl Default for KittyGraphics {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the current terminal likely understands the Kitty protocol
pub fn is_kitty_supported() -> bool {
    if let Ok(term) = env::var("TERM") {
        let term_lower = term.to_lowercase();
        if term_lower.contains("kitty") || term_lower.contains("ghostty") {
            return true;
        }
    }

    if let Ok(term_prog) = env::var("TERM_PROGRAM") {
        let prog_lower = term_prog.to_lowercase();
        if prog_lower.contains("kitty")
            || prog_lower.contains("ghostty")
            || prog_lower.contains("wezterm")
            || prog_lower.contains("iterm")
        {
            return true;
        }
    }

    env::var("KITTY_WINDOW_ID").is_ok()
        || env::var("GHOSTTY_RESOURCES_DIR").is_ok()
        || env::var("WEZTERM_PANE").is_ok()
}

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut buffer));

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(io::Error::other)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_calculation() {
        let kitty = KittyGraphics::new();

        // 16x16 sprite with 8x16 cells = 2x1 cells
        assert_eq!(kitty.image_to_cells(16, 16), (2, 1));
        assert_eq!(kitty.image_to_cells(33, 17), (5, 2));
        assert_eq!(kitty.image_to_cells(0, 0), (1, 1));
    }

    #[test]
    fn test_chunking() {
        let kitty = KittyGraphics::new();
        // 6000 bytes -> 8000 base64 chars -> two chunks
        let seqs = kitty.transmit_sequences(&[7u8; 6000], 4, 2);

        assert_eq!(seqs.len(), 2);
        assert!(seqs[0].starts_with("\x1b_Ga=T,t=d,f=100,c=4,r=2,q=2,m=1;"));
        assert!(seqs[1].starts_with("\x1b_Gm=0;"));
    }

    #[test]
    fn test_display_writes_png() {
        let kitty = KittyGraphics::new();
        let mut out = Vec::new();
        kitty.display(&mut out, &RgbaImage::new(8, 8)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b_Ga=T"));
        assert!(text.contains("m=0;"));
    }
}
