//! Built-in font and palette, used when a program maps the screen without
//! supplying its own font/palette data (MEM_MAP_FONT/MEM_MAP_PALETTE with
//! B=0). The reference implementation loads these from a bundled PNG at
//! startup; embedding them as constants avoids a runtime asset dependency.

/// 128 glyphs, 2 words each: each word is two 8-pixel-tall columns packed
/// MSB-first, left column in the high byte. A blank placeholder font ships
/// here; a real font image can be loaded at runtime with
/// [`crate::Lem1802::load_font_words`].
pub const DEFAULT_FONT: [u16; 256] = [0; 256];

/// 16 colors, `0000RRRRGGGGBBBB`, nibble-packed. A conventional 16-color
/// palette (CGA-style low/high intensity pairs).
pub const DEFAULT_PALETTE: [u16; 16] = [
    0x000, 0x00A, 0x0A0, 0x0AA, 0xA00, 0xA0A, 0xA50, 0xAAA, 0x555, 0x55F, 0x5F5, 0x5FF, 0xF55,
    0xF5F, 0xFF5, 0xFFF,
];
