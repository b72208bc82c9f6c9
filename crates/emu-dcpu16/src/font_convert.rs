//! Converts a 128x32 font sprite sheet (32 columns x 4 rows of 4x8 glyphs,
//! 128 glyphs total) into a `DAT` block ready to `#include` ahead of a
//! `MEM_MAP_FONT` call.

use std::io::Write;
use std::path::Path;

use crate::cli::CliError;

const GRID_COLUMNS: usize = 32;
const GRID_ROWS: usize = 4;
const GLYPH_WIDTH: usize = 4;
const GLYPH_HEIGHT: usize = 8;

pub fn convert(image_path: &Path, out_path: &Path) -> Result<(), CliError> {
    let file = std::fs::File::open(image_path).map_err(|e| CliError::Io(e.to_string()))?;
    let decoder = png::Decoder::new(file);
    let mut reader = decoder
        .read_info()
        .map_err(|e| CliError::Image(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| CliError::Image(e.to_string()))?;
    let channels = info.color_type.samples();
    let width = info.width as usize;
    let height = info.height as usize;
    if width < GRID_COLUMNS * GLYPH_WIDTH || height < GRID_ROWS * GLYPH_HEIGHT {
        return Err(CliError::Image(format!(
            "font sheet must be at least {}x{}, got {width}x{height}",
            GRID_COLUMNS * GLYPH_WIDTH,
            GRID_ROWS * GLYPH_HEIGHT
        )));
    }

    let sample = |x: usize, y: usize| -> bool {
        let idx = (y * width + x) * channels;
        let r = buf.get(idx).copied().unwrap_or(0);
        let g = buf.get(idx + 1).copied().unwrap_or(r);
        let b = buf.get(idx + 2).copied().unwrap_or(r);
        let luminance = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
        luminance > 127
    };

    let mut words = Vec::with_capacity(GRID_COLUMNS * GRID_ROWS * 2);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLUMNS {
            let base_x = col * GLYPH_WIDTH;
            let base_y = row * GLYPH_HEIGHT;
            let mut columns = [0u8; GLYPH_WIDTH];
            for (gx, column_byte) in columns.iter_mut().enumerate() {
                let mut byte = 0u8;
                for gy in 0..GLYPH_HEIGHT {
                    let x = base_x + gx;
                    let y = base_y + gy;
                    if x < width && y < height && sample(x, y) {
                        byte |= 1 << (7 - gy);
                    }
                }
                *column_byte = byte;
            }
            let word0 = (u16::from(columns[0]) << 8) | u16::from(columns[1]);
            let word1 = (u16::from(columns[2]) << 8) | u16::from(columns[3]);
            words.push(word0);
            words.push(word1);
        }
    }

    let mut out = std::fs::File::create(out_path).map_err(|e| CliError::Io(e.to_string()))?;
    writeln!(out, ":font").map_err(|e| CliError::Io(e.to_string()))?;
    for chunk in words.chunks(8) {
        let items: Vec<String> = chunk.iter().map(|w| format!("0x{w:04x}")).collect();
        writeln!(out, "DAT {}", items.join(", ")).map_err(|e| CliError::Io(e.to_string()))?;
    }
    Ok(())
}
