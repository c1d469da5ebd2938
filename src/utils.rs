//! Utility functions

use crate::colors::cell_color;
use crate::constants::{APP_NAME, MAX_SNAPSHOT_SIDE};
use crate::error::{ClientError, Result};
use crate::protocol::Game;
use std::path::{Path, PathBuf};

// Square window/taskbar icon: a few trails on the board background
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="10" fill="#efeff6"/><path d="M12 52V12h20v12" fill="none" stroke="#f52e2e" stroke-width="8" stroke-linejoin="round"/><path d="M52 12v40H32V40" fill="none" stroke="#5463ff" stroke-width="8" stroke-linejoin="round"/><rect x="28" y="28" width="8" height="8" fill="#000000"/></svg>"##;

/// Rasterize the icon SVG to a square RGBA image (for window/taskbar icons).
pub fn rasterize_icon(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// App data directory (settings, history database, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Render the board with `scale` pixels per cell.
pub fn render_board(game: &Game, scale: u32) -> Result<image::RgbImage> {
    let scale = scale.max(1);
    let side = |cells: i32| {
        u32::try_from(cells.max(0))
            .ok()
            .and_then(|c| c.checked_mul(scale))
            .filter(|px| *px <= MAX_SNAPSHOT_SIDE)
    };
    let (Some(width), Some(height)) = (side(game.width), side(game.height)) else {
        return Err(ClientError::BoardTooLarge {
            width: game.width,
            height: game.height,
        });
    };

    Ok(image::RgbImage::from_fn(width, height, |px, py| {
        let cell = game
            .cell((px / scale) as i32, (py / scale) as i32)
            .unwrap_or(0);
        let c = cell_color(cell);
        image::Rgb([c.r(), c.g(), c.b()])
    }))
}

/// Save a PNG snapshot of the board.
pub fn save_board_png(game: &Game, scale: u32, path: &Path) -> Result<()> {
    render_board(game, scale)?.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Format a duration as `m:ss.t` (or `s.t s` below a minute)
pub fn format_duration(d: chrono::Duration) -> String {
    let ms = d.num_milliseconds().max(0);
    let secs = ms / 1000;
    let tenths = (ms % 1000) / 100;
    if secs >= 60 {
        format!("{}:{:02}.{}", secs / 60, secs % 60, tenths)
    } else {
        format!("{}.{} s", secs, tenths)
    }
}

/// Signed millisecond offset like `+120 ms`
pub fn format_offset(ms: i64) -> String {
    format!("{:+} ms", ms)
}
