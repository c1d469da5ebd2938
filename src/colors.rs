//! Cell and player colors
//!
//! Every cell on the board holds a small signed state: `-1` marks a collision,
//! `0` an empty cell and `1..=6` the trail of the player with that id. Player
//! swatches use the same table so a player's list entry matches its trail.

use egui::Color32;

/// Cell state of a collision between trails.
pub const COLLISION: i8 = -1;
/// Cell state of an empty cell.
pub const EMPTY: i8 = 0;

/// Cell/player id -> display color.
pub const CELL_COLORS: [(i8, &str); 8] = [
    (COLLISION, "#000000"),
    (EMPTY, "#efeff6"),
    (1, "#f52e2e"),
    (2, "#5463ff"),
    (3, "#ffc717"),
    (4, "#1f9e40"),
    (5, "#ff6619"),
    (6, "#24d4c4"),
];

/// Hex color for a cell state, `None` for ids outside the table.
pub fn cell_color_hex(id: i8) -> Option<&'static str> {
    CELL_COLORS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, hex)| *hex)
}

/// Display color for a cell state. Ids the table does not know are drawn like
/// a collision.
pub fn cell_color(id: i8) -> Color32 {
    cell_color_hex(id)
        .and_then(parse_hex)
        .unwrap_or(Color32::BLACK)
}

/// Color for a player id as sent by the server (1..=6).
pub fn player_color(player_id: u8) -> Color32 {
    i8::try_from(player_id).map(cell_color).unwrap_or(Color32::BLACK)
}

/// Parse a `#rrggbb` string.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Black or white, whichever reads better on top of `bg`.
pub fn contrast_text(bg: Color32) -> Color32 {
    let luma = 0.299 * bg.r() as f32 + 0.587 * bg.g() as f32 + 0.114 * bg.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn every_value_is_a_hex_color() {
        for (key, hex) in CELL_COLORS {
            assert_eq!(hex.len(), 7, "key {key}");
            assert!(hex.starts_with('#'), "key {key}");
            assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit()), "key {key}");
        }
    }

    #[test]
    fn table_has_exactly_the_known_states() {
        let keys: BTreeSet<i8> = CELL_COLORS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (-1..=6).collect::<BTreeSet<i8>>());
        assert_eq!(keys.len(), CELL_COLORS.len());
    }

    #[test]
    fn sentinels() {
        assert_eq!(cell_color_hex(COLLISION), Some("#000000"));
        assert_eq!(cell_color_hex(EMPTY), Some("#efeff6"));
        assert_eq!(cell_color(EMPTY), Color32::from_rgb(0xef, 0xef, 0xf6));
    }

    #[test]
    fn unknown_ids_fall_back_to_collision_color() {
        assert_eq!(cell_color_hex(7), None);
        assert_eq!(cell_color(42), Color32::BLACK);
        assert_eq!(player_color(200), Color32::BLACK);
    }

    #[test]
    fn player_colors_follow_the_table() {
        assert_eq!(player_color(1), Color32::from_rgb(0xf5, 0x2e, 0x2e));
        assert_eq!(player_color(6), Color32::from_rgb(0x24, 0xd4, 0xc4));
    }

    #[test]
    fn parse_hex_rejects_malformed() {
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("123456"), None);
        assert_eq!(parse_hex("#12345g"), None);
        assert_eq!(parse_hex("#ffffff"), Some(Color32::WHITE));
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(contrast_text(cell_color(EMPTY)), Color32::BLACK);
        assert_eq!(contrast_text(cell_color(COLLISION)), Color32::WHITE);
    }
}
