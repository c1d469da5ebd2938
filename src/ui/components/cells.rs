//! Cells - the board
//!
//! Every cell is painted in its table color. Player heads get a ring, our own
//! head a thicker white one, and eliminated players are crossed out.

use super::{display_name, empty_hint};
use crate::colors::{self, COLLISION, EMPTY};
use crate::protocol::Game;
use crate::theme;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui::{self, Color32, Pos2, Rect, Stroke};

#[derive(Default)]
pub struct CellsComponent {
    hovered: Option<(i32, i32)>,
}

/// Square-celled board rect centered in `available`, and the cell size.
pub fn board_layout(available: Rect, width: i32, height: i32) -> Option<(Rect, f32)> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let cell = (available.width() / width as f32)
        .min(available.height() / height as f32)
        .floor()
        .max(1.0);
    let size = egui::vec2(cell * width as f32, cell * height as f32);
    Some((Rect::from_center_size(available.center(), size), cell))
}

/// Cell under `pos`, if any.
pub fn cell_at(board: Rect, cell: f32, pos: Pos2) -> Option<(i32, i32)> {
    if !board.contains(pos) || cell <= 0.0 {
        return None;
    }
    let x = ((pos.x - board.min.x) / cell) as i32;
    let y = ((pos.y - board.min.y) / cell) as i32;
    let cols = (board.width() / cell).round() as i32;
    let rows = (board.height() / cell).round() as i32;
    (x < cols && y < rows).then_some((x, y))
}

fn cell_rect(board: Rect, cell: f32, x: i32, y: i32) -> Rect {
    Rect::from_min_size(
        board.min + egui::vec2(x as f32 * cell, y as f32 * cell),
        egui::vec2(cell, cell),
    )
}

fn describe_cell(game: &Game, x: i32, y: i32) -> String {
    let owner = match game.cell(x, y) {
        Some(EMPTY) => "empty".to_string(),
        Some(COLLISION) => "collision".to_string(),
        Some(id) => match u8::try_from(id).ok().and_then(|id| game.players.get(&id).map(|p| (id, p))) {
            Some((id, player)) => display_name(id, player),
            None => format!("player {}", id),
        },
        None => "outside".to_string(),
    };
    format!("({}, {}) {}", x, y, owner)
}

impl CellsComponent {
    fn paint(&self, painter: &egui::Painter, board: Rect, cell: f32, game: &Game, grid_lines: bool) {
        painter.rect_filled(board, 0.0, colors::cell_color(EMPTY));

        for (y, row) in game.cells.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != EMPTY {
                    painter.rect_filled(
                        cell_rect(board, cell, x as i32, y as i32),
                        0.0,
                        colors::cell_color(value),
                    );
                }
            }
        }

        if grid_lines && cell >= 6.0 {
            let stroke = Stroke::new(1.0, Color32::from_black_alpha(24));
            for x in 1..game.width {
                let px = board.min.x + x as f32 * cell;
                painter.line_segment([Pos2::new(px, board.min.y), Pos2::new(px, board.max.y)], stroke);
            }
            for y in 1..game.height {
                let py = board.min.y + y as f32 * cell;
                painter.line_segment([Pos2::new(board.min.x, py), Pos2::new(board.max.x, py)], stroke);
            }
        }

        for (&id, player) in &game.players {
            let rect = cell_rect(board, cell, player.x, player.y);
            if !board.intersects(rect) {
                continue;
            }
            let center = rect.center();
            let radius = (cell * 0.9).max(3.0);
            if id == game.you {
                painter.circle_stroke(center, radius, Stroke::new(theme::STROKE_THICK * 1.5, Color32::WHITE));
            }
            painter.circle_stroke(
                center,
                radius * 0.7,
                Stroke::new(theme::STROKE_THICK, colors::player_color(id)),
            );

            if cell >= 14.0 {
                painter.text(
                    center,
                    egui::Align2::CENTER_CENTER,
                    id.to_string(),
                    egui::FontId::monospace(cell * 0.6),
                    colors::contrast_text(colors::player_color(id)),
                );
            }

            if !player.active {
                let d = radius * 0.6;
                let stroke = Stroke::new(theme::STROKE_THICK, Color32::BLACK);
                painter.line_segment([center + egui::vec2(-d, -d), center + egui::vec2(d, d)], stroke);
                painter.line_segment([center + egui::vec2(-d, d), center + egui::vec2(d, -d)], stroke);
            }
        }

        painter.rect_stroke(
            board,
            0.0,
            Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
            egui::StrokeKind::Outside,
        );
    }
}

impl Component for CellsComponent {
    fn name(&self) -> &'static str {
        "Cells"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let Some(game) = view.game else {
            ui.centered_and_justified(|ui| empty_hint(ui, "Waiting for a game"));
            return;
        };

        let (available, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let Some((board, cell)) = board_layout(available, game.width, game.height) else {
            return;
        };

        self.paint(ui.painter(), board, cell, game, view.grid_lines);

        self.hovered = response.hover_pos().and_then(|pos| cell_at(board, cell, pos));
        if let Some((x, y)) = self.hovered {
            ui.painter().rect_stroke(
                cell_rect(board, cell, x, y),
                0.0,
                Stroke::new(theme::STROKE_THICK, theme::ACCENT),
                egui::StrokeKind::Outside,
            );
            response.on_hover_text_at_pointer(describe_cell(game, x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tests::sample;

    #[test]
    fn board_is_centered_with_square_cells() {
        let available = Rect::from_min_size(Pos2::ZERO, egui::vec2(200.0, 100.0));
        let (board, cell) = board_layout(available, 5, 4).unwrap();
        assert_eq!(cell, 25.0);
        assert_eq!(board.width(), 125.0);
        assert_eq!(board.height(), 100.0);
        assert_eq!(board.center(), available.center());

        assert!(board_layout(available, 0, 4).is_none());
    }

    #[test]
    fn pointer_maps_to_cells() {
        let board = Rect::from_min_size(Pos2::new(10.0, 10.0), egui::vec2(50.0, 40.0));
        assert_eq!(cell_at(board, 10.0, Pos2::new(10.0, 10.0)), Some((0, 0)));
        assert_eq!(cell_at(board, 10.0, Pos2::new(35.0, 29.0)), Some((2, 1)));
        assert_eq!(cell_at(board, 10.0, Pos2::new(59.9, 49.9)), Some((4, 3)));
        assert_eq!(cell_at(board, 10.0, Pos2::new(5.0, 20.0)), None);
    }

    #[test]
    fn hover_text_names_the_owner() {
        let game = sample();
        assert_eq!(describe_cell(&game, 0, 0), "(0, 0) empty");
        assert_eq!(describe_cell(&game, 3, 2), "(3, 2) collision");
        assert_eq!(describe_cell(&game, 4, 1), "(4, 1) Bob");
        assert_eq!(describe_cell(&game, 9, 9), "(9, 9) outside");
    }
}
