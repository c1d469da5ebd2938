//! State - phase of the game and board summary

use super::empty_hint;
use crate::protocol::Game;
use crate::theme;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;

pub struct StateComponent;

/// Headline for the game phase and its color
pub fn phase(game: &Game) -> (String, egui::Color32) {
    if game.running {
        return ("Running".into(), theme::STATUS_SUCCESS);
    }
    match game.winner() {
        Some(w) if w == game.you => ("You won!".into(), theme::STATUS_SUCCESS),
        Some(w) => (format!("Player {} won", w), theme::STATUS_WARNING),
        None => ("Draw".into(), theme::TEXT_MUTED),
    }
}

/// Share of the board that is taken, if the board has any cells.
pub fn occupied_share(game: &Game) -> Option<f32> {
    let total = game
        .width
        .max(0)
        .checked_mul(game.height.max(0))
        .filter(|t| *t > 0)?;
    Some(game.occupied_cells() as f32 / total as f32)
}

impl Component for StateComponent {
    fn name(&self) -> &'static str {
        "State"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let Some(game) = view.game else {
            empty_hint(ui, "No game yet. Connect to join the next one.");
            return;
        };

        let (headline, color) = phase(game);
        ui.label(
            egui::RichText::new(headline)
                .size(theme::FONT_TITLE)
                .color(color)
                .strong(),
        );
        if !view.live {
            ui.label(egui::RichText::new("Replay").color(theme::TEXT_DIM));
        }

        theme::key_value(ui, "Board", format!("{} × {}", game.width, game.height));
        match (view.live, view.replay) {
            (false, Some(replay)) => theme::key_value(
                ui,
                "Frame",
                format!("{} / {}", replay.cursor + 1, replay.frames.len()),
            ),
            _ => theme::key_value(ui, "Round", view.round.round.to_string()),
        }
        theme::key_value(ui, "You", format!("Player {}", game.you));
        theme::key_value(
            ui,
            "Active",
            format!("{} / {}", game.active_count(), game.players.len()),
        );

        if let Some(filled) = occupied_share(game) {
            theme::key_value(ui, "Occupied", format!("{:.1} %", filled * 100.0));
        }
    }
}
