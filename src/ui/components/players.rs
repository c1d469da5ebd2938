//! Players - table of everyone on the board

use super::{display_name, empty_hint, swatch};
use crate::colors;
use crate::protocol::Player;
use crate::theme;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

pub struct PlayersComponent;

fn status(player: &Player, running: bool, winner: Option<u8>, id: u8) -> (&'static str, egui::Color32) {
    if !player.active {
        ("out", theme::STATUS_ERROR)
    } else if !running && winner == Some(id) {
        ("winner", theme::STATUS_SUCCESS)
    } else {
        ("alive", theme::TEXT_SECONDARY)
    }
}

impl Component for PlayersComponent {
    fn name(&self) -> &'static str {
        "Players"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let Some(game) = view.game else {
            empty_hint(ui, "No players yet");
            return;
        };
        let winner = game.winner();
        let row_height = 22.0;

        TableBuilder::new(ui)
            .id_salt("players_table")
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(theme::SWATCH_SIZE + 4.0))
            .column(Column::remainder().at_least(70.0))
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .header(row_height, |mut header| {
                for title in ["", "Name", "Pos", "Dir", "Speed", ""] {
                    header.col(|ui| theme::caption(ui, title));
                }
            })
            .body(|mut body| {
                for (&id, player) in &game.players {
                    body.row(row_height, |mut row| {
                        row.col(|ui| {
                            swatch(ui, colors::player_color(id), theme::SWATCH_SIZE);
                        });
                        row.col(|ui| {
                            let mut name = egui::RichText::new(display_name(id, player));
                            if id == game.you {
                                name = name.strong().color(theme::TEXT_PRIMARY);
                            }
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.label(format!("{}, {}", player.x, player.y));
                        });
                        row.col(|ui| {
                            ui.label(player.direction.label());
                        });
                        row.col(|ui| {
                            ui.label(player.speed.to_string());
                        });
                        row.col(|ui| {
                            let (text, color) = status(player, game.running, winner, id);
                            ui.label(egui::RichText::new(text).size(theme::FONT_SMALL).color(color));
                        });
                    });
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tests::sample;

    #[test]
    fn status_reflects_activity_and_result() {
        let mut game = sample();
        assert_eq!(status(&game.players[&1], true, None, 1).0, "alive");

        game.players.get_mut(&2).unwrap().active = false;
        game.running = false;
        let winner = game.winner();
        assert_eq!(winner, Some(1));
        assert_eq!(status(&game.players[&1], false, winner, 1).0, "winner");
        assert_eq!(status(&game.players[&2], false, winner, 2).0, "out");
    }
}
