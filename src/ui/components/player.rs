//! Player - our own player and the autopilot

use super::{display_name, empty_hint, swatch};
use crate::colors;
use crate::constants::MAX_SPEED;
use crate::protocol::leaves_gaps;
use crate::strategy::{self, StrategyKind};
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;

pub struct PlayerComponent;

impl PlayerComponent {
    fn autopilot(ui: &mut egui::Ui, view: &mut View<'_>) {
        let mut autoplay = view.autoplay;
        if ui.checkbox(&mut autoplay, "Autopilot").changed() {
            view.emit(Intent::SetAutoplay(autoplay));
        }

        let mut kind = view.strategy;
        egui::ComboBox::from_id_salt("strategy_combo")
            .selected_text(kind.label())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for option in StrategyKind::ALL {
                    ui.selectable_value(&mut kind, option, option.label());
                }
            });
        if kind != view.strategy {
            view.emit(Intent::SetStrategy(kind));
        }
    }
}

impl Component for PlayerComponent {
    fn name(&self) -> &'static str {
        "Player"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let me = view.game.and_then(|g| g.me().map(|p| (g, p)));

        match me {
            None => empty_hint(ui, "Not in a game"),
            Some((game, player)) => {
                ui.horizontal(|ui| {
                    swatch(ui, colors::player_color(game.you), theme::SWATCH_SIZE);
                    ui.label(
                        egui::RichText::new(format!("{} (you)", display_name(game.you, player)))
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    if !player.active {
                        ui.label(egui::RichText::new("out").color(theme::STATUS_ERROR));
                    }
                });
                theme::key_value(ui, "Position", format!("{}, {}", player.x, player.y));
                theme::key_value(ui, "Heading", player.direction.label());
                ui.add(
                    egui::ProgressBar::new(f32::from(player.speed) / f32::from(MAX_SPEED))
                        .text(format!("speed {}", player.speed)),
                );

                if let Some(action) = view.round.answered.filter(|_| view.live) {
                    theme::key_value(ui, "Sent", action.label());
                }
                if view.live && game.running && leaves_gaps(view.round.round, player.speed) {
                    ui.label(
                        egui::RichText::new("Jump round: this move leaves a gap")
                            .size(theme::FONT_SMALL)
                            .color(theme::STATUS_WARNING),
                    );
                }

                if game.running && player.active {
                    let safe = strategy::safe_actions(game, player);
                    let text = if safe.is_empty() {
                        "none".to_string()
                    } else {
                        safe.iter().map(|a| a.label()).collect::<Vec<_>>().join(", ")
                    };
                    let color = if safe.is_empty() { theme::STATUS_WARNING } else { theme::TEXT_SECONDARY };
                    theme::caption(ui, "SAFE MOVES");
                    ui.add(egui::Label::new(egui::RichText::new(text).color(color)).wrap());
                }
            }
        }

        ui.separator();
        Self::autopilot(ui, view);
    }
}
