//! Controls - the five actions, by button or keyboard

use crate::protocol::Action;
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;
use egui_phosphor::regular as icons;

pub struct ControlsComponent;

/// Keyboard shortcut for an action.
pub fn action_for_key(key: egui::Key) -> Option<Action> {
    match key {
        egui::Key::ArrowLeft | egui::Key::A => Some(Action::TurnLeft),
        egui::Key::ArrowRight | egui::Key::D => Some(Action::TurnRight),
        egui::Key::ArrowUp | egui::Key::W => Some(Action::SpeedUp),
        egui::Key::ArrowDown | egui::Key::S => Some(Action::SlowDown),
        egui::Key::Space => Some(Action::ChangeNothing),
        _ => None,
    }
}

fn icon(action: Action) -> &'static str {
    match action {
        Action::TurnLeft => icons::ARROW_LEFT,
        Action::TurnRight => icons::ARROW_RIGHT,
        Action::SpeedUp => icons::ARROW_UP,
        Action::SlowDown => icons::ARROW_DOWN,
        Action::ChangeNothing => icons::MINUS,
    }
}

fn action_button(ui: &mut egui::Ui, action: Action, enabled: bool, chosen: bool) -> bool {
    let size = egui::vec2(theme::CONTROL_BUTTON_SIZE, theme::CONTROL_BUTTON_SIZE);
    let fill = if chosen { theme::ACCENT } else { theme::BG_SURFACE };
    let button = egui::Button::new(egui::RichText::new(icon(action)).size(theme::FONT_TITLE))
        .fill(fill)
        .min_size(size);
    ui.add_enabled(enabled, button)
        .on_hover_text(action.label())
        .clicked()
}

impl Component for ControlsComponent {
    fn name(&self) -> &'static str {
        "Controls"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let can_act = view.can_act();
        let me = view.game.and_then(|g| g.me());
        let allowed = |action: Action| can_act && me.is_some_and(|p| p.path(action).is_some());
        let chosen = view.round.answered;

        let mut picked = None;
        let spacer = theme::CONTROL_BUTTON_SIZE + ui.spacing().item_spacing.x;

        ui.vertical_centered(|ui| {
            if action_button(ui, Action::SpeedUp, allowed(Action::SpeedUp), chosen == Some(Action::SpeedUp)) {
                picked = Some(Action::SpeedUp);
            }
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 3.0 * spacer).max(0.0) / 2.0);
                for action in [Action::TurnLeft, Action::ChangeNothing, Action::TurnRight] {
                    if action_button(ui, action, allowed(action), chosen == Some(action)) {
                        picked = Some(action);
                    }
                }
            });
            if action_button(ui, Action::SlowDown, allowed(Action::SlowDown), chosen == Some(Action::SlowDown)) {
                picked = Some(Action::SlowDown);
            }
        });

        // Shortcuts are ignored while a text field has focus.
        if can_act && !ui.ctx().wants_keyboard_input() {
            let pressed = ui.input(|i| {
                i.events.iter().find_map(|event| match event {
                    egui::Event::Key { key, pressed: true, repeat: false, .. } => action_for_key(*key),
                    _ => None,
                })
            });
            if let Some(action) = pressed.filter(|a| allowed(*a)) {
                picked = picked.or(Some(action));
            }
        }

        ui.add_space(theme::SPACING_SM);
        let note = match (chosen, view.autoplay) {
            (Some(action), _) => format!("Sent: {}", action.label()),
            (None, true) => "Autopilot is playing".to_string(),
            (None, false) if can_act => "Arrows / WASD, space for nothing".to_string(),
            (None, false) => "Waiting for the next round".to_string(),
        };
        ui.vertical_centered(|ui| theme::caption(ui, &note));

        if let Some(action) = picked {
            view.emit(Intent::SendAction(action));
        }
    }
}
