//! Centralized theme constants for the viewer
//! Panel colors, sizes and frames; board colors live in `colors`

use crate::types::{ConnectionStatus, MessageLevel};
use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x10, 0x10, 0x16);
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x22);
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x26, 0x26, 0x30);
pub const BG_BOARD: Color32 = Color32::from_rgb(0x2b, 0x2b, 0x36); // frame around the board

// =============================================================================
// COLORS - Accent
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0x54, 0x63, 0xff); // player 2 blue
pub const ACCENT_MUTED: Color32 = Color32::from_rgb(0x2f, 0x37, 0x8c);

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa);
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x2c, 0x2c, 0x36);
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x4c);

// =============================================================================
// COLORS - Status
// =============================================================================
pub const STATUS_SUCCESS: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99);
pub const STATUS_WARNING: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const STATUS_ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
pub const STATUS_IDLE: Color32 = TEXT_DIM;

pub fn connection_color(status: &ConnectionStatus) -> Color32 {
    match status {
        ConnectionStatus::Connected => STATUS_SUCCESS,
        ConnectionStatus::Connecting => STATUS_WARNING,
        ConnectionStatus::Failed(_) => STATUS_ERROR,
        ConnectionStatus::Disconnected | ConnectionStatus::Closed(_) => STATUS_IDLE,
    }
}

pub fn message_color(level: MessageLevel) -> Color32 {
    match level {
        MessageLevel::Info => TEXT_SECONDARY,
        MessageLevel::Success => STATUS_SUCCESS,
        MessageLevel::Warning => STATUS_WARNING,
        MessageLevel::Error => STATUS_ERROR,
    }
}

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_SMALL: f32 = 11.0;

// =============================================================================
// DIMENSIONS - Layout
// =============================================================================
pub const SIDEBAR_WIDTH: f32 = 300.0;
pub const RIGHT_PANEL_WIDTH: f32 = 340.0;
pub const SWATCH_SIZE: f32 = 14.0;
pub const BUTTON_HEIGHT: f32 = 28.0;
pub const CONTROL_BUTTON_SIZE: f32 = 44.0;

pub const RADIUS_SMALL: f32 = 2.0;
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;

pub const STROKE_DEFAULT: f32 = 1.0;
pub const STROKE_THICK: f32 = 2.0;

pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    let widget = |bg_fill: Color32, weak_bg_fill: Color32, fg: Color32| egui::style::WidgetVisuals {
        bg_fill,
        weak_bg_fill,
        bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
        fg_stroke: egui::Stroke::new(STROKE_DEFAULT, fg),
        corner_radius: RADIUS_DEFAULT.into(),
        expansion: 0.0,
    };

    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: BG_ELEVATED,
        extreme_bg_color: BG_BASE,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        selection: egui::style::Selection {
            bg_fill: ACCENT_MUTED,
            stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
        },
        widgets: egui::style::Widgets {
            noninteractive: widget(BG_ELEVATED, BG_SURFACE, TEXT_PRIMARY),
            inactive: widget(BG_SURFACE, BG_SURFACE, TEXT_SECONDARY),
            hovered: widget(ACCENT_MUTED, Color32::from_rgb(0x33, 0x33, 0x40), TEXT_PRIMARY),
            active: widget(ACCENT, ACCENT, TEXT_PRIMARY),
            open: widget(BG_SURFACE, BG_ELEVATED, TEXT_PRIMARY),
        },
        striped: true,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_corner_radius: egui::CornerRadius::same(8),
        menu_corner_radius: egui::CornerRadius::same(8),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.scroll.bar_width = 6.0;
        style.spacing.scroll.floating = false;
    });
}

// =============================================================================
// HELPER - Card frame (used by the Box component)
// =============================================================================
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_LG as i8))
}

pub fn board_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_BOARD)
        .inner_margin(egui::Margin::same(SPACING_MD as i8))
}

// =============================================================================
// HELPER - Button styles
// =============================================================================
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY))
        .fill(BG_SURFACE)
        .min_size(egui::vec2(0.0, BUTTON_HEIGHT))
}

pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY).strong())
        .fill(ACCENT)
        .min_size(egui::vec2(0.0, BUTTON_HEIGHT))
}

pub fn button_danger(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY))
        .fill(Color32::from_rgb(0xb9, 0x1c, 0x1c))
        .min_size(egui::vec2(0.0, BUTTON_HEIGHT))
}

/// Small uppercase caption above a value
pub fn caption(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(egui::RichText::new(text).size(FONT_SMALL).color(TEXT_DIM))
            .selectable(false),
    );
}

/// `label: value` row
pub fn key_value(ui: &mut egui::Ui, key: &str, value: impl Into<egui::WidgetText>) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(key).color(TEXT_MUTED));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value);
        });
    });
}
