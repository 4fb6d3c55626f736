use crate::NotificationKind;
use ratatui::style::Color;

pub fn color_for_account(account_type: &str) -> Color {
    match account_type {
        "User" => Color::LightBlue,
        "Organization" => Color::Magenta,
        "Bot" => Color::Yellow,
        _ => Color::White,
    }
}

pub fn icon_for_account(account_type: &str) -> &'static str {
    match account_type {
        "User" => "\u{1F464}",         // bust in silhouette
        "Organization" => "\u{1F3E2}", // office building
        "Bot" => "\u{1F916}",          // robot
        _ => "\u{2754}",               // question mark
    }
}

pub fn type_label(account_type: &str) -> &'static str {
    match account_type {
        "User" => "User",
        "Organization" => "Organization",
        "Bot" => "Bot",
        _ => "Unknown",
    }
}

/// Foreground and background for a notification line
pub fn notification_colors(kind: NotificationKind) -> (Color, Color) {
    match kind {
        NotificationKind::Error => (Color::White, Color::Rgb(150, 30, 30)),
        NotificationKind::Loading => (Color::Black, Color::Rgb(200, 170, 40)),
    }
}
