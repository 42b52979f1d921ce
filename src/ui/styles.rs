use ratatui::style::{Color, Modifier, Style};

use crate::offers::SizeClass;

/// Accent colour per size tier, mirroring the card icon tiers of the source
/// page (small blue, medium green, large yellow, oversize magenta).
pub fn size_accent(class: SizeClass) -> Color {
    match class {
        SizeClass::Small => Color::Blue,
        SizeClass::Medium => Color::Green,
        SizeClass::Large => Color::Yellow,
        SizeClass::ExtraLarge => Color::Magenta,
    }
}

pub fn header() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn hint() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn selected_marker() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn status() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn failure() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
