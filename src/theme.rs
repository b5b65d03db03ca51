use daymask::Opacity;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const YEAR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Style of a day drawn at less than full opacity
pub(crate) const FADED_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::DIM);

pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

// A terminal has no alpha channel, so any translucency is drawn as faded
pub(crate) fn opacity_style(opacity: Opacity) -> Style {
    if opacity.is_translucent() {
        FADED_STYLE
    } else {
        Style::new()
    }
}
