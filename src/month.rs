use crate::panel::MonthPanel;
use crate::theme::{opacity_style, CURSOR_STYLE, MONTH_STYLE, WEEKDAY_STYLE};
use daymask::{Plugin, TapTarget};
use ratatui::{prelude::*, widgets::*};
use time::Date;

static HEADER: &str = " Su  Mo  Tu  We  Th  Fr  Sa ";

/// Number of columns per day of week
const DAY_WIDTH: u16 = 4;

/// Width of the day grid in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

const TITLE_LINE: u16 = 0;

const HEADER_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

/// Line on which the first week of the month is drawn
const FIRST_WEEK_LINE: u16 = 3;

const ACS_HLINE: char = '─';

pub(crate) trait DateStyler {
    fn date_style(&self, date: Date) -> Style;
}

impl<P: Plugin> DateStyler for P {
    fn date_style(&self, date: Date) -> Style {
        self.track_date(date)
            .map_or_else(Style::new, |tracked| opacity_style(tracked.style.opacity))
    }
}

/// A month grid with a cursor and an optional bracketed selection.  The last
/// line of the area holds a status message.
#[derive(Debug)]
pub(crate) struct MonthView<'a, S> {
    pub(crate) panel: &'a MonthPanel,
    pub(crate) styler: &'a S,
    pub(crate) cursor: TapTarget,
    pub(crate) selected: Option<Date>,
    pub(crate) status: &'a str,
}

impl<S: DateStyler> Widget for MonthView<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.mvprint(
            TITLE_LINE,
            0,
            format!("{} {}", self.panel.month(), self.panel.year()),
            Some(MONTH_STYLE),
        );
        canvas.mvprint(HEADER_LINE, 0, HEADER, Some(WEEKDAY_STYLE));
        canvas.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
        for (week_no, week) in std::iter::zip(0u16.., self.panel.weeks()) {
            for (wd, date) in std::iter::zip(0u16.., week) {
                let Some(date) = *date else {
                    continue;
                };
                let s = if self.selected == Some(date) {
                    format!("[{:2}]", date.day())
                } else {
                    format!(" {:2} ", date.day())
                };
                let mut style = self.styler.date_style(date);
                if (usize::from(week_no), usize::from(wd)) == (self.cursor.week, self.cursor.day)
                {
                    style = style.patch(CURSOR_STYLE);
                }
                canvas.mvprint(FIRST_WEEK_LINE + week_no, DAY_WIDTH * wd, s, Some(style));
            }
        }
        canvas.mvprint(area.height.saturating_sub(1), 0, self.status, None);
    }
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    pub(crate) fn mvprint<T: AsRef<str>>(&mut self, y: u16, x: u16, s: T, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // The Rect handed to the Paragraph must lie entirely within the
            // area, lest rendering panic
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    pub(crate) fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{BASE_STYLE, FADED_STYLE};
    use daymask::{DateEntry, DateRange, DisabledPlugin};
    use time::macros::date;

    #[test]
    fn test_render_june() {
        let mut plugin = DisabledPlugin::default();
        plugin.disable(
            [DateEntry::Range(DateRange::new(
                date!(2024 - 06 - 09),
                date!(2024 - 06 - 10),
            ))],
            false,
        );
        let panel = MonthPanel::containing(date!(2024 - 06 - 12));
        let view = MonthView {
            panel: &panel,
            styler: &plugin,
            cursor: TapTarget { week: 2, day: 3 },
            selected: Some(date!(2024 - 06 - 20)),
            status: "ready",
        };
        let area = Rect::new(0, 0, 28, 10);
        let mut buffer = Buffer::empty(area);
        buffer.set_style(area, BASE_STYLE);
        view.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "June 2024                   ",
            " Su  Mo  Tu  We  Th  Fr  Sa ",
            "────────────────────────────",
            "                          1 ",
            "  2   3   4   5   6   7   8 ",
            "  9  10  11  12  13  14  15 ",
            " 16  17  18  19 [20] 21  22 ",
            " 23  24  25  26  27  28  29 ",
            " 30                         ",
            "ready                       ",
        ]);
        expected.set_style(*expected.area(), BASE_STYLE);
        expected.set_style(Rect::new(0, 0, 9, 1), MONTH_STYLE);
        expected.set_style(Rect::new(0, 1, 28, 1), WEEKDAY_STYLE);
        expected.set_style(Rect::new(0, 5, 4, 1), FADED_STYLE);
        expected.set_style(Rect::new(4, 5, 4, 1), FADED_STYLE);
        expected.set_style(Rect::new(12, 5, 4, 1), CURSOR_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_styler_uses_plugin() {
        let mut plugin = DisabledPlugin::default();
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], false);
        assert_eq!(plugin.date_style(date!(2024 - 06 - 09)), FADED_STYLE);
        assert_eq!(plugin.date_style(date!(2024 - 06 - 08)), Style::new());
    }
}
