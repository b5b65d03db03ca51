use crate::host::AnnualMarks;
use crate::month::BufferCanvas;
use crate::panel::MonthPanel;
use crate::theme::{opacity_style, MONTH_STYLE, YEAR_STYLE};
use daymask::AnnualMarkKey;
use ratatui::{prelude::*, widgets::Widget};
use std::iter::successors;
use time::{Date, Month};

/// Months drawn side by side in each band
const MONTHS_PER_BAND: u16 = 3;

/// Columns per day: two digits and a space
const DAY_WIDTH: u16 = 3;

/// Columns per month, including the gutter to its right
const MONTH_WIDTH: u16 = DAY_WIDTH * 7 + 1;

/// Lines per band: month name, up to six weeks, and a blank line
const BAND_LINES: u16 = 8;

/// A whole year of small month grids, with each marked day drawn in its
/// mark's style
#[derive(Debug)]
pub(crate) struct YearView<'a> {
    pub(crate) year: i32,
    pub(crate) marks: &'a AnnualMarks,
    pub(crate) status: &'a str,
}

impl Widget for YearView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.mvprint(0, 0, self.year.to_string(), Some(YEAR_STYLE));
        let months = successors(Some(Month::January), |m| Some(m.next())).take(12);
        for (i, month) in std::iter::zip(0u16.., months) {
            let Ok(first) = Date::from_calendar_date(self.year, month, 1) else {
                continue;
            };
            let x0 = (i % MONTHS_PER_BAND) * MONTH_WIDTH;
            let y0 = 1 + (i / MONTHS_PER_BAND) * BAND_LINES;
            canvas.mvprint(y0, x0, month.to_string(), Some(MONTH_STYLE));
            let panel = MonthPanel::containing(first);
            for (week_no, week) in std::iter::zip(1u16.., panel.weeks()) {
                for (wd, date) in std::iter::zip(0u16.., week) {
                    let Some(date) = *date else {
                        continue;
                    };
                    let style = self
                        .marks
                        .get(&AnnualMarkKey::of(date))
                        .map_or_else(Style::new, |mark| opacity_style(mark.light));
                    canvas.mvprint(
                        y0 + week_no,
                        x0 + wd * DAY_WIDTH,
                        format!("{:2}", date.day()),
                        Some(style),
                    );
                }
            }
        }
        canvas.mvprint(area.height.saturating_sub(1), 0, self.status, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::FADED_STYLE;
    use daymask::{MarkStyle, Opacity};
    use time::macros::date;

    fn render(year: i32, marks: &AnnualMarks) -> Buffer {
        let area = Rect::new(0, 0, 66, 34);
        let mut buffer = Buffer::empty(area);
        YearView {
            year,
            marks,
            status: "",
        }
        .render(area, &mut buffer);
        buffer
    }

    #[test]
    fn test_marked_leap_day() {
        let marks = AnnualMarks::from([(
            AnnualMarkKey::of(date!(2024 - 02 - 29)),
            MarkStyle::uniform(Opacity::default()),
        )]);
        let buffer = render(2024, &marks);
        // February is the second month of the first band; the 29th is a
        // Thursday in its fifth week
        assert_eq!(buffer[(22, 1)].symbol(), "F");
        assert_eq!(buffer[(34, 6)].symbol(), "2");
        assert_eq!(buffer[(35, 6)].symbol(), "9");
        assert_eq!(buffer[(34, 6)].fg, FADED_STYLE.fg.unwrap_or_default());
        assert!(buffer[(34, 6)].modifier.contains(Modifier::DIM));
        assert!(!buffer[(31, 6)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_unmarked_year() {
        let buffer = render(2023, &AnnualMarks::new());
        assert_eq!(buffer[(0, 0)].symbol(), "2");
        // 2023-02 has no 29th; the Wednesday after the 28th is blank
        assert_eq!(buffer[(31, 6)].symbol(), " ");
        assert!(!buffer.content().iter().any(|c| c.modifier.contains(Modifier::DIM)));
    }
}
