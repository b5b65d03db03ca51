use daymask::{PanelLookup, TapTarget};
use std::iter::successors;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> usize {
        self.number_days_from_sunday().into()
    }
}

pub(crate) type Week = [Option<Date>; DAYS_IN_WEEK];

/// One month laid out as Sunday-first weeks, the unit the host displays and
/// resolves taps against
#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: `weeks` is nonempty and every date in it lies in `month`
pub(crate) struct MonthPanel {
    year: i32,
    month: Month,
    weeks: Vec<Week>,
}

impl MonthPanel {
    pub(crate) fn containing(date: Date) -> MonthPanel {
        let first = successors(Some(date), |&d| d.previous_day())
            .take_while(|d| d.month() == date.month())
            .last()
            .unwrap_or(date);
        let mut weeks: Vec<Week> = Vec::with_capacity(6);
        for d in successors(Some(first), |&d| d.next_day()).take_while(|d| d.month() == date.month())
        {
            let i = d.weekday().index0();
            if i == 0 || weeks.is_empty() {
                weeks.push([None; DAYS_IN_WEEK]);
            }
            if let Some(slot) = weeks.last_mut().and_then(|w| w.get_mut(i)) {
                *slot = Some(d);
            }
        }
        MonthPanel {
            year: date.year(),
            month: date.month(),
            weeks,
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = Date> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }

    pub(crate) fn first_day(&self) -> Option<Date> {
        self.days().next()
    }

    pub(crate) fn last_day(&self) -> Option<Date> {
        self.days().last()
    }

    /// The following month, or `None` at the end of time
    pub(crate) fn next(&self) -> Option<MonthPanel> {
        self.last_day()
            .and_then(Date::next_day)
            .map(MonthPanel::containing)
    }

    /// The preceding month, or `None` at the start of time
    pub(crate) fn previous(&self) -> Option<MonthPanel> {
        self.first_day()
            .and_then(Date::previous_day)
            .map(MonthPanel::containing)
    }

    pub(crate) fn position_of(&self, date: Date) -> Option<TapTarget> {
        self.weeks.iter().enumerate().find_map(|(week, days)| {
            days.iter()
                .position(|&d| d == Some(date))
                .map(|day| TapTarget { week, day })
        })
    }
}

impl PanelLookup for MonthPanel {
    fn day_at(&self, week: usize, day: usize) -> Option<Date> {
        self.weeks.get(week)?.get(day).copied().flatten()
    }
}
