use crate::day::{days_of_year, AnnualMarkKey};
use crate::entry::DateEntry;
use crate::notify::PluginService;
use crate::store::DisabledSet;
use crate::style::{MarkStyle, StyleOptions};
use std::collections::BTreeMap;
use time::Date;

/// What started a change of the selected date
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChangeSource {
    /// The user tapped a day directly
    Tap,
    /// The user paged to another month or year
    Swipe,
    /// The host moved the selection programmatically
    Jump,
}

/// Detail of the host's load event.  A plugin may only overwrite `checked`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadDetail {
    pub date: Date,
    pub checked: Option<Date>,
}

/// Detail of a pending selection change
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChangeDetail {
    pub date: Date,
    pub source: ChangeSource,
}

/// Changes a plugin requests when attached to a host
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AttachPatch {
    pub pointer_visible: Option<bool>,
}

/// A plugin's verdict on a pending selection change
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChangePatch {
    /// Abandon the change and keep the previous selection
    pub cancel: bool,
    pub pointer_visible: Option<bool>,
}

/// Grid coordinates of a tapped day in the current panel
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TapTarget {
    pub week: usize,
    pub day: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TapOutcome {
    /// Swallow the tap
    Intercept,
    Proceed { pointer_visible: bool },
}

/// Resolves grid coordinates of the host's current panel to a date
pub trait PanelLookup {
    fn day_at(&self, week: usize, day: usize) -> Option<Date>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrackDateResult {
    pub style: StyleOptions,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TrackYearResult {
    pub marks: BTreeMap<AnnualMarkKey, MarkStyle>,
}

/// The hooks a calendar host invokes on its plugins.
///
/// Every hook has a default that leaves the host untouched, so a plugin only
/// implements what it cares about.  Hooks never mutate host state directly:
/// they return a patch for the host to apply, or overwrite the one field a
/// detail type documents as writable.
pub trait Plugin {
    fn key(&self) -> &'static str;

    /// Receive the handle used for all later redraw requests
    fn initialize(&mut self, _service: Box<dyn PluginService>) {}

    fn on_attach(&mut self) -> AttachPatch {
        AttachPatch::default()
    }

    fn on_load(&mut self, _detail: &mut LoadDetail) {}

    fn on_change(&mut self, _detail: &ChangeDetail) -> ChangePatch {
        ChangePatch::default()
    }

    fn catch_tap(&mut self, _target: TapTarget, _panel: &dyn PanelLookup) -> TapOutcome {
        TapOutcome::Proceed {
            pointer_visible: true,
        }
    }

    fn track_date(&self, _date: Date) -> Option<TrackDateResult> {
        None
    }

    fn track_year(&self, _year: i32) -> Option<TrackYearResult> {
        None
    }

    fn dates_filter(&self, dates: &[DateEntry]) -> Vec<DateEntry> {
        dates.to_vec()
    }
}

/// Plugin that makes a set of dates unselectable and renders them faded
#[derive(Debug)]
pub struct DisabledPlugin {
    options: StyleOptions,
    disabled: DisabledSet,
    service: Option<Box<dyn PluginService>>,
}

impl DisabledPlugin {
    pub const KEY: &'static str = "wc-plugin-disabled";

    pub fn new(options: StyleOptions) -> DisabledPlugin {
        DisabledPlugin {
            options,
            disabled: DisabledSet::new(),
            service: None,
        }
    }

    pub fn options(&self) -> &StyleOptions {
        &self.options
    }

    /// Disable `dates`, first enabling everything if `clear` is true, and ask
    /// the host to redraw every day whose state may have changed
    pub fn disable<I: IntoIterator<Item = DateEntry>>(&mut self, dates: I, clear: bool) {
        let touched = self.disabled.disable(dates, clear);
        tracing::debug!(
            clear,
            entries = self.disabled.len(),
            touched = touched.entries().len(),
            "updated disabled dates"
        );
        match self.service.as_deref() {
            Some(service) => touched.dispatch(service),
            None => tracing::warn!("plugin not initialized; skipping redraw request"),
        }
    }

    pub fn filter(&self, dates: &[DateEntry]) -> Vec<DateEntry> {
        self.disabled.filter(dates)
    }

    pub fn is_date_disabled(&self, date: Date) -> bool {
        self.disabled.is_date_disabled(date)
    }

    /// A copy of the current disabled set
    pub fn entries(&self) -> Vec<DateEntry> {
        self.disabled.iter().collect()
    }
}

impl Default for DisabledPlugin {
    fn default() -> DisabledPlugin {
        DisabledPlugin::new(StyleOptions::default())
    }
}

impl Plugin for DisabledPlugin {
    fn key(&self) -> &'static str {
        DisabledPlugin::KEY
    }

    fn initialize(&mut self, service: Box<dyn PluginService>) {
        self.service = Some(service);
    }

    fn on_attach(&mut self) -> AttachPatch {
        AttachPatch {
            pointer_visible: Some(false),
        }
    }

    fn on_load(&mut self, detail: &mut LoadDetail) {
        detail.checked = None;
    }

    fn on_change(&mut self, detail: &ChangeDetail) -> ChangePatch {
        ChangePatch {
            cancel: detail.source != ChangeSource::Tap,
            pointer_visible: Some(false),
        }
    }

    fn catch_tap(&mut self, target: TapTarget, panel: &dyn PanelLookup) -> TapOutcome {
        match panel.day_at(target.week, target.day) {
            Some(date) if !self.is_date_disabled(date) => TapOutcome::Proceed {
                pointer_visible: true,
            },
            Some(_) => TapOutcome::Intercept,
            None => {
                tracing::debug!(?target, "tap outside the panel's days");
                TapOutcome::Intercept
            }
        }
    }

    fn track_date(&self, date: Date) -> Option<TrackDateResult> {
        self.is_date_disabled(date).then(|| TrackDateResult {
            style: self.options.clone(),
        })
    }

    fn track_year(&self, year: i32) -> Option<TrackYearResult> {
        let mark = MarkStyle::uniform(self.options.opacity);
        let marks = days_of_year(year)
            .filter(|&d| self.is_date_disabled(d))
            .map(|d| (AnnualMarkKey::of(d), mark))
            .collect::<BTreeMap<_, _>>();
        (!marks.is_empty()).then_some(TrackYearResult { marks })
    }

    fn dates_filter(&self, dates: &[DateEntry]) -> Vec<DateEntry> {
        self.filter(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DateRange;
    use crate::notify::tests::Recorder;
    use crate::notify::{Notification, ServiceHandle};
    use crate::style::Opacity;
    use std::sync::mpsc::Receiver;
    use time::macros::date;

    fn initialized() -> (DisabledPlugin, Receiver<Notification>) {
        let (handle, rx) = ServiceHandle::channel();
        let mut plugin = DisabledPlugin::default();
        plugin.initialize(Box::new(handle));
        (plugin, rx)
    }

    fn drain(rx: &Receiver<Notification>) -> Vec<Notification> {
        rx.try_iter().collect()
    }

    struct Grid(Vec<Vec<Option<Date>>>);

    impl PanelLookup for Grid {
        fn day_at(&self, week: usize, day: usize) -> Option<Date> {
            self.0.get(week)?.get(day).copied().flatten()
        }
    }

    #[test]
    fn test_key() {
        assert_eq!(DisabledPlugin::default().key(), "wc-plugin-disabled");
    }

    #[test]
    fn test_disable_notifies_ranges_and_years() {
        let (mut plugin, rx) = initialized();
        plugin.disable(
            [
                DateEntry::Point(date!(2024 - 06 - 09)),
                DateEntry::Point(date!(2024 - 06 - 10)),
            ],
            false,
        );
        assert_eq!(
            drain(&rx),
            [
                Notification::Ranges(vec![DateRange::new(
                    date!(2024 - 06 - 09),
                    date!(2024 - 06 - 10)
                )]),
                Notification::Years(vec![2024]),
            ]
        );
    }

    #[test]
    fn test_disable_across_new_year() {
        let (mut plugin, rx) = initialized();
        plugin.disable(
            [DateEntry::Range(DateRange::new(
                date!(2024 - 12 - 30),
                date!(2025 - 01 - 02),
            ))],
            false,
        );
        assert_eq!(drain(&rx).last(), Some(&Notification::Years(vec![2024, 2025])));
    }

    #[test]
    fn test_clear_notifies_freed_days() {
        let recorder = std::rc::Rc::new(Recorder::default());
        let mut plugin = DisabledPlugin::default();
        plugin.initialize(Box::new(SharedRecorder(recorder.clone())));
        plugin.disable([DateEntry::Point(date!(2023 - 05 - 01))], false);
        recorder.0.borrow_mut().clear();
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], true);
        assert_eq!(
            recorder.0.borrow().as_slice(),
            [
                Notification::Ranges(vec![
                    DateRange::single(date!(2023 - 05 - 01)),
                    DateRange::single(date!(2024 - 06 - 09)),
                ]),
                Notification::Years(vec![2023, 2024]),
            ]
        );
        assert_eq!(plugin.entries(), [DateEntry::Point(date!(2024 - 06 - 09))]);
    }

    #[derive(Debug)]
    struct SharedRecorder(std::rc::Rc<Recorder>);

    impl PluginService for SharedRecorder {
        fn update_range(&self, ranges: Vec<DateRange>) {
            self.0.update_range(ranges);
        }

        fn update_annuals(&self, years: Vec<i32>) {
            self.0.update_annuals(years);
        }
    }

    #[test]
    fn test_disable_before_initialize_still_updates() {
        let mut plugin = DisabledPlugin::default();
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], false);
        assert!(plugin.is_date_disabled(date!(2024 - 06 - 09)));
    }

    #[test]
    fn test_attach_hides_pointer() {
        let mut plugin = DisabledPlugin::default();
        assert_eq!(plugin.on_attach().pointer_visible, Some(false));
    }

    #[test]
    fn test_load_clears_checked() {
        let mut plugin = DisabledPlugin::default();
        let mut detail = LoadDetail {
            date: date!(2024 - 06 - 09),
            checked: Some(date!(2024 - 06 - 09)),
        };
        plugin.on_load(&mut detail);
        assert_eq!(detail.checked, None);
        assert_eq!(detail.date, date!(2024 - 06 - 09));
    }

    #[test]
    fn test_change_cancelled_unless_tapped() {
        let mut plugin = DisabledPlugin::default();
        let mut detail = ChangeDetail {
            date: date!(2024 - 07 - 01),
            source: ChangeSource::Swipe,
        };
        assert_eq!(
            plugin.on_change(&detail),
            ChangePatch {
                cancel: true,
                pointer_visible: Some(false),
            }
        );
        detail.source = ChangeSource::Jump;
        assert!(plugin.on_change(&detail).cancel);
        detail.source = ChangeSource::Tap;
        assert!(!plugin.on_change(&detail).cancel);
    }

    #[test]
    fn test_catch_tap() {
        let (mut plugin, _rx) = initialized();
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], false);
        let grid = Grid(vec![
            vec![None, None, None, None, None, None, Some(date!(2024 - 06 - 01))],
            (2..=8)
                .map(|d| Date::from_calendar_date(2024, time::Month::June, d).ok())
                .collect(),
            (9..=15)
                .map(|d| Date::from_calendar_date(2024, time::Month::June, d).ok())
                .collect(),
        ]);
        assert_eq!(
            plugin.catch_tap(TapTarget { week: 2, day: 0 }, &grid),
            TapOutcome::Intercept
        );
        assert_eq!(
            plugin.catch_tap(TapTarget { week: 2, day: 1 }, &grid),
            TapOutcome::Proceed {
                pointer_visible: true
            }
        );
        assert_eq!(
            plugin.catch_tap(TapTarget { week: 0, day: 0 }, &grid),
            TapOutcome::Intercept
        );
    }

    #[test]
    fn test_track_date() {
        let (handle, _rx) = ServiceHandle::channel();
        let style = StyleOptions {
            opacity: Opacity::new(50).unwrap(),
            ..StyleOptions::default()
        };
        let mut plugin = DisabledPlugin::new(style.clone());
        plugin.initialize(Box::new(handle));
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], false);
        assert_eq!(
            plugin.track_date(date!(2024 - 06 - 09)),
            Some(TrackDateResult { style })
        );
        assert_eq!(plugin.track_date(date!(2024 - 06 - 10)), None);
    }

    #[test]
    fn test_track_year_leap_day() {
        let (mut plugin, _rx) = initialized();
        plugin.disable(
            [DateEntry::Range(DateRange::new(
                date!(2023 - 02 - 27),
                date!(2024 - 03 - 01),
            ))],
            false,
        );
        let leap = plugin.track_year(2024).unwrap();
        assert_eq!(leap.marks.len(), 31 + 29 + 1);
        assert!(leap
            .marks
            .keys()
            .any(|k| k.to_string() == "2_29"));
        assert_eq!(
            leap.marks.get(&AnnualMarkKey::of(date!(2024 - 02 - 29))),
            Some(&MarkStyle::uniform(Opacity::default()))
        );
        let common = plugin.track_year(2023).unwrap();
        assert_eq!(common.marks.len(), 2 + 31 * 6 + 30 * 4);
        assert!(!common.marks.keys().any(|k| k.to_string() == "2_29"));
    }

    #[test]
    fn test_track_year_without_marks() {
        let (mut plugin, _rx) = initialized();
        plugin.disable([DateEntry::Point(date!(2024 - 06 - 09))], false);
        assert_eq!(plugin.track_year(2025), None);
        assert_eq!(plugin.track_year(2024).map(|r| r.marks.len()), Some(1));
    }

    #[test]
    fn test_dates_filter() {
        let (mut plugin, _rx) = initialized();
        plugin.disable([DateEntry::Point(date!(2024 - 01 - 05))], false);
        let hooks: &dyn Plugin = &plugin;
        assert_eq!(
            hooks.dates_filter(&[DateEntry::Range(DateRange::new(
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 10)
            ))]),
            [
                DateEntry::Range(DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 04))),
                DateEntry::Range(DateRange::new(date!(2024 - 01 - 06), date!(2024 - 01 - 10))),
            ]
        );
    }
}
