use crate::entry::{DateEntry, DateRange};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

/// The channel through which a plugin asks its host to redraw.
///
/// Handed to the plugin once, at initialization.
pub trait PluginService: fmt::Debug {
    /// Re-render every day inside `ranges`
    fn update_range(&self, ranges: Vec<DateRange>);

    /// Recompute the annual marks of each year in `years`
    fn update_annuals(&self, years: Vec<i32>);
}

/// A redraw request as delivered over a [`ServiceHandle`]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Notification {
    Ranges(Vec<DateRange>),
    Years(Vec<i32>),
}

/// [`PluginService`] backed by an mpsc channel.  The host keeps the
/// [`Receiver`] and drains it from its own event loop.
#[derive(Clone, Debug)]
pub struct ServiceHandle {
    tx: Sender<Notification>,
}

impl ServiceHandle {
    pub fn channel() -> (ServiceHandle, Receiver<Notification>) {
        let (tx, rx) = channel();
        (ServiceHandle { tx }, rx)
    }

    fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("host receiver dropped; discarding notification");
        }
    }
}

impl PluginService for ServiceHandle {
    fn update_range(&self, ranges: Vec<DateRange>) {
        self.send(Notification::Ranges(ranges));
    }

    fn update_annuals(&self, years: Vec<i32>) {
        self.send(Notification::Years(years));
    }
}

/// The normalized entries affected by one mutation of a disabled set.
///
/// When the set was cleared first, this covers the days that became enabled
/// as well as those that became disabled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Touched {
    entries: Vec<DateEntry>,
}

impl Touched {
    pub fn new(entries: Vec<DateEntry>) -> Touched {
        Touched { entries }
    }

    pub fn entries(&self) -> &[DateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry as a range; a lone day becomes a one-day range
    pub fn ranges(&self) -> Vec<DateRange> {
        self.entries.iter().map(DateEntry::span).collect()
    }

    /// Distinct calendar years spanned by the entries, in ascending order
    pub fn years(&self) -> Vec<i32> {
        self.entries
            .iter()
            .flat_map(|e| e.span().years())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Tell the host which ranges and which years need redrawing
    pub fn dispatch(&self, service: &dyn PluginService) {
        let ranges = self.ranges();
        let years = self.years();
        tracing::debug!(
            ranges = ranges.len(),
            ?years,
            "requesting redraw of disabled dates"
        );
        service.update_range(ranges);
        service.update_annuals(years);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use time::macros::date;

    /// Service that records every request it receives
    #[derive(Debug, Default)]
    pub(crate) struct Recorder(pub(crate) RefCell<Vec<Notification>>);

    impl PluginService for Recorder {
        fn update_range(&self, ranges: Vec<DateRange>) {
            self.0.borrow_mut().push(Notification::Ranges(ranges));
        }

        fn update_annuals(&self, years: Vec<i32>) {
            self.0.borrow_mut().push(Notification::Years(years));
        }
    }

    #[test]
    fn test_ranges_wrap_points() {
        let touched = Touched::new(vec![
            DateEntry::Point(date!(2024 - 06 - 09)),
            DateEntry::Range(DateRange::new(
                date!(2024 - 07 - 01),
                date!(2024 - 07 - 03),
            )),
        ]);
        assert_eq!(
            touched.ranges(),
            [
                DateRange::new(date!(2024 - 06 - 09), date!(2024 - 06 - 09)),
                DateRange::new(date!(2024 - 07 - 01), date!(2024 - 07 - 03)),
            ]
        );
    }

    #[test]
    fn test_years_across_new_year() {
        let touched = Touched::new(vec![DateEntry::Range(DateRange::new(
            date!(2024 - 12 - 30),
            date!(2025 - 01 - 02),
        ))]);
        assert_eq!(touched.years(), [2024, 2025]);
    }

    #[test]
    fn test_years_deduplicated() {
        let touched = Touched::new(vec![
            DateEntry::Point(date!(2023 - 03 - 01)),
            DateEntry::Range(DateRange::new(
                date!(2022 - 11 - 01),
                date!(2024 - 01 - 05),
            )),
            DateEntry::Point(date!(2024 - 05 - 05)),
        ]);
        assert_eq!(touched.years(), [2022, 2023, 2024]);
    }

    #[test]
    fn test_dispatch_sends_ranges_then_years() {
        let recorder = Recorder::default();
        let touched = Touched::new(vec![DateEntry::Point(date!(2024 - 06 - 09))]);
        touched.dispatch(&recorder);
        assert_eq!(
            recorder.0.into_inner(),
            [
                Notification::Ranges(vec![DateRange::single(date!(2024 - 06 - 09))]),
                Notification::Years(vec![2024]),
            ]
        );
    }

    #[test]
    fn test_handle_delivers_over_channel() {
        let (handle, rx) = ServiceHandle::channel();
        Touched::default().dispatch(&handle);
        assert_eq!(rx.try_recv(), Ok(Notification::Ranges(Vec::new())));
        assert_eq!(rx.try_recv(), Ok(Notification::Years(Vec::new())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_handle_tolerates_dropped_receiver() {
        let (handle, rx) = ServiceHandle::channel();
        drop(rx);
        handle.update_annuals(vec![2024]);
    }
}
