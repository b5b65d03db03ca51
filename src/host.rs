use daymask::{AnnualMarkKey, DateRange, MarkStyle, Notification, Plugin, ServiceHandle};
use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;

pub(crate) type AnnualMarks = BTreeMap<AnnualMarkKey, MarkStyle>;

/// The calendar side of the plugin contract: owns the plugin, receives its
/// redraw requests, and caches each year's annual marks until the plugin says
/// the year changed.
#[derive(Debug)]
pub(crate) struct Host<P> {
    plugin: P,
    notifications: Receiver<Notification>,
    annuals: BTreeMap<i32, AnnualMarks>,
    redrawn: Vec<DateRange>,
    refreshed_years: Vec<i32>,
}

impl<P: Plugin> Host<P> {
    pub(crate) fn new(mut plugin: P) -> Host<P> {
        let (handle, notifications) = ServiceHandle::channel();
        plugin.initialize(Box::new(handle));
        tracing::debug!(plugin = plugin.key(), "plugin initialized");
        Host {
            plugin,
            notifications,
            annuals: BTreeMap::new(),
            redrawn: Vec::new(),
            refreshed_years: Vec::new(),
        }
    }

    pub(crate) fn plugin(&self) -> &P {
        &self.plugin
    }

    pub(crate) fn plugin_mut(&mut self) -> &mut P {
        &mut self.plugin
    }

    /// Apply every redraw request the plugin has issued since the last call.
    ///
    /// Only years already in the marks cache are recomputed; any other year
    /// is computed on first display anyway.
    pub(crate) fn sync(&mut self) {
        self.redrawn.clear();
        self.refreshed_years.clear();
        for notification in self.notifications.try_iter() {
            match notification {
                Notification::Ranges(ranges) => self.redrawn.extend(ranges),
                Notification::Years(years) => {
                    for year in years {
                        if let Some(marks) = self.annuals.get_mut(&year) {
                            *marks = marks_for(&self.plugin, year);
                            self.refreshed_years.push(year);
                        }
                    }
                }
            }
        }
        tracing::debug!(
            ranges = self.redrawn.len(),
            years = ?self.refreshed_years,
            "applied redraw requests"
        );
    }

    /// Ranges named by the redraw requests handled in the last [`Host::sync`]
    pub(crate) fn redrawn(&self) -> &[DateRange] {
        &self.redrawn
    }

    /// Cached years recomputed in the last [`Host::sync`]
    pub(crate) fn refreshed_years(&self) -> &[i32] {
        &self.refreshed_years
    }

    pub(crate) fn annual_marks(&mut self, year: i32) -> &AnnualMarks {
        let plugin = &self.plugin;
        self.annuals
            .entry(year)
            .or_insert_with(|| marks_for(plugin, year))
    }
}

fn marks_for<P: Plugin>(plugin: &P, year: i32) -> AnnualMarks {
    plugin
        .track_year(year)
        .map(|result| result.marks)
        .unwrap_or_default()
}
