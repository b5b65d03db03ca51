//! An index of disabled calendar days for calendar hosts.
//!
//! A [`DisabledPlugin`] keeps a [`DisabledSet`] of single days and day ranges
//! in minimal normalized form, answers "is this day disabled?" for each
//! rendered day, subtracts disabled days from caller-supplied date lists, and
//! after every change tells its host (through a [`PluginService`]) which
//! ranges and which years to redraw.
mod day;
mod entry;
mod notify;
mod plugin;
mod store;
mod style;
pub use crate::day::{days_of_year, days_through, AnnualMarkKey, DayStamp, DAY_MS};
pub use crate::entry::{DateEntry, DateRange, ParseEntryError};
pub use crate::notify::{Notification, PluginService, ServiceHandle, Touched};
pub use crate::plugin::{
    AttachPatch, ChangeDetail, ChangePatch, ChangeSource, DisabledPlugin, LoadDetail, PanelLookup,
    Plugin, TapOutcome, TapTarget, TrackDateResult, TrackYearResult,
};
pub use crate::store::DisabledSet;
pub use crate::style::{MarkStyle, Opacity, StyleOptions};
