use crate::day::DayStamp;
use crate::entry::{DateEntry, DateRange};
use crate::notify::Touched;
use std::mem;
use time::Date;

/// Inclusive run of disabled days
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Span {
    first: Date,
    last: Date,
}

impl Span {
    // `next` must not start before `self`
    fn reaches(&self, next: &Span) -> bool {
        DayStamp::of(next.first) <= DayStamp::of(self.last).next()
    }

    fn to_entry(self) -> DateEntry {
        DateRange::new(self.first, self.last).to_entry()
    }
}

impl From<DateEntry> for Span {
    fn from(entry: DateEntry) -> Span {
        let range = entry.span();
        Span {
            first: range.start(),
            last: range.end(),
        }
    }
}

/// The set of disabled days, kept in minimal normalized form.
///
/// Internally this is a list of day spans sorted by start date in which no two
/// spans overlap or are adjacent; a span covering one day is reported as a
/// [`DateEntry::Point`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DisabledSet {
    spans: Vec<Span>,
}

impl DisabledSet {
    pub fn new() -> DisabledSet {
        DisabledSet::default()
    }

    /// Build a normalized set from arbitrary, possibly overlapping entries
    pub fn from_entries<I: IntoIterator<Item = DateEntry>>(entries: I) -> DisabledSet {
        DisabledSet {
            spans: normalize(entries.into_iter().map(Span::from).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of entries in the normalized set
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// The entries of the set in chronological order
    pub fn iter(&self) -> impl Iterator<Item = DateEntry> + '_ {
        self.spans.iter().map(|s| s.to_entry())
    }

    /// Merge `entries` into the set, first emptying it if `clear` is true.
    ///
    /// Returns the normalized entries whose days need redrawing: just the new
    /// set when nothing was cleared, otherwise the new set together with
    /// everything that was removed.
    pub fn disable<I: IntoIterator<Item = DateEntry>>(&mut self, entries: I, clear: bool) -> Touched {
        let removed = if clear {
            mem::take(&mut self.spans)
        } else {
            Vec::new()
        };
        let mut merged = self.spans.clone();
        merged.extend(entries.into_iter().map(Span::from));
        self.spans = normalize(merged);
        let touched = if removed.is_empty() {
            self.spans.clone()
        } else {
            let mut all = removed;
            all.extend_from_slice(&self.spans);
            normalize(all)
        };
        Touched::new(touched.into_iter().map(Span::to_entry).collect())
    }

    pub fn is_date_disabled(&self, date: Date) -> bool {
        let after = self.spans.partition_point(|s| s.first <= date);
        after
            .checked_sub(1)
            .and_then(|i| self.spans.get(i))
            .is_some_and(|s| date <= s.last)
    }

    /// Remove the disabled days from `query`.
    ///
    /// Disabled points are dropped.  A range containing disabled days is
    /// replaced by the runs of enabled days it still contains (a one-day run
    /// becomes a point); a range with no disabled days is passed through as
    /// is.
    pub fn filter(&self, query: &[DateEntry]) -> Vec<DateEntry> {
        let mut out = Vec::with_capacity(query.len());
        for &entry in query {
            match entry {
                DateEntry::Point(date) => {
                    if !self.is_date_disabled(date) {
                        out.push(entry);
                    }
                }
                DateEntry::Range(range) => {
                    let hits = self.overlapping(range);
                    if hits.is_empty() {
                        out.push(entry);
                    } else {
                        let before = out.len();
                        subtract(range, hits, &mut out);
                        tracing::trace!(
                            %range,
                            pieces = out.len() - before,
                            "split range around disabled days"
                        );
                    }
                }
            }
        }
        out
    }

    // Spans sharing at least one day with `range`
    fn overlapping(&self, range: DateRange) -> &[Span] {
        let lo = self.spans.partition_point(|s| s.last < range.start());
        let hi = self.spans.partition_point(|s| s.first <= range.end());
        self.spans.get(lo..hi).unwrap_or_default()
    }
}

impl FromIterator<DateEntry> for DisabledSet {
    fn from_iter<I: IntoIterator<Item = DateEntry>>(iter: I) -> DisabledSet {
        DisabledSet::from_entries(iter)
    }
}

/// Sort spans by start and coalesce every pair that overlaps or touches
fn normalize(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_unstable_by_key(|s| s.first);
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if last.reaches(&span) => last.last = last.last.max(span.last),
            _ => merged.push(span),
        }
    }
    merged
}

// `hits` must be sorted and every element must overlap `range`
fn subtract(range: DateRange, hits: &[Span], out: &mut Vec<DateEntry>) {
    let mut cursor = Some(range.start());
    for hit in hits {
        if let Some(from) = cursor.filter(|&from| from < hit.first) {
            if let Some(to) = hit.first.previous_day() {
                out.push(DateRange::new(from, to).to_entry());
            }
        }
        cursor = hit.last.next_day();
    }
    if let Some(from) = cursor.filter(|&from| from <= range.end()) {
        out.push(DateRange::new(from, range.end()).to_entry());
    }
}
