//! In-memory grouping and reduction over already-fetched record sets.
//!
//! Everything here is pure: records in, summaries out. Percentages go
//! through [`rate`], which returns 0 on an empty denominator instead of
//! NaN or infinity, and cross-entity joins go through [`correlate`] so a
//! dangling reference skips the record instead of poisoning the report.

use bson::oid::ObjectId;
use chrono::NaiveDate;
use scolara_db::models::AttendanceStatus;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Half-up rounding to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Guarded percentage: `numerator / denominator * 100`, rounded to two
/// decimals, 0 when the denominator is zero or negative.
pub fn rate(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        round2(numerator / denominator * 100.0)
    } else {
        0.0
    }
}

/// Report-card banding used for per-student results.
pub fn grade_letter(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 90.0 => "A+",
        p if p >= 80.0 => "A",
        p if p >= 70.0 => "B+",
        p if p >= 60.0 => "B",
        p if p >= 50.0 => "C+",
        p if p >= 40.0 => "C",
        p if p >= 33.0 => "D",
        _ => "F",
    }
}

/// Coarser five-band scheme used for grade-distribution charts. Kept
/// separate from [`grade_letter`]; the two bandings serve different call
/// sites and must not be unified.
pub fn distribution_letter(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 90.0 => "A",
        p if p >= 80.0 => "B",
        p if p >= 70.0 => "C",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

/// Per-day attendance tally; one bucket per calendar date.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AttendanceTally {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
}

impl AttendanceTally {
    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.present + self.absent + self.late + self.excused
    }

    /// Present / total, guarded.
    pub fn rate(&self) -> f64 {
        rate(self.present as f64, self.total() as f64)
    }

    pub fn merge(&mut self, other: &AttendanceTally) {
        self.present += other.present;
        self.absent += other.absent;
        self.late += other.late;
        self.excused += other.excused;
    }
}

/// Group records into per-day buckets; time-of-day is truncated by the
/// caller-supplied date accessor. BTreeMap keeps the calendar ordered.
pub fn group_by_day<T>(
    records: &[T],
    date_fn: impl Fn(&T) -> NaiveDate,
    status_fn: impl Fn(&T) -> AttendanceStatus,
) -> BTreeMap<NaiveDate, AttendanceTally> {
    let mut days: BTreeMap<NaiveDate, AttendanceTally> = BTreeMap::new();
    for record in records {
        days.entry(date_fn(record)).or_default().add(status_fn(record));
    }
    days
}

/// Sum/count accumulator for categorical grouping.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct SumCount {
    pub sum: f64,
    pub count: u64,
}

impl SumCount {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count > 0 {
            round2(self.sum / self.count as f64)
        } else {
            0.0
        }
    }
}

/// Group records by an arbitrary category key, accumulating a numeric
/// value per category.
pub fn group_by_category<T, K: Ord>(
    records: &[T],
    key_fn: impl Fn(&T) -> K,
    value_fn: impl Fn(&T) -> f64,
) -> BTreeMap<K, SumCount> {
    let mut categories: BTreeMap<K, SumCount> = BTreeMap::new();
    for record in records {
        categories.entry(key_fn(record)).or_default().add(value_fn(record));
    }
    categories
}

/// Stable descending sort by `sort_key`, truncated to `n`. Ties keep
/// their input order, so repeated runs over identical data produce
/// identical output.
pub fn top_n<T>(mut items: Vec<T>, sort_key: impl Fn(&T) -> f64, n: usize) -> Vec<T> {
    items.sort_by(|a, b| {
        sort_key(b)
            .partial_cmp(&sort_key(a))
            .unwrap_or(Ordering::Equal)
    });
    items.truncate(n);
    items
}

/// Build an id -> item lookup for batch joining, replacing per-record
/// find_by_id round trips.
pub fn correlate<T>(items: Vec<T>, id_fn: impl Fn(&T) -> Option<ObjectId>) -> HashMap<ObjectId, T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(id) = id_fn(&item) {
            map.insert(id, item);
        }
    }
    map
}

/// Join bookkeeping: how many records resolved their cross-reference and
/// how many were skipped because the referenced entity is gone. Skips are
/// surfaced in report envelopes instead of crashing the report.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct JoinStats {
    pub joined: u64,
    pub skipped: u64,
}

impl JoinStats {
    pub fn hit(&mut self) {
        self.joined += 1;
    }

    pub fn miss(&mut self) {
        self.skipped += 1;
    }
}

/// Calendar date of a bson timestamp, UTC.
pub fn date_of(dt: bson::DateTime) -> NaiveDate {
    dt.to_chrono().date_naive()
}
