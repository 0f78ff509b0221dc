//! The bucketing engine: turns a flat list of spending records into an ordered sequence of
//! time-period buckets ready for charting.
//!
//! The engine is pure. It never fails; inputs it cannot place are dropped rather than reported as
//! errors, and `BucketReport::unassigned` tells a caller how many records were dropped.
//!
//! The pipeline has three steps, each available on its own:
//! - [`enumerate_periods`] lists the canonical period labels for a granularity.
//! - [`assign_period`] finds the period a record belongs to, if any.
//! - [`aggregate`] folds assigned records into zero-seeded buckets.
//!
//! [`bucket`] runs all three.

pub mod keys;

use crate::model::{Amount, Category, Granularity, Record, ReferencePeriod};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Number of buckets in the weekly scheme. This is a fixed approximation of calendar weeks: a
/// trailing partial fifth week in the reference month is not represented.
pub const WEEKS_PER_MONTH: u64 = 4;

/// The ordered, duplicate-free period labels for one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Periods {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Periods {
    fn from_labels(labels: Vec<String>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(ix, label)| (label.clone(), ix))
            .collect();
        Self { labels, index }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The position of `label`, if it is one of the enumerated periods.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }
}

/// Where a record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Index into the period list.
    Period(usize),
    /// The record falls outside every enumerated period.
    Unassigned,
}

impl Assignment {
    pub fn index(&self) -> Option<usize> {
        match self {
            Assignment::Period(ix) => Some(*ix),
            Assignment::Unassigned => None,
        }
    }
}

impl From<Option<usize>> for Assignment {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Assignment::Unassigned, Assignment::Period)
    }
}

/// The totals held by one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Aggregate {
    /// Sum and number of all records in the period.
    Total { amount: Amount, count: usize },
    /// Sum per known category, in category-list order. Every known category has a slot, even
    /// when it is zero.
    ByCategory { categories: Vec<CategoryAmount> },
}

impl Aggregate {
    /// The sum of everything in this bucket.
    pub fn amount(&self) -> Amount {
        match self {
            Aggregate::Total { amount, .. } => *amount,
            Aggregate::ByCategory { categories } => {
                categories.iter().map(CategoryAmount::amount).sum()
            }
        }
    }

    /// The slot for `category`. `None` for scalar buckets and unknown categories.
    pub fn category_amount(&self, category: &str) -> Option<Amount> {
        match self {
            Aggregate::Total { .. } => None,
            Aggregate::ByCategory { categories } => categories
                .iter()
                .find(|slot| slot.category == category)
                .map(CategoryAmount::amount),
        }
    }
}

/// One category's share of a grouped bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    category: String,
    amount: Amount,
}

impl CategoryAmount {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// One period's aggregated totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    period: String,
    #[serde(flatten)]
    aggregate: Aggregate,
}

impl Bucket {
    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }
}

/// Lists the period labels for `granularity`, in chronological order.
///
/// `AllTime` and `Monthly` cover every month from the earliest record through the later of the
/// latest record and `today`. `Daily` covers each day of the reference month, and `Weekly` covers
/// four 7-day windows starting on its first day. Without a reference period, `Daily` and `Weekly`
/// produce no periods.
pub fn enumerate_periods(
    records: &[Record],
    granularity: Granularity,
    reference: Option<ReferencePeriod>,
    today: NaiveDate,
) -> Periods {
    let labels = match granularity {
        Granularity::AllTime | Granularity::Monthly => month_labels(records, today),
        Granularity::Daily => match reference {
            Some(reference) => day_labels(reference),
            None => Vec::new(),
        },
        Granularity::Weekly => match reference {
            Some(reference) => week_labels(reference),
            None => Vec::new(),
        },
    };
    Periods::from_labels(labels)
}

fn month_labels(records: &[Record], today: NaiveDate) -> Vec<String> {
    let first = records.iter().map(Record::date).min().unwrap_or(today);
    let last = records
        .iter()
        .map(Record::date)
        .max()
        .unwrap_or(today)
        .max(today);

    let end = keys::month_start(last);
    let mut labels = Vec::new();
    let mut cur = Some(keys::month_start(first));
    while let Some(month) = cur.filter(|m| *m <= end) {
        labels.push(keys::month_key(month));
        cur = keys::add_months(month, 1);
    }
    labels
}

fn day_labels(reference: ReferencePeriod) -> Vec<String> {
    let first = reference.first_day();
    (0..keys::days_in_month(first))
        .filter_map(|offset| first.checked_add_days(Days::new(u64::from(offset))))
        .map(keys::day_key)
        .collect()
}

fn week_labels(reference: ReferencePeriod) -> Vec<String> {
    let first = reference.first_day();
    (0..WEEKS_PER_MONTH)
        .filter_map(|week| first.checked_add_days(Days::new(week * 7)))
        .map(keys::week_key)
        .collect()
}

/// Finds the period `record` belongs to.
///
/// For `Daily` and `Weekly`, only records in the reference month are considered. A weekly record
/// whose Sunday-start week begins in the previous month is placed in the first week. Records in a
/// fifth calendar week of the month match none of the four weekly periods and are unassigned.
pub fn assign_period(
    record: &Record,
    granularity: Granularity,
    periods: &Periods,
    reference: Option<ReferencePeriod>,
) -> Assignment {
    let date = record.date();
    let key = match granularity {
        Granularity::AllTime | Granularity::Monthly => Some(keys::month_key(date)),
        Granularity::Daily => reference
            .filter(|r| r.contains(date))
            .map(|_| keys::day_key(date)),
        Granularity::Weekly => reference.filter(|r| r.contains(date)).map(|r| {
            let mut start = keys::week_start(date);
            if !r.contains(start) {
                start = r.first_day();
            }
            keys::week_key(start)
        }),
    };
    key.and_then(|k| periods.position(&k)).into()
}

/// Folds `records` into one bucket per period.
///
/// `assignments` pairs with `records` by position. With `group_by_category` set and a non-empty
/// `categories` list, each bucket holds a zero-seeded slot per category, and records whose category
/// is not in the list are left out. Otherwise each bucket holds a scalar total and count.
pub fn aggregate(
    records: &[Record],
    periods: &Periods,
    assignments: &[Assignment],
    group_by_category: bool,
    categories: &[Category],
) -> Vec<Bucket> {
    let grouped = group_by_category && !categories.is_empty();
    let mut buckets: Vec<Bucket> = periods
        .labels()
        .iter()
        .map(|period| Bucket {
            period: period.clone(),
            aggregate: if grouped {
                Aggregate::ByCategory {
                    categories: categories
                        .iter()
                        .map(|c| CategoryAmount {
                            category: c.name().to_string(),
                            amount: Amount::ZERO,
                        })
                        .collect(),
                }
            } else {
                Aggregate::Total {
                    amount: Amount::ZERO,
                    count: 0,
                }
            },
        })
        .collect();

    for (record, assignment) in records.iter().zip(assignments) {
        let Some(bucket) = assignment.index().and_then(|ix| buckets.get_mut(ix)) else {
            continue;
        };
        match &mut bucket.aggregate {
            Aggregate::Total { amount, count } => {
                *amount += record.amount();
                *count += 1;
            }
            Aggregate::ByCategory { categories } => {
                if let Some(slot) = categories
                    .iter_mut()
                    .find(|slot| slot.category == record.category())
                {
                    slot.amount += record.amount();
                }
            }
        }
    }
    buckets
}

/// The inputs of a full bucketing run.
#[derive(Debug, Clone, Copy)]
pub struct BucketRequest<'a> {
    records: &'a [Record],
    granularity: Granularity,
    reference: Option<ReferencePeriod>,
    group_by_category: bool,
    categories: &'a [Category],
    today: NaiveDate,
}

impl<'a> BucketRequest<'a> {
    /// A scalar request with no reference period.
    pub fn new(records: &'a [Record], granularity: Granularity, today: NaiveDate) -> Self {
        Self {
            records,
            granularity,
            reference: None,
            group_by_category: false,
            categories: &[],
            today,
        }
    }

    pub fn reference(mut self, reference: ReferencePeriod) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Requests per-category buckets over `categories`.
    pub fn grouped(mut self, categories: &'a [Category]) -> Self {
        self.group_by_category = true;
        self.categories = categories;
        self
    }
}

/// The result of a full bucketing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketReport {
    buckets: Vec<Bucket>,
    /// Records that did not land in any period.
    unassigned: usize,
}

impl BucketReport {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// The sum of every bucket.
    pub fn total(&self) -> Amount {
        self.buckets.iter().map(|b| b.aggregate().amount()).sum()
    }
}

/// Runs enumeration, assignment and aggregation for `request`.
pub fn bucket(request: &BucketRequest<'_>) -> BucketReport {
    let periods = enumerate_periods(
        request.records,
        request.granularity,
        request.reference,
        request.today,
    );
    let assignments: Vec<Assignment> = request
        .records
        .iter()
        .map(|r| assign_period(r, request.granularity, &periods, request.reference))
        .collect();
    let unassigned = assignments
        .iter()
        .filter(|a| **a == Assignment::Unassigned)
        .count();
    debug!(
        "Bucketed {} records into {} {} periods ({unassigned} unassigned)",
        request.records.len(),
        periods.len(),
        request.granularity
    );
    let buckets = aggregate(
        request.records,
        &periods,
        &assignments,
        request.group_by_category,
        request.categories,
    );
    BucketReport {
        buckets,
        unassigned,
    }
}
