use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::expense::Expense;

pub const TOP_CATEGORY_COUNT: usize = 5;

/// A half-open interval of time, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The calendar day containing `now`.
    pub fn day(now: NaiveDateTime) -> Self {
        let today = now.date();

        Self {
            start: start_of(today),
            end: start_of(today + Days::new(1)),
        }
    }

    /// The Monday-aligned week containing `now`.
    pub fn week(now: NaiveDateTime) -> Self {
        let today = now.date();
        let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));

        Self {
            start: start_of(monday),
            end: start_of(monday + Days::new(7)),
        }
    }

    /// The calendar month containing `now`.
    pub fn month(now: NaiveDateTime) -> Self {
        let today = now.date();
        let first_of_month = today - Days::new(u64::from(today.day0()));

        // Every month is shorter than 32 days, so this always lands in the next month
        let into_next_month = first_of_month + Days::new(32);
        let first_of_next_month =
            into_next_month - Days::new(u64::from(into_next_month.day0()));

        Self {
            start: start_of(first_of_month),
            end: start_of(first_of_next_month),
        }
    }

    pub fn for_period(period: SummaryPeriod, now: NaiveDateTime) -> Self {
        match period {
            SummaryPeriod::Day => Self::day(now),
            SummaryPeriod::Week => Self::week(now),
            SummaryPeriod::Month => Self::month(now),
        }
    }

    #[inline]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

#[inline]
fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryPeriod {
    Day,
    Week,
    Month,
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryPeriod::Day => write!(f, "day"),
            SummaryPeriod::Week => write!(f, "week"),
            SummaryPeriod::Month => write!(f, "month"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_amount: f64,
    pub expense_count: i64,
    pub top_categories: Vec<CategorySpending>,
}

impl SpendingSummary {
    pub fn empty() -> Self {
        Self {
            total_amount: 0.0,
            expense_count: 0,
            top_categories: Vec::new(),
        }
    }
}

/// Totals the expenses dated within `range` and ranks their categories by spend.
///
/// Categories with equal totals keep the order in which they were first seen.
pub fn summarize<'a, I>(range: &DateRange, expenses: I) -> SpendingSummary
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut total_amount = 0.0;
    let mut expense_count = 0;

    let mut groups: Vec<CategorySpending> = Vec::new();
    let mut group_positions: HashMap<&str, usize> = HashMap::new();

    for expense in expenses.into_iter().filter(|e| range.contains(e.date)) {
        total_amount += expense.amount;
        expense_count += 1;

        match group_positions.get(expense.category.as_str()) {
            Some(&pos) => {
                groups[pos].amount += expense.amount;
                groups[pos].count += 1;
            }
            None => {
                group_positions.insert(expense.category.as_str(), groups.len());
                groups.push(CategorySpending {
                    category: expense.category.clone(),
                    amount: expense.amount,
                    count: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    groups.truncate(TOP_CATEGORY_COUNT);

    SpendingSummary {
        total_amount,
        expense_count,
        top_categories: groups,
    }
}
