use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A year-month identifier used to build archive filenames (`YYYYMM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodToken {
    pub year: i32,
    pub month: u32,
}

impl PeriodToken {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

/// Enumerates every month from January of `start_year` through the month of `today`,
/// inclusive, in chronological order.
///
/// Returns an empty sequence when `start_year` lies after the current year.
pub fn enumerate_periods(start_year: i32, today: NaiveDate) -> Vec<PeriodToken> {
    let (current_year, current_month) = (today.year(), today.month());
    let mut periods = Vec::new();

    for year in start_year..=current_year {
        let last_month = if year == current_year {
            current_month
        } else {
            12
        };
        periods.extend((1..=last_month).map(|month| PeriodToken::new(year, month)));
    }

    periods
}
