use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open date range `[start_date, end_date)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<Self> {
        if end_date <= start_date {
            return Err(AppError::validation_with_details(
                "period end must be after its start",
                serde_json::json!({
                    "startDate": start_date.to_string(),
                    "endDate": end_date.to_string(),
                }),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The calendar month containing `date`.
    pub fn month_containing(date: NaiveDate) -> AppResult<Self> {
        let start_date = date
            .with_day(1)
            .ok_or_else(|| AppError::other(format!("cannot resolve month start for {date}")))?;
        let end_date = start_date
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::other(format!("cannot resolve month end for {date}")))?;
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Explicit bounds win only when both are present, otherwise the month
    /// containing `today` is used.
    pub fn resolve(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> AppResult<Self> {
        let start = start.map(str::trim).filter(|value| !value.is_empty());
        let end = end.map(str::trim).filter(|value| !value.is_empty());

        match (start, end) {
            (Some(start), Some(end)) => Self::new(parse_date(start)?, parse_date(end)?),
            _ => Self::month_containing(today),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }

    pub fn start_key(&self) -> String {
        self.start_date.format(DATE_FORMAT).to_string()
    }

    pub fn end_key(&self) -> String {
        self.end_date.format(DATE_FORMAT).to_string()
    }
}

pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|err| {
        AppError::validation_with_source(format!("invalid date `{raw}`, expected YYYY-MM-DD"), err)
    })
}
