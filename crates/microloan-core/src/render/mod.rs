//! Turns loan data into document blocks.

pub mod contract;
pub mod schedule;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::MicroloanError;
use crate::types::Days;
use crate::MicroloanResult;

pub use contract::render_contract;
pub use schedule::render_schedule_summary;

/// Contract numbers run 0..=9999 and are derived from the issue time.
pub fn contract_number(issued_at: NaiveDateTime) -> u32 {
    issued_at.and_utc().timestamp().rem_euclid(10_000) as u32
}

/// Last day of the loan: `contract_date` plus `term_days` calendar days.
pub fn return_date(contract_date: NaiveDate, term_days: Days) -> MicroloanResult<NaiveDate> {
    let days = u64::try_from(term_days).map_err(|_| MicroloanError::InvalidTerm(term_days))?;
    contract_date
        .checked_add_days(chrono::Days::new(days))
        .ok_or_else(|| MicroloanError::CalculationOverflow {
            context: format!("return date {contract_date} + {term_days} days"),
        })
}

/// Blank for a requisite that is filled in by hand.
pub(crate) const BLANK: &str = "______________________________";
