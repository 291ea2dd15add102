use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::types::{Days, Money, Rate};
use crate::MicroloanResult;

pub const DEFAULT_PRINCIPAL: Money = 50_000;
pub const DEFAULT_TERM_DAYS: Days = 30;
pub const DEFAULT_DAILY_RATE: Rate = dec!(0.02);

/// Range offered by the loan form. The engine itself accepts any positive value.
pub const PRINCIPAL_MIN: Money = 10_000;
pub const PRINCIPAL_MAX: Money = 200_000;
pub const PRINCIPAL_STEP: Money = 5_000;
pub const TERM_DAYS_MIN: Days = 7;
pub const TERM_DAYS_MAX: Days = 90;

fn default_daily_rate() -> Rate {
    DEFAULT_DAILY_RATE
}

/// Immutable snapshot of the loan being quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    pub term_days: Days,
    #[serde(default = "default_daily_rate")]
    pub daily_rate: Rate,
}

impl Default for LoanParameters {
    fn default() -> Self {
        Self {
            principal: DEFAULT_PRINCIPAL,
            term_days: DEFAULT_TERM_DAYS,
            daily_rate: DEFAULT_DAILY_RATE,
        }
    }
}

impl LoanParameters {
    pub fn new(principal: Money, term_days: Days, daily_rate: Rate) -> Self {
        Self {
            principal,
            term_days,
            daily_rate,
        }
    }

    /// Reject values the engine cannot price. Checked in the order term,
    /// principal, rate so the first reported error is deterministic.
    pub fn validate(&self) -> MicroloanResult<()> {
        if self.term_days <= 0 {
            return Err(MicroloanError::InvalidTerm(self.term_days));
        }
        if self.principal <= 0 {
            return Err(MicroloanError::InvalidPrincipal(self.principal));
        }
        if self.daily_rate < Decimal::ZERO {
            return Err(MicroloanError::InvalidRate(self.daily_rate.to_string()));
        }
        Ok(())
    }

    /// Notes for values the loan form would never produce.
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(PRINCIPAL_MIN..=PRINCIPAL_MAX).contains(&self.principal) {
            warnings.push(format!(
                "Principal {} is outside the offered range {PRINCIPAL_MIN}..={PRINCIPAL_MAX}",
                self.principal
            ));
        } else if self.principal % PRINCIPAL_STEP != 0 {
            warnings.push(format!(
                "Principal {} is not a multiple of the {PRINCIPAL_STEP} step",
                self.principal
            ));
        }
        if !(TERM_DAYS_MIN..=TERM_DAYS_MAX).contains(&self.term_days) {
            warnings.push(format!(
                "Term of {} days is outside the offered range {TERM_DAYS_MIN}..={TERM_DAYS_MAX}",
                self.term_days
            ));
        }
        warnings
    }
}
