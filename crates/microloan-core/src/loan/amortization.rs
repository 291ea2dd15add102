use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::loan::params::LoanParameters;
use crate::types::*;
use crate::MicroloanResult;

/// Headline figures for a loan quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTotals {
    pub total_interest: Money,
    pub total_amount: Money,
    pub daily_payment: Money,
}

/// A single day in the repayment schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Days,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Column sums over a schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub payments: Money,
    pub principal: Money,
    pub interest: Money,
}

/// Totals plus the full day-by-day schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub parameters: LoanParameters,
    pub totals: LoanTotals,
    pub schedule: Vec<ScheduleEntry>,
    pub schedule_totals: ScheduleTotals,
}

/// Round half away from zero to a whole unit.
fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(context: &str) -> MicroloanError {
    MicroloanError::CalculationOverflow {
        context: context.into(),
    }
}

fn to_money(value: Decimal, context: &str) -> MicroloanResult<Money> {
    value.to_i64().ok_or_else(|| overflow(context))
}

/// `round(principal * daily_rate)`, charged on every day of the term.
fn daily_interest(principal: Money, daily_rate: Rate) -> MicroloanResult<Money> {
    let raw = Decimal::from(principal)
        .checked_mul(daily_rate)
        .ok_or_else(|| overflow("daily interest"))?;
    to_money(round_whole(raw), "daily interest")
}

/// Compute total interest, total repayable and the nominal daily payment.
///
/// Interest is flat: `principal * daily_rate * term_days`, rounded once.
pub fn compute_totals(
    principal: Money,
    term_days: Days,
    daily_rate: Rate,
) -> MicroloanResult<LoanTotals> {
    LoanParameters::new(principal, term_days, daily_rate).validate()?;

    let term = Decimal::from(term_days);
    let interest = Decimal::from(principal)
        .checked_mul(daily_rate)
        .and_then(|v| v.checked_mul(term))
        .ok_or_else(|| overflow("total interest"))?;
    let total_interest = to_money(round_whole(interest), "total interest")?;

    let total_amount = principal
        .checked_add(total_interest)
        .ok_or_else(|| overflow("total amount"))?;

    let per_day = Decimal::from(total_amount)
        .checked_div(term)
        .ok_or_else(|| overflow("daily payment"))?;
    let daily_payment = to_money(round_whole(per_day), "daily payment")?;

    Ok(LoanTotals {
        total_interest,
        total_amount,
        daily_payment,
    })
}

/// Build the day-by-day schedule.
///
/// Every day but the last pays the nominal daily payment; the last day pays
/// whatever balance remains, which absorbs the rounding drift and forces the
/// closing balance to zero.
pub fn compute_schedule(
    principal: Money,
    term_days: Days,
    daily_rate: Rate,
) -> MicroloanResult<Vec<ScheduleEntry>> {
    let totals = compute_totals(principal, term_days, daily_rate)?;
    let interest_per_day = daily_interest(principal, daily_rate)?;

    let mut remaining = totals.total_amount;
    let mut schedule = Vec::new();

    for day in 1..=term_days {
        let payment = if day == term_days {
            remaining
        } else {
            totals.daily_payment
        };
        let interest_portion = interest_per_day.min(payment);
        let principal_portion = (payment - interest_portion).max(0);
        remaining = (remaining - payment).max(0);

        schedule.push(ScheduleEntry {
            day,
            payment,
            principal_portion,
            interest_portion,
            remaining_balance: remaining,
        });
    }

    Ok(schedule)
}

/// Sum the payment, principal and interest columns.
pub fn schedule_totals(schedule: &[ScheduleEntry]) -> ScheduleTotals {
    schedule
        .iter()
        .fold(ScheduleTotals::default(), |acc, entry| ScheduleTotals {
            payments: acc.payments + entry.payment,
            principal: acc.principal + entry.principal_portion,
            interest: acc.interest + entry.interest_portion,
        })
}

/// Totals and schedule for a parameter snapshot, wrapped in the standard envelope.
pub fn analyze_loan(
    params: &LoanParameters,
) -> MicroloanResult<ComputationOutput<LoanAnalysis>> {
    let totals = compute_totals(params.principal, params.term_days, params.daily_rate)?;
    let schedule = compute_schedule(params.principal, params.term_days, params.daily_rate)?;
    let mut warnings = params.range_warnings();

    let interest_per_day = daily_interest(params.principal, params.daily_rate)?;
    if interest_per_day > totals.daily_payment {
        warnings.push(format!(
            "Daily interest {interest_per_day} exceeds the daily payment {}; interest is capped at the payment",
            totals.daily_payment
        ));
    }

    if let Some(entry) = schedule
        .iter()
        .take(schedule.len().saturating_sub(1))
        .find(|e| e.remaining_balance == 0)
    {
        warnings.push(format!(
            "Nominal daily payments repay the total by day {}; the remaining days carry a zero balance",
            entry.day
        ));
    }

    let schedule_totals = schedule_totals(&schedule);
    let analysis = LoanAnalysis {
        parameters: *params,
        totals,
        schedule,
        schedule_totals,
    };

    Ok(with_metadata(
        "Flat daily-rate microloan schedule",
        &serde_json::json!({
            "principal": params.principal,
            "term_days": params.term_days,
            "daily_rate": params.daily_rate.to_string(),
            "interest_basis": "original principal, every day",
            "rounding": "half away from zero, whole units",
        }),
        warnings,
        analysis,
    ))
}
