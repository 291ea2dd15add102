pub mod amortization;
pub mod params;

pub use amortization::{
    analyze_loan, compute_schedule, compute_totals, schedule_totals, LoanAnalysis, LoanTotals,
    ScheduleEntry, ScheduleTotals,
};
pub use params::LoanParameters;
