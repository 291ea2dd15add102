use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use microloan_core::loan::params::{DEFAULT_DAILY_RATE, DEFAULT_PRINCIPAL, DEFAULT_TERM_DAYS};
use microloan_core::{analyze_loan, Days, LoanParameters, Money};

use crate::input;

/// Loan parameters, shared by every command
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount lent, in whole roubles
    #[arg(long, short)]
    pub principal: Option<Money>,

    /// Term in days
    #[arg(long, short, alias = "days")]
    pub term_days: Option<Days>,

    /// Daily interest rate as a decimal (0.02 = 2% per day)
    #[arg(long, short = 'r', alias = "rate")]
    pub daily_rate: Option<Decimal>,
}

impl LoanArgs {
    /// Input file, then piped stdin, then flags. Missing flags take the
    /// loan form's defaults.
    pub fn resolve(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(params) = input::stdin::read_stdin()? {
            return Ok(params);
        }
        Ok(self.from_flags())
    }

    fn from_flags(&self) -> LoanParameters {
        LoanParameters::new(
            self.principal.unwrap_or(DEFAULT_PRINCIPAL),
            self.term_days.unwrap_or(DEFAULT_TERM_DAYS),
            self.daily_rate.unwrap_or(DEFAULT_DAILY_RATE),
        )
    }
}

pub fn run_totals(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.resolve()?;
    let analysis = analyze_loan(&params)?;
    let mut value = serde_json::to_value(&analysis)?;
    value["result"] = serde_json::to_value(analysis.result.totals)?;
    Ok(value)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.resolve()?;
    let analysis = analyze_loan(&params)?;
    Ok(serde_json::to_value(analysis)?)
}
