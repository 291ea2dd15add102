use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::layout::geometry::{Margins, PageSize, Typography};
use crate::types::Rate;
use crate::MicroloanResult;

/// Everything about a generated document that is not loan data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DocumentConfig {
    pub page: PageSize,
    pub margins: Margins,
    pub typography: Typography,
    pub lender: LenderDetails,
    pub terms: ContractTerms,
}

/// Lender identity and requisites printed in the contract.
///
/// Unset requisites are printed as blanks to be filled in by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LenderDetails {
    pub short_name: String,
    pub full_name: String,
    pub city: String,
    /// Trading name shown in the schedule footer.
    pub brand: String,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub ogrn: Option<String>,
    pub legal_address: Option<String>,
    pub actual_address: Option<String>,
    pub account: Option<String>,
    pub bank_name: Option<String>,
    pub bik: Option<String>,
    pub corr_account: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Default for LenderDetails {
    fn default() -> Self {
        Self {
            short_name: "ООО \"ЭКОРРА ФИНАНСОВЫЙ ЦЕНТР\"".into(),
            full_name: "Общество с ограниченной ответственностью \"ЭКОРРА ФИНАНСОВЫЙ ЦЕНТР\""
                .into(),
            city: "Москва".into(),
            brand: "МикроФинанс".into(),
            inn: None,
            kpp: None,
            ogrn: None,
            legal_address: None,
            actual_address: None,
            account: None,
            bank_name: None,
            bik: None,
            corr_account: None,
            phone: None,
            email: None,
        }
    }
}

/// Penalty terms of clause 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractTerms {
    /// Late-payment penalty per day, as a fraction of the principal.
    pub penalty_rate_per_day: Rate,
    /// Ceiling on accumulated penalties, as a fraction of the principal.
    pub penalty_cap: Rate,
}

impl Default for ContractTerms {
    fn default() -> Self {
        Self {
            penalty_rate_per_day: dec!(0.001),
            penalty_cap: Decimal::ONE,
        }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> MicroloanResult<()> {
        let dims = [
            ("page.width", self.page.width),
            ("page.height", self.page.height),
        ];
        for (field, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        let margins = [
            ("margins.top", self.margins.top),
            ("margins.bottom", self.margins.bottom),
            ("margins.left", self.margins.left),
            ("margins.right", self.margins.right),
        ];
        for (field, value) in margins {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }
        if self.margins.left + self.margins.right >= self.page.width
            || self.margins.top + self.margins.bottom >= self.page.height
        {
            return Err(invalid("margins", "leave no printable area".to_string()));
        }
        self.typography.validate()?;

        if self.lender.short_name.trim().is_empty() {
            return Err(invalid("lender.short_name", "must not be empty".to_string()));
        }
        if self.terms.penalty_rate_per_day < Decimal::ZERO {
            return Err(invalid(
                "terms.penalty_rate_per_day",
                "must not be negative".to_string(),
            ));
        }
        if self.terms.penalty_cap < Decimal::ZERO {
            return Err(invalid("terms.penalty_cap", "must not be negative".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> MicroloanError {
    MicroloanError::InvalidConfig {
        field: field.to_string(),
        reason,
    }
}
