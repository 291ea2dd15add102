use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::MicroloanResult;

/// Personal details the borrower types into the contract form. The core
/// treats every field as an opaque substitution value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerData {
    pub full_name: String,
    pub birth_date: String,
    pub passport_series: String,
    pub passport_number: String,
    pub address: String,
    pub phone: String,
}

impl BorrowerData {
    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("full_name", &self.full_name),
            ("birth_date", &self.birth_date),
            ("passport_series", &self.passport_series),
            ("passport_number", &self.passport_number),
            ("address", &self.address),
            ("phone", &self.phone),
        ]
    }

    /// Names of mandatory fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Gate run before any contract content is produced.
    pub fn validate(&self) -> MicroloanResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MicroloanError::IncompleteBorrowerData { missing })
        }
    }
}
