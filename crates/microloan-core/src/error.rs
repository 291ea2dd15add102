use thiserror::Error;

#[derive(Debug, Error)]
pub enum MicroloanError {
    #[error("Invalid principal: {0} (must be a positive whole amount)")]
    InvalidPrincipal(i64),

    #[error("Invalid term: {0} days (must be at least 1 day)")]
    InvalidTerm(i64),

    #[error("Invalid daily rate: {0} (must not be negative)")]
    InvalidRate(String),

    #[error("Calculation overflow in {context}")]
    CalculationOverflow { context: String },

    #[error("Incomplete borrower data: missing {}", missing.join(", "))]
    IncompleteBorrowerData { missing: Vec<&'static str> },

    #[error("Layout overflow: {0}")]
    LayoutOverflow(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Invalid config: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Coarse classification used by callers to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad loan parameters; reported to the caller, never clamped.
    Input,
    /// Borrower data failed the mandatory-field gate; shown to the user.
    Validation,
    /// Content could not be placed on a page.
    Layout,
    /// Rasterization or serialization of the document failed.
    Render,
    /// Delivery of a finished artifact failed.
    Export,
}

impl MicroloanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MicroloanError::InvalidPrincipal(_)
            | MicroloanError::InvalidTerm(_)
            | MicroloanError::InvalidRate(_)
            | MicroloanError::CalculationOverflow { .. }
            | MicroloanError::InvalidConfig { .. } => ErrorCategory::Input,
            MicroloanError::IncompleteBorrowerData { .. } => ErrorCategory::Validation,
            MicroloanError::LayoutOverflow(_) => ErrorCategory::Layout,
            MicroloanError::RenderFailed(_) | MicroloanError::SerializationError(_) => {
                ErrorCategory::Render
            }
            MicroloanError::ExportFailed(_) => ErrorCategory::Export,
        }
    }

    /// True when the message is meant for the end user rather than the log.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Validation
        )
    }
}

impl From<serde_json::Error> for MicroloanError {
    fn from(e: serde_json::Error) -> Self {
        MicroloanError::SerializationError(e.to_string())
    }
}
