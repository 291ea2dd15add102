pub mod borrower;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod layout;
pub mod loan;
pub mod raster;
pub mod render;
pub mod text;
pub mod types;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use borrower::BorrowerData;
pub use config::DocumentConfig;
pub use error::{ErrorCategory, MicroloanError};
pub use export::{
    Artifact, ArtifactExporter, ContractRequest, DirectoryTarget, DocumentType, DownloadTarget,
    ExportFormat,
};
pub use loan::{analyze_loan, compute_schedule, compute_totals, LoanParameters};
pub use types::*;

/// Standard result type for all microloan operations
pub type MicroloanResult<T> = Result<T, MicroloanError>;
