pub mod documents;
pub mod loan;
