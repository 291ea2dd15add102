//! Russian-language text helpers shared by the contract and schedule renderers.

pub mod format;
pub mod words;

pub use format::{
    amount_phrase, days_phrase, format_amount, format_date, format_percent, format_rubles,
    percent_phrase,
};
pub use words::{number_to_words, plural_form};
