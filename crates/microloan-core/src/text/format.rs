use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::text::words::{number_to_words, plural_form, MAX_SPELLED};
use crate::types::{Days, Money, Rate};

/// Group separator used by the ru-RU locale.
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// `80000` -> `80 000` (no-break space between groups).
pub fn format_amount(amount: Money) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Table cell form: `2 667 ₽`.
pub fn format_rubles(amount: Money) -> String {
    format!("{} ₽", format_amount(amount))
}

/// Prose form with agreement: `80 000 рублей`, `1 рубль`.
pub fn amount_phrase(amount: Money) -> String {
    format!(
        "{} {}",
        format_amount(amount),
        plural_form(amount, "рубль", "рубля", "рублей")
    )
}

/// `30 дней`, `21 день`, `3 дня`.
pub fn days_phrase(days: Days) -> String {
    format!("{days} {}", plural_form(days, "день", "дня", "дней"))
}

/// ru-RU short date: `17.05.2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// `0.001` -> `0,1%` (decimal comma).
pub fn format_percent(rate: Rate) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{}%", pct.to_string().replace('.', ","))
}

/// `0.02` -> `2% (два процента)`; fractional percentages stay numeric: `0,1%`.
pub fn percent_phrase(rate: Rate) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).normalize();
    let numeral = format_percent(rate);

    match pct.to_i64() {
        Some(whole) if pct.fract().is_zero() && (0..=MAX_SPELLED).contains(&whole) => format!(
            "{numeral} ({} {})",
            number_to_words(whole),
            plural_form(whole, "процент", "процента", "процентов")
        ),
        _ => numeral,
    }
}
