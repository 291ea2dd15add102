use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::DocumentConfig;
use crate::document::block::Block;
use crate::loan::{schedule_totals, LoanParameters, LoanTotals, ScheduleEntry};
use crate::text::{days_phrase, format_date, format_rubles, percent_phrase};

pub const SCHEDULE_COLUMNS: [&str; 5] = ["День", "Платёж", "Основной долг", "Проценты", "Остаток"];

/// Build the payment schedule document: header, summary, day table, totals.
pub fn render_schedule_summary(
    params: &LoanParameters,
    totals: &LoanTotals,
    schedule: &[ScheduleEntry],
    issued_on: NaiveDate,
    config: &DocumentConfig,
) -> Vec<Block> {
    let lender = &config.lender;
    let paid = schedule_totals(schedule);

    let mut blocks = vec![
        Block::title("ГРАФИК ПЛАТЕЖЕЙ ПО ЗАЙМУ"),
        Block::centered(lender.short_name.as_str()),
        Block::centered(format!("Дата формирования: {}", format_date(issued_on))),
        Block::section("ПАРАМЕТРЫ ЗАЙМА"),
        Block::labeled("Сумма займа:", format_rubles(params.principal)),
        Block::labeled("Общая сумма:", format_rubles(totals.total_amount)),
        Block::labeled("Проценты:", format_rubles(totals.total_interest)),
        Block::labeled("Срок:", days_phrase(params.term_days)),
        Block::labeled(
            "Процентная ставка:",
            format!("{} в день", percent_phrase(params.daily_rate)),
        ),
        Block::labeled("Ежедневный платёж:", format_rubles(totals.daily_payment)),
        Block::section("ДЕТАЛЬНЫЙ ГРАФИК ВЫПЛАТ"),
        Block::table_header(SCHEDULE_COLUMNS),
    ];

    blocks.extend(schedule.iter().map(|entry| {
        Block::table_row([
            entry.day.to_string(),
            format_rubles(entry.payment),
            format_rubles(entry.principal_portion),
            format_rubles(entry.interest_portion),
            format_rubles(entry.remaining_balance),
        ])
    }));

    blocks.extend([
        Block::section("ИТОГОВЫЕ ДАННЫЕ"),
        Block::labeled("Всего платежей:", schedule.len().to_string()),
        Block::labeled("Общая сумма выплат:", format_rubles(paid.payments)),
        Block::labeled("Переплата:", format_rubles(totals.total_interest)),
        Block::Rule,
        Block::centered(format!("© {} {}", issued_on.year(), lender.short_name)),
        Block::centered(lender.brand.as_str()),
    ]);

    debug!(rows = schedule.len(), blocks = blocks.len(), "schedule rendered");
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{emit, PlainTextSink};
    use crate::loan::{compute_schedule, compute_totals};
    use rust_decimal_macros::dec;

    fn sample() -> Vec<Block> {
        let params = LoanParameters::new(50_000, 30, dec!(0.02));
        let totals = compute_totals(50_000, 30, dec!(0.02)).unwrap();
        let schedule = compute_schedule(50_000, 30, dec!(0.02)).unwrap();
        let issued = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        render_schedule_summary(&params, &totals, &schedule, issued, &DocumentConfig::default())
    }

    #[test]
    fn test_one_row_per_day_after_header() {
        let blocks = sample();
        let rows: Vec<&Block> = blocks
            .iter()
            .filter(|b| matches!(b, Block::TableRow { header: false, .. }))
            .collect();
        assert_eq!(rows.len(), 30);
        assert_eq!(
            *rows[0],
            Block::table_row(["1", "2\u{a0}667 ₽", "1\u{a0}667 ₽", "1\u{a0}000 ₽", "77\u{a0}333 ₽"])
        );
        assert_eq!(
            *rows[29],
            Block::table_row(["30", "2\u{a0}657 ₽", "1\u{a0}657 ₽", "1\u{a0}000 ₽", "0 ₽"])
        );
    }

    #[test]
    fn test_summary_and_footer() {
        let blocks = sample();
        assert!(blocks.contains(&Block::labeled("Срок:", "30 дней")));
        assert!(blocks.contains(&Block::labeled("Всего платежей:", "30")));
        assert!(blocks.contains(&Block::labeled("Общая сумма выплат:", "80\u{a0}000 ₽")));
        assert!(blocks.contains(&Block::labeled("Переплата:", "30\u{a0}000 ₽")));
        assert!(blocks.contains(&Block::centered("© 2024 ООО \"ЭКОРРА ФИНАНСОВЫЙ ЦЕНТР\"")));
    }

    #[test]
    fn test_plain_text_rendering_has_boxed_table() {
        let text = emit(&sample(), PlainTextSink::new()).unwrap();
        assert!(text.contains("ГРАФИК ПЛАТЕЖЕЙ ПО ЗАЙМУ"));
        assert!(text.contains("│ День │"));
        assert_eq!(text.matches('┌').count(), 1);
        assert_eq!(text.matches('└').count(), 1);
        assert!(text.lines().all(|l| l.chars().count() <= 80));
    }
}
