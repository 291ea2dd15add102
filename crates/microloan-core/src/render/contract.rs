use chrono::NaiveDate;
use tracing::debug;

use crate::borrower::BorrowerData;
use crate::config::{DocumentConfig, LenderDetails};
use crate::document::block::Block;
use crate::loan::{LoanParameters, LoanTotals};
use crate::render::{return_date, BLANK};
use crate::text::{
    amount_phrase, format_amount, format_date, format_percent, number_to_words, percent_phrase,
    plural_form,
};
use crate::MicroloanResult;

/// Build the loan contract.
///
/// Borrower data is checked before anything else; an incomplete form yields
/// `IncompleteBorrowerData` and no blocks.
pub fn render_contract(
    params: &LoanParameters,
    totals: &LoanTotals,
    borrower: &BorrowerData,
    contract_date: NaiveDate,
    contract_number: u32,
    config: &DocumentConfig,
) -> MicroloanResult<Vec<Block>> {
    borrower.validate()?;
    let due = format_date(return_date(contract_date, params.term_days)?);
    let issued = format_date(contract_date);
    let lender = &config.lender;

    let mut blocks = vec![
        Block::title(format!("ДОГОВОР ЗАЙМА № {contract_number}")),
        Block::centered(format!("г. {}, {issued}", lender.city)),
        Block::Rule,
        Block::paragraph(format!(
            "Мы, представитель {}, действующий на основании Устава, именуемый в дальнейшем \
             «Займодавец», и гр. {}, паспорт: серия {}, № {}, проживающий(ая) по адресу: {}, \
             именуемый(ая) в дальнейшем «Заемщик», заключили настоящий договор о нижеследующем:",
            lender.short_name,
            borrower.full_name.trim(),
            borrower.passport_series.trim(),
            borrower.passport_number.trim(),
            borrower.address.trim(),
        )),
    ];

    blocks.extend(clauses(params, totals, &due, config));
    blocks.extend(loan_parameters(params, totals, &issued, &due));
    blocks.extend(lender_requisites(lender));
    blocks.extend(borrower_details(borrower));

    blocks.push(Block::Rule);
    blocks.push(Block::paragraph(format!(
        "Заемщик {} подтверждает получение суммы займа в размере {} и обязуется вернуть \
         указанную сумму с процентами в размере {} в установленный срок до {due}.",
        borrower.full_name.trim(),
        amount_phrase(params.principal),
        amount_phrase(totals.total_amount),
    )));
    blocks.push(Block::paragraph(format!(
        "Подпись Заемщика: ___________________  Дата: {issued}"
    )));

    blocks.push(Block::section("ПОДПИСИ СТОРОН"));
    blocks.push(Block::signature(
        "Займодавец",
        "(подпись)",
        Some(lender.short_name.clone()),
    ));
    blocks.push(Block::signature(
        "Заемщик",
        "(подпись)",
        Some(borrower.full_name.trim().to_string()),
    ));
    blocks.push(Block::Spacer);
    blocks.push(Block::right("С условиями договора ознакомлен(а) и согласен(на)"));
    blocks.push(Block::right(format!(
        "Заемщик: ___________________ {}",
        borrower.full_name.trim()
    )));

    debug!(contract_number, blocks = blocks.len(), "contract rendered");
    Ok(blocks)
}

fn clauses(
    params: &LoanParameters,
    totals: &LoanTotals,
    due: &str,
    config: &DocumentConfig,
) -> Vec<Block> {
    let principal = params.principal;
    let interest_clause = if params.daily_rate.is_zero() {
        "2. Настоящий договор займа является беспроцентным.".to_string()
    } else {
        format!(
            "2. Настоящий договор займа НЕ является беспроцентным. Процентная ставка составляет \
             {} в день.",
            percent_phrase(params.daily_rate)
        )
    };

    vec![
        Block::paragraph(format!(
            "1. Займодавец передает Заемщику в собственность денежные средства в размере {} ({}) \
             {} на указанный в настоящем договоре срок, а Заемщик обязуется возвратить указанную \
             сумму в обусловленный срок.",
            format_amount(principal),
            number_to_words(principal),
            plural_form(principal, "рубль", "рубля", "рублей"),
        )),
        Block::paragraph(interest_clause),
        Block::paragraph(
            "3. В момент получения от Займодавца денежных средств Заемщик обязан написать \
             Займодавцу расписку в их получении.",
        ),
        Block::paragraph(format!(
            "4. Заемщик обязан вернуть всю сумму займа, указанную в п. 1 настоящего договора, \
             вместе с начисленными процентами, всего {}, не позднее «{due}» г.",
            amount_phrase(totals.total_amount)
        )),
        Block::paragraph(
            "5. По желанию Заемщика сумма займа может быть возвращена досрочно либо возвращаться \
             частями, но не позднее срока, указанного в п. 4 настоящего договора.",
        ),
        Block::paragraph(format!(
            "6. В случае нарушения Заемщиком срока возврата суммы займа, указанного в п. 4 \
             настоящего договора, он обязан уплатить Займодавцу неустойку (пени) в размере {} от \
             всей суммы займа за каждый день просрочки. Неустойка начисляется до момента возврата \
             всей суммы займа, но не может составлять более {} суммы займа.",
            format_percent(config.terms.penalty_rate_per_day),
            format_percent(config.terms.penalty_cap),
        )),
        Block::paragraph(
            "7. Настоящий договор считается заключенным с момента фактической передачи \
             Займодавцем Заемщику суммы займа.",
        ),
        Block::paragraph(
            "8. Договор составлен в двух экземплярах, имеющих одинаковую юридическую силу, по \
             одному экземпляру для каждой из сторон.",
        ),
    ]
}

fn loan_parameters(
    params: &LoanParameters,
    totals: &LoanTotals,
    issued: &str,
    due: &str,
) -> Vec<Block> {
    let term = params.term_days;
    vec![
        Block::section("ПАРАМЕТРЫ ЗАЙМА"),
        Block::labeled("Сумма займа:", amount_phrase(params.principal)),
        Block::labeled(
            "Срок займа:",
            format!(
                "{term} {}",
                plural_form(term, "календарный день", "календарных дня", "календарных дней")
            ),
        ),
        Block::labeled(
            "Процентная ставка:",
            format!("{} в день", percent_phrase(params.daily_rate)),
        ),
        Block::labeled("Сумма процентов:", amount_phrase(totals.total_interest)),
        Block::labeled("ОБЩАЯ СУММА К ВОЗВРАТУ:", amount_phrase(totals.total_amount)),
        Block::labeled("Ежедневный платёж:", amount_phrase(totals.daily_payment)),
        Block::labeled("Дата выдачи займа:", issued),
        Block::labeled("Дата возврата займа:", due),
    ]
}

fn requisite(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(BLANK)
        .to_string()
}

fn lender_requisites(lender: &LenderDetails) -> Vec<Block> {
    vec![
        Block::section("РЕКВИЗИТЫ ЗАЙМОДАВЦА"),
        Block::labeled("Полное наименование:", lender.full_name.as_str()),
        Block::labeled("Сокращенное наименование:", lender.short_name.as_str()),
        Block::labeled("ИНН:", requisite(&lender.inn)),
        Block::labeled("КПП:", requisite(&lender.kpp)),
        Block::labeled("ОГРН:", requisite(&lender.ogrn)),
        Block::labeled("Юридический адрес:", requisite(&lender.legal_address)),
        Block::labeled("Фактический адрес:", requisite(&lender.actual_address)),
        Block::paragraph("Банковские реквизиты:"),
        Block::labeled("Расчетный счет:", requisite(&lender.account)),
        Block::labeled("Наименование банка:", requisite(&lender.bank_name)),
        Block::labeled("БИК:", requisite(&lender.bik)),
        Block::labeled("Корр. счет:", requisite(&lender.corr_account)),
        Block::labeled("Контактный телефон:", requisite(&lender.phone)),
        Block::labeled("E-mail:", requisite(&lender.email)),
        Block::signature(
            format!("Директор {}", lender.short_name),
            "(подпись, Ф.И.О.)",
            None,
        ),
        Block::paragraph("М.П."),
    ]
}

fn borrower_details(borrower: &BorrowerData) -> Vec<Block> {
    vec![
        Block::section("ПОЛНЫЕ ДАННЫЕ ЗАЕМЩИКА"),
        Block::labeled("ФИО:", borrower.full_name.trim()),
        Block::labeled("Дата рождения:", borrower.birth_date.trim()),
        Block::labeled(
            "Паспорт:",
            format!(
                "серия {}, номер {}",
                borrower.passport_series.trim(),
                borrower.passport_number.trim()
            ),
        ),
        Block::labeled("Адрес регистрации:", borrower.address.trim()),
        Block::labeled("Контактный телефон:", borrower.phone.trim()),
    ]
}
