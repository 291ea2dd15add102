const ONES: [&str; 10] = [
    "", "один", "два", "три", "четыре", "пять", "шесть", "семь", "восемь", "девять",
];

const TEENS: [&str; 10] = [
    "десять",
    "одиннадцать",
    "двенадцать",
    "тринадцать",
    "четырнадцать",
    "пятнадцать",
    "шестнадцать",
    "семнадцать",
    "восемнадцать",
    "девятнадцать",
];

const TENS: [&str; 10] = [
    "",
    "",
    "двадцать",
    "тридцать",
    "сорок",
    "пятьдесят",
    "шестьдесят",
    "семьдесят",
    "восемьдесят",
    "девяносто",
];

const HUNDREDS: [&str; 10] = [
    "",
    "сто",
    "двести",
    "триста",
    "четыреста",
    "пятьсот",
    "шестьсот",
    "семьсот",
    "восемьсот",
    "девятьсот",
];

// "тысяча" is feminine: одна, две.
const THOUSANDS: [&str; 10] = [
    "",
    "одна тысяча",
    "две тысячи",
    "три тысячи",
    "четыре тысячи",
    "пять тысяч",
    "шесть тысяч",
    "семь тысяч",
    "восемь тысяч",
    "девять тысяч",
];

/// Largest value spelled out in words; anything above is printed as digits.
pub const MAX_SPELLED: i64 = 9_999;

/// Spell an amount in Russian words (masculine, as for "рубль").
///
/// Covers 0..=9999; negative numbers and anything above 9999 fall back to the
/// plain numeral.
pub fn number_to_words(num: i64) -> String {
    match num {
        0 => "ноль".to_string(),
        1..=MAX_SPELLED => spell(num as usize),
        _ => num.to_string(),
    }
}

// thousands -> hundreds -> tens -> ones
fn spell(n: usize) -> String {
    match n {
        0 => String::new(),
        1..=9 => ONES[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        20..=99 => join(TENS[n / 10], spell(n % 10)),
        100..=999 => join(HUNDREDS[n / 100], spell(n % 100)),
        _ => join(THOUSANDS[n / 1000], spell(n % 1000)),
    }
}

fn join(head: &str, tail: String) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{head} {tail}")
    }
}

/// Pick the Russian noun form agreeing with `n`: 1 рубль, 2 рубля, 5 рублей.
pub fn plural_form<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let n = n.unsigned_abs();
    if (11..=14).contains(&(n % 100)) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_ones() {
        assert_eq!(number_to_words(0), "ноль");
        assert_eq!(number_to_words(1), "один");
        assert_eq!(number_to_words(9), "девять");
    }

    #[test]
    fn test_teens_and_tens() {
        assert_eq!(number_to_words(10), "десять");
        assert_eq!(number_to_words(11), "одиннадцать");
        assert_eq!(number_to_words(19), "девятнадцать");
        assert_eq!(number_to_words(20), "двадцать");
        assert_eq!(number_to_words(42), "сорок два");
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(number_to_words(100), "сто");
        assert_eq!(number_to_words(215), "двести пятнадцать");
        assert_eq!(number_to_words(999), "девятьсот девяносто девять");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(number_to_words(1000), "одна тысяча");
        assert_eq!(number_to_words(2001), "две тысячи один");
        assert_eq!(number_to_words(5000), "пять тысяч");
        assert_eq!(
            number_to_words(9999),
            "девять тысяч девятьсот девяносто девять"
        );
    }

    #[test]
    fn test_numeral_fallback() {
        assert_eq!(number_to_words(10_000), "10000");
        assert_eq!(number_to_words(50_000), "50000");
        assert_eq!(number_to_words(-3), "-3");
    }

    #[test]
    fn test_every_value_in_range_is_spelled() {
        for n in 1..=MAX_SPELLED {
            let words = number_to_words(n);
            assert!(!words.is_empty());
            assert!(!words.contains("ноль"), "{n} => {words}");
            assert!(!words.contains("  "), "{n} => {words}");
            assert!(!words.chars().any(|c| c.is_ascii_digit()), "{n} => {words}");
        }
    }

    #[test]
    fn test_plural_forms() {
        let forms = |n| plural_form(n, "день", "дня", "дней");
        assert_eq!(forms(1), "день");
        assert_eq!(forms(3), "дня");
        assert_eq!(forms(7), "дней");
        assert_eq!(forms(11), "дней");
        assert_eq!(forms(21), "день");
        assert_eq!(forms(112), "дней");
        assert_eq!(forms(90), "дней");
    }
}
