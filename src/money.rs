//! Formatting of amounts for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with two decimal places, e.g. `$1,234.50` or
/// `-$20.00`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("\"-$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    if number < 0.0 {
        pad_cents(negative_fmt.fmt_string(number.abs()))
    } else if number > 0.0 {
        pad_cents(positive_fmt.fmt_string(number))
    } else {
        // numfmt renders zero as "0"
        "$0.00".to_owned()
    }
}

/// numfmt drops trailing zeros after the decimal point, e.g. "$12.3" or "$12".
fn pad_cents(formatted: String) -> String {
    match formatted.split_once('.') {
        Some((_, cents)) if cents.len() >= 2 => formatted,
        Some((_, cents)) => format!("{formatted}{}", "0".repeat(2 - cents.len())),
        None => format!("{formatted}.00"),
    }
}
