//! Operator-facing formatting and parsing helpers shared by the subcommands,
//! the interactive menu and the dashboard.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;

use dogflow_core::costing::round_money;
use dogflow_core::session::Progress;
use dogflow_db::models::ChecklistItem;

/// Shown in place of a price that has not been set.
pub const NO_PRICE: &str = "—";

/// Format `value` as `<symbol> 1.234,56`: two decimals, `.` between
/// thousands and `,` before the cents.
pub fn money(symbol: &str, value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let plain = magnitude.to_string();
    let (int_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{symbol} {sign}{grouped},{cents}")
}

/// Like [`money`], but [`NO_PRICE`] when there is no value.
pub fn price(symbol: &str, value: Option<Decimal>) -> String {
    match value {
        Some(v) => money(symbol, v),
        None => NO_PRICE.to_string(),
    }
}

/// A percentage with two decimals, without the `%` sign.
pub fn percent(value: Decimal) -> String {
    let mut value = round_money(value);
    value.rescale(2);
    value.to_string()
}

/// Parse a decimal typed by an operator. Accepts `,` as the decimal
/// separator.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        bail!("expected a number, got an empty value");
    }
    Decimal::from_str(&normalized).with_context(|| format!("invalid number: {input:?}"))
}

/// Parse a `NAME=QTY` recipe line argument.
pub fn parse_line_arg(arg: &str) -> Result<(String, Decimal)> {
    let Some((name, qty)) = arg.rsplit_once('=') else {
        bail!("invalid line {arg:?}: expected NAME=QTY");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid line {arg:?}: ingredient name is empty");
    }
    let qty = parse_decimal(qty).with_context(|| format!("invalid quantity in line {arg:?}"))?;
    Ok((name.to_string(), qty))
}

/// Parse a `--date` value, defaulting to the local calendar day.
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date {s:?}: expected YYYY-MM-DD")),
        None => Ok(today()),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// One numbered checklist line: `03. [x] Step name [timestamp]`.
pub fn item_line(position: usize, item: &ChecklistItem) -> String {
    let mark = if item.done { "[x]" } else { "[ ]" };
    match item.completed_at {
        Some(at) => format!("{position:02}. {mark} {} [{}]", item.name, timestamp(at)),
        None => format!("{position:02}. {mark} {}", item.name),
    }
}

/// `done/total => pct%`, zero-padded the way the history report lines up.
pub fn progress_cell(progress: &Progress) -> String {
    format!(
        "{:02}/{:02} => {:>3}%",
        progress.done, progress.total, progress.percent
    )
}

/// Truncate `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn money_uses_brazilian_grouping() {
        assert_eq!(money("R$", dec("1234.56")), "R$ 1.234,56");
        assert_eq!(money("R$", dec("2.7")), "R$ 2,70");
        assert_eq!(money("R$", dec("0")), "R$ 0,00");
        assert_eq!(money("R$", dec("1234567")), "R$ 1.234.567,00");
        assert_eq!(money("R$", dec("999.999")), "R$ 1.000,00");
    }

    #[test]
    fn money_keeps_sign_after_symbol() {
        assert_eq!(money("R$", dec("-1500.5")), "R$ -1.500,50");
    }

    #[test]
    fn money_uses_configured_symbol() {
        assert_eq!(money("US$", dec("3.86")), "US$ 3,86");
    }

    #[test]
    fn missing_price_is_a_dash() {
        assert_eq!(price("R$", None), NO_PRICE);
        assert_eq!(price("R$", Some(dec("3.86"))), "R$ 3,86");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(dec("30.05")), "30.05");
        assert_eq!(percent(dec("0")), "0.00");
        assert_eq!(percent(dec("-25")), "-25.00");
    }

    #[test]
    fn parse_decimal_accepts_comma() {
        assert_eq!(parse_decimal("1,20").unwrap(), dec("1.20"));
        assert_eq!(parse_decimal(" 30 ").unwrap(), dec("30"));
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn parse_line_arg_splits_on_last_equals() {
        let (name, qty) = parse_line_arg("Molho=30").unwrap();
        assert_eq!(name, "Molho");
        assert_eq!(qty, dec("30"));

        let (name, qty) = parse_line_arg("Pão 50g = 1,5").unwrap();
        assert_eq!(name, "Pão 50g");
        assert_eq!(qty, dec("1.5"));

        assert!(parse_line_arg("Molho").is_err());
        assert!(parse_line_arg("=3").is_err());
        assert!(parse_line_arg("Molho=").is_err());
    }

    #[test]
    fn parse_date_validates_format() {
        assert_eq!(
            parse_date(Some("2026-10-19")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(parse_date(Some("19/10/2026")).is_err());
        assert_eq!(parse_date(None).unwrap(), today());
    }

    #[test]
    fn item_line_marks_pending_items() {
        let item = ChecklistItem::pending("Ligar chapa");
        assert_eq!(item_line(3, &item), "03. [ ] Ligar chapa");
    }

    #[test]
    fn progress_cell_pads_counts() {
        let p = Progress {
            done: 1,
            total: 10,
            percent: 10,
        };
        assert_eq!(progress_cell(&p), "01/10 =>  10%");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Abertura", 20), "Abertura");
        assert_eq!(truncate("Abertura – Hot Dog", 10), "Abertur...");
    }
}
