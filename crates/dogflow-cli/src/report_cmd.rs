//! `dogflow report` command: today's progress, checklist history and the
//! cost and margin report.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use dogflow_core::report;
use dogflow_db::DocumentStore;

use crate::ReportCommands;
use crate::checklist_cmds::print_checklist;
use crate::format;

/// Run the report command.
pub fn run_report_command<S, W>(
    command: ReportCommands,
    store: &S,
    out: &mut W,
    currency: &str,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    match command {
        ReportCommands::Today { date } => {
            let date = format::parse_date(date.as_deref())?;
            print_today(store, out, date)
        }
        ReportCommands::History => print_history(store, out),
        ReportCommands::Costs => print_costs(store, out, currency),
    }
}

/// Every checklist opened on `date`, with its items.
pub(crate) fn print_today<S, W>(store: &S, out: &mut W, date: NaiveDate) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let reports = report::today_snapshot(store, date)?;
    if reports.is_empty() {
        writeln!(out, "No checklist started on {date}.")?;
        return Ok(());
    }
    for entry in &reports {
        print_checklist(out, &entry.checklist, &entry.progress)?;
        writeln!(out)?;
    }
    Ok(())
}

/// One line per checklist ever opened, oldest first.
pub(crate) fn print_history<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let reports = report::history(store)?;
    if reports.is_empty() {
        writeln!(out, "No data.")?;
        return Ok(());
    }
    for entry in &reports {
        writeln!(
            out,
            "{} | {:<30} | {}",
            entry.checklist.date,
            format::truncate(&entry.checklist.template_name, 30),
            format::progress_cell(&entry.progress)
        )?;
    }
    Ok(())
}

/// Unit cost, price and margin of every recipe.
pub(crate) fn print_costs<S, W>(store: &S, out: &mut W, currency: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let rows = report::cost_margin_report(store)?;
    if rows.is_empty() {
        writeln!(out, "No recipes registered.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<24} {:>14} {:>14} {:>9}",
        "PRODUCT", "COST", "PRICE", "MARGIN"
    )?;
    writeln!(out, "{}", "-".repeat(64))?;
    for row in &rows {
        writeln!(
            out,
            "{:<24} {:>14} {:>14} {:>8}%",
            format::truncate(&row.product_name, 24),
            format::money(currency, row.total_cost),
            format::money(currency, row.sale_price),
            format::percent(row.margin_percent)
        )?;
    }
    Ok(())
}
