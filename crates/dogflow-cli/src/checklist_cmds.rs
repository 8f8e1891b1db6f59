//! Operator-mode CLI handlers for `dogflow checklist` subcommands.
//!
//! Every subcommand takes `--date YYYY-MM-DD` and defaults to today.
//! Items are numbered from 1 on the command line.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use dogflow_core::session::{self, Progress, ShiftSummary};
use dogflow_core::{EntityKind, OpsError};
use dogflow_db::DocumentStore;
use dogflow_db::models::Checklist;
use dogflow_db::queries::checklists as checklist_db;

use crate::ChecklistCommands;
use crate::format;
use crate::report_cmd;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `ChecklistCommands` variant to the appropriate handler.
pub fn run_checklist_command<S, W>(command: ChecklistCommands, store: &mut S, out: &mut W) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    match command {
        ChecklistCommands::Start { template, date } => {
            let date = format::parse_date(date.as_deref())?;
            cmd_start(store, out, date, &template)
        }
        ChecklistCommands::Toggle {
            template,
            item,
            date,
        } => {
            let date = format::parse_date(date.as_deref())?;
            let Some(index) = item.checked_sub(1) else {
                bail!("items are numbered from 1");
            };
            cmd_toggle(store, out, date, &template, index)
        }
        ChecklistCommands::Show { template, date } => {
            let date = format::parse_date(date.as_deref())?;
            match template {
                Some(name) => cmd_show_one(store, out, date, &name),
                None => report_cmd::print_today(store, out, date),
            }
        }
        ChecklistCommands::Finish { template, date } => {
            let date = format::parse_date(date.as_deref())?;
            cmd_finish(store, out, date, &template)
        }
    }
}

// -----------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------

pub(crate) fn cmd_start<S, W>(store: &mut S, out: &mut W, date: NaiveDate, template: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let checklist = session::get_or_create_instance(store, date, template)?;
    let progress = session::progress(&checklist);
    writeln!(out, "Checklist ready.")?;
    writeln!(out, "  Date:     {}", checklist.date)?;
    writeln!(out, "  Template: {}", checklist.template_name)?;
    writeln!(out, "  Progress: {progress}")?;
    Ok(())
}

fn cmd_toggle<S, W>(
    store: &mut S,
    out: &mut W,
    date: NaiveDate,
    template: &str,
    index: usize,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let mut checklist = session::get_or_create_instance(store, date, template)?;
    let status = session::toggle_item(store, &mut checklist, index)?;
    let item = &checklist.items[index];
    writeln!(out, "Item {:02} \"{}\" is now {status}.", index + 1, item.name)?;
    writeln!(out, "Progress: {}", session::progress(&checklist))?;
    Ok(())
}

/// Show one checklist without creating it.
fn cmd_show_one<S, W>(store: &S, out: &mut W, date: NaiveDate, template: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let template = template.trim();
    let checklist = checklist_db::get_checklist(store, date, template)?.ok_or_else(|| {
        OpsError::NotFound {
            kind: EntityKind::Checklist,
            name: format!("{template} @ {date}"),
        }
    })?;
    print_checklist(out, &checklist, &session::progress(&checklist))
}

pub(crate) fn cmd_finish<S, W>(store: &mut S, out: &mut W, date: NaiveDate, template: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let checklist = session::get_or_create_instance(store, date, template)?;
    print_shift_summary(out, &session::shift_summary(&checklist))
}

// -----------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------

/// Header line plus one numbered line per item.
pub(crate) fn print_checklist<W: Write>(
    out: &mut W,
    checklist: &Checklist,
    progress: &Progress,
) -> Result<()> {
    writeln!(
        out,
        "{} - {} | Progress: {progress}",
        checklist.template_name, checklist.date
    )?;
    for (i, item) in checklist.items.iter().enumerate() {
        writeln!(out, "  {}", format::item_line(i + 1, item))?;
    }
    Ok(())
}

pub(crate) fn print_shift_summary<W: Write>(out: &mut W, summary: &ShiftSummary) -> Result<()> {
    writeln!(out, "Shift summary")?;
    writeln!(out, "  Template:  {}", summary.template_name)?;
    writeln!(out, "  Date:      {}", summary.date)?;
    writeln!(
        out,
        "  Completed: {}/{}",
        summary.progress.done, summary.progress.total
    )?;
    writeln!(out, "  Percent:   {}%", summary.progress.percent)?;
    writeln!(out, "  Status:    {}", summary.status)?;
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
