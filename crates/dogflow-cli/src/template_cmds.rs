//! Operator-mode CLI handlers for `dogflow template` subcommands.
//!
//! Implements:
//! - `dogflow template list`                      -- list templates and their items
//! - `dogflow template create <name> --item ..`  -- create or replace a template
//! - `dogflow template delete <name>`             -- delete a template
//! - `dogflow template restore [--yes]`           -- reload the built-in templates

use std::io::{BufRead, Write};

use anyhow::Result;

use dogflow_core::{Upserted, catalog};
use dogflow_db::DocumentStore;

use crate::TemplateCommands;

/// Literal the operator must type to confirm a template restore.
pub const CONFIRM_TOKEN: &str = "SIM";

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `TemplateCommands` variant to the appropriate handler.
pub fn run_template_command<S, R, W>(
    command: TemplateCommands,
    store: &mut S,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    R: BufRead,
    W: Write,
{
    match command {
        TemplateCommands::List => print_templates(store, out),
        TemplateCommands::Create { name, items } => cmd_create(store, out, &name, &items),
        TemplateCommands::Delete { name } => cmd_delete(store, out, &name),
        TemplateCommands::Restore { yes } => {
            if !yes && !confirm_restore(input, out)? {
                writeln!(out, "Operation cancelled.")?;
                return Ok(());
            }
            cmd_restore(store, out)
        }
    }
}

// -----------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------

/// Print every template with its items, in store order.
pub(crate) fn print_templates<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let templates = catalog::list_templates(store)?;
    if templates.is_empty() {
        writeln!(out, "No templates registered.")?;
        return Ok(());
    }

    for template in &templates {
        writeln!(out, "Template: {} ({} items)", template.name, template.items.len())?;
        for item in &template.items {
            writeln!(out, "  - {item}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn cmd_create<S, W>(store: &mut S, out: &mut W, name: &str, items: &[String]) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let (template, outcome) = catalog::create_template(store, name, items)?;
    let verb = match outcome {
        Upserted::Created => "created",
        Upserted::Updated => "replaced",
    };
    writeln!(
        out,
        "Template {:?} {verb} with {} items.",
        template.name,
        template.items.len()
    )?;
    Ok(())
}

pub(crate) fn cmd_delete<S, W>(store: &mut S, out: &mut W, name: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    catalog::delete_template(store, name)?;
    writeln!(out, "Template {name:?} removed. Existing checklists are kept.")?;
    Ok(())
}

pub(crate) fn cmd_restore<S, W>(store: &mut S, out: &mut W) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let loaded = catalog::restore_default_templates(store)?;
    writeln!(out, "Default templates restored ({loaded} loaded).")?;
    Ok(())
}

/// Warn about the restore and read the confirmation token.
///
/// Only the exact token (case-insensitive, surrounding spaces ignored)
/// confirms; anything else, including end of input, cancels.
pub(crate) fn confirm_restore<R, W>(input: &mut R, out: &mut W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "This DELETES every current template and loads the built-in ones."
    )?;
    writeln!(out, "Checklists already started (history) are kept.")?;
    write!(out, "Type '{CONFIRM_TOKEN}' to confirm: ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case(CONFIRM_TOKEN))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
