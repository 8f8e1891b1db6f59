//! Interactive numbered menu, the default operator surface.
//!
//! Reads choices line by line from any `BufRead` and writes to any `Write`,
//! so whole sessions can be scripted in tests. Input mistakes and
//! recoverable operation errors are reported and the menu continues; store
//! failures end the session with an error. End of input behaves like `0`.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use dogflow_core::{OpsError, catalog, costing, session};
use dogflow_db::DocumentStore;
use dogflow_db::models::IngredientLine;

use crate::format;
use crate::{checklist_cmds, ingredient_cmds, recipe_cmds, report_cmd, template_cmds};

const MAIN_MENU: &[(&str, &str)] = &[
    ("1", "Start today's checklist"),
    ("2", "Check/uncheck an item"),
    ("3", "View today's checklists"),
    ("4", "Finish a checklist (shift summary)"),
    ("5", "Manage checklist templates"),
    ("6", "Costs and recipes"),
    ("7", "Reports"),
    ("0", "Exit"),
];

const TEMPLATE_MENU: &[(&str, &str)] = &[
    ("1", "List templates"),
    ("2", "Create template"),
    ("3", "Delete template"),
    ("4", "Restore default templates"),
    ("0", "Back"),
];

const COST_MENU: &[(&str, &str)] = &[
    ("1", "Register ingredient"),
    ("2", "List ingredients"),
    ("3", "Create/edit recipe"),
    ("4", "List recipes"),
    ("5", "Set sale price"),
    ("6", "Cost and margin report"),
    ("0", "Back"),
];

const REPORT_MENU: &[(&str, &str)] = &[
    ("1", "Today's progress per checklist"),
    ("2", "History of all checklists"),
    ("0", "Back"),
];

/// Whether an error should end the session instead of being shown.
fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.downcast_ref::<OpsError>().is_some_and(OpsError::is_fatal)
            || cause.downcast_ref::<dogflow_db::StoreError>().is_some()
            || cause.downcast_ref::<std::io::Error>().is_some()
    })
}

/// State of one interactive session.
pub struct Menu<'a, S: ?Sized, R, W> {
    store: &'a mut S,
    input: R,
    out: W,
    currency: String,
    today: NaiveDate,
}

impl<'a, S, R, W> Menu<'a, S, R, W>
where
    S: DocumentStore + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'a mut S, input: R, out: W, currency: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            store,
            input,
            out,
            currency: currency.into(),
            today,
        }
    }

    /// Run the main menu until the operator exits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu("DOGFLOW - MAIN MENU", MAIN_MENU)?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };
            debug!(choice = %choice, "main menu");
            let result = match choice.as_str() {
                "1" => self.start_checklist(),
                "2" => self.toggle_item(),
                "3" => report_cmd::print_today(&*self.store, &mut self.out, self.today),
                "4" => self.finish_checklist(),
                "5" => self.template_menu(),
                "6" => self.cost_menu(),
                "7" => self.report_menu(),
                "0" => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(());
                }
                _ => self.invalid_option(),
            };
            self.report(result)?;
        }
    }

    // -------------------------------------------------------------------
    // Submenus
    // -------------------------------------------------------------------

    fn template_menu(&mut self) -> Result<()> {
        loop {
            self.show_menu("MANAGE TEMPLATES", TEMPLATE_MENU)?;
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(());
            };
            let result = match choice.as_str() {
                "1" => template_cmds::print_templates(&*self.store, &mut self.out),
                "2" => self.create_template(),
                "3" => self.delete_template(),
                "4" => self.restore_templates(),
                "0" => return Ok(()),
                _ => self.invalid_option(),
            };
            self.report(result)?;
        }
    }

    fn cost_menu(&mut self) -> Result<()> {
        loop {
            self.show_menu("COSTS AND RECIPES", COST_MENU)?;
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(());
            };
            let result = match choice.as_str() {
                "1" => self.register_ingredient(),
                "2" => ingredient_cmds::print_ingredients(&*self.store, &mut self.out, &self.currency),
                "3" => self.edit_recipe(),
                "4" => recipe_cmds::print_recipes(&*self.store, &mut self.out, &self.currency),
                "5" => self.set_price(),
                "6" => report_cmd::print_costs(&*self.store, &mut self.out, &self.currency),
                "0" => return Ok(()),
                _ => self.invalid_option(),
            };
            self.report(result)?;
        }
    }

    fn report_menu(&mut self) -> Result<()> {
        self.show_menu("REPORTS", REPORT_MENU)?;
        let Some(choice) = self.prompt("Choose: ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => report_cmd::print_today(&*self.store, &mut self.out, self.today),
            "2" => report_cmd::print_history(&*self.store, &mut self.out),
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------
    // Checklist actions
    // -------------------------------------------------------------------

    fn start_checklist(&mut self) -> Result<()> {
        let Some(name) = self.select_template("Choose a template to start TODAY's checklist:")? else {
            return Ok(());
        };
        checklist_cmds::cmd_start(&mut *self.store, &mut self.out, self.today, &name)
    }

    fn toggle_item(&mut self) -> Result<()> {
        let Some(name) = self.select_template("Choose today's checklist to update:")? else {
            return Ok(());
        };
        let mut checklist = session::get_or_create_instance(&mut *self.store, self.today, &name)?;
        checklist_cmds::print_checklist(&mut self.out, &checklist, &session::progress(&checklist))?;

        let Some(answer) = self.prompt("Item to toggle (0 to go back): ")? else {
            return Ok(());
        };
        let Ok(choice) = answer.parse::<usize>() else {
            return Ok(());
        };
        if choice == 0 {
            return Ok(());
        }
        let status = session::toggle_item(&mut *self.store, &mut checklist, choice - 1)?;
        writeln!(self.out, "Item updated: now {status}.")?;
        Ok(())
    }

    fn finish_checklist(&mut self) -> Result<()> {
        let Some(name) = self.select_template("Choose the checklist to CLOSE:")? else {
            return Ok(());
        };
        checklist_cmds::cmd_finish(&mut *self.store, &mut self.out, self.today, &name)
    }

    // -------------------------------------------------------------------
    // Template actions
    // -------------------------------------------------------------------

    fn create_template(&mut self) -> Result<()> {
        let Some(name) = self.prompt("New template name (e.g. Limpeza Semanal): ")? else {
            return Ok(());
        };
        writeln!(self.out, "Enter the items (blank line to finish):")?;
        let mut items = Vec::new();
        while let Some(item) = self.prompt("  - ")? {
            if item.is_empty() {
                break;
            }
            items.push(item);
        }
        template_cmds::cmd_create(&mut *self.store, &mut self.out, &name, &items)
    }

    fn delete_template(&mut self) -> Result<()> {
        let Some(name) = self.select_template("Choose the template to delete:")? else {
            return Ok(());
        };
        template_cmds::cmd_delete(&mut *self.store, &mut self.out, &name)
    }

    fn restore_templates(&mut self) -> Result<()> {
        if template_cmds::confirm_restore(&mut self.input, &mut self.out)? {
            template_cmds::cmd_restore(&mut *self.store, &mut self.out)
        } else {
            writeln!(self.out, "Operation cancelled.")?;
            Ok(())
        }
    }

    // -------------------------------------------------------------------
    // Cost actions
    // -------------------------------------------------------------------

    fn register_ingredient(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Ingredient name: ")?.filter(|n| !n.is_empty()) else {
            return Ok(());
        };
        let unit = self
            .prompt("Unit (e.g. un, kg, L, g, ml): ")?
            .unwrap_or_default();
        let Some(cost) = self.prompt("Cost per base unit (e.g. 1.20): ")? else {
            return Ok(());
        };
        let Ok(cost) = format::parse_decimal(&cost) else {
            writeln!(self.out, "Invalid value.")?;
            return Ok(());
        };
        ingredient_cmds::cmd_add(&mut *self.store, &mut self.out, &self.currency, &name, &unit, cost)
    }

    fn edit_recipe(&mut self) -> Result<()> {
        let Some(product) = self.prompt("Final product name: ")?.filter(|p| !p.is_empty()) else {
            return Ok(());
        };

        let mut lines: Vec<IngredientLine> = Vec::new();
        loop {
            let Some(name) = self
                .prompt("Ingredient (blank to finish): ")?
                .filter(|n| !n.is_empty())
            else {
                break;
            };
            let Some(ingredient) = catalog::find_ingredient(&*self.store, &name)? else {
                writeln!(self.out, "  -> Ingredient not found. Register it first.")?;
                continue;
            };
            let label = format!("  Quantity used ({}): ", ingredient.unit);
            let Some(qty) = self.prompt(&label)? else {
                break;
            };
            let Ok(qty) = format::parse_decimal(&qty) else {
                writeln!(self.out, "  -> Invalid quantity.")?;
                continue;
            };
            match costing::line_for(&*self.store, &ingredient.name, qty) {
                Ok(line) => lines.push(line),
                Err(e) if !e.is_fatal() => writeln!(self.out, "  -> {e}")?,
                Err(e) => return Err(e.into()),
            }
        }

        if lines.is_empty() {
            writeln!(self.out, "No ingredients entered.")?;
            return Ok(());
        }

        let cost = costing::compute_cost(&lines)?;
        let label = format!(
            "Sale price (blank to set later) | Cost: {} : ",
            format::money(&self.currency, cost)
        );
        let price = match self.prompt(&label)? {
            Some(p) if !p.is_empty() => match format::parse_decimal(&p) {
                Ok(p) => Some(p),
                Err(_) => {
                    writeln!(self.out, "Invalid price; saving without one.")?;
                    None
                }
            },
            _ => None,
        };
        recipe_cmds::cmd_save(&mut *self.store, &mut self.out, &self.currency, &product, lines, price)
    }

    fn set_price(&mut self) -> Result<()> {
        let recipes = costing::list_recipes(&*self.store)?;
        if recipes.is_empty() {
            writeln!(self.out, "Register a recipe first.")?;
            return Ok(());
        }
        for (i, recipe) in recipes.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, recipe.product_name)?;
        }
        let Some(recipe) = self.prompt_index("Select the product: ")?.and_then(|i| recipes.get(i))
        else {
            writeln!(self.out, "Invalid input.")?;
            return Ok(());
        };

        let cost = costing::compute_cost(&recipe.ingredient_lines)?;
        writeln!(self.out, "Current cost: {}", format::money(&self.currency, cost))?;
        let mode = self
            .prompt("Set by (1) direct price or (2) target margin %? ")?
            .unwrap_or_default();

        let updated = if mode == "2" {
            let Some(margin) = self.prompt_decimal("Target margin (%): ")? else {
                return Ok(());
            };
            costing::set_price_by_margin(&mut *self.store, &recipe.product_name, margin)?
        } else {
            let Some(price) = self.prompt_decimal("Sale price: ")? else {
                return Ok(());
            };
            costing::set_sale_price(&mut *self.store, &recipe.product_name, price)?
        };
        recipe_cmds::print_price_updated(&mut self.out, &self.currency, &updated)
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    fn show_menu(&mut self, title: &str, options: &[(&str, &str)]) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "== {title} ==")?;
        for (key, label) in options {
            writeln!(self.out, "[{key}] {label}")?;
        }
        Ok(())
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a 1-based choice and return it 0-based.
    fn prompt_index(&mut self, label: &str) -> Result<Option<usize>> {
        Ok(self
            .prompt(label)?
            .and_then(|s| s.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1)))
    }

    fn prompt_decimal(&mut self, label: &str) -> Result<Option<rust_decimal::Decimal>> {
        let Some(answer) = self.prompt(label)? else {
            return Ok(None);
        };
        match format::parse_decimal(&answer) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.out, "Invalid.")?;
                Ok(None)
            }
        }
    }

    /// List templates and let the operator pick one by number.
    fn select_template(&mut self, heading: &str) -> Result<Option<String>> {
        let names = catalog::template_names(&*self.store)?;
        if names.is_empty() {
            writeln!(self.out, "No templates registered.")?;
            return Ok(None);
        }
        writeln!(self.out, "{heading}")?;
        for (i, name) in names.iter().enumerate() {
            writeln!(self.out, "{}. {name}", i + 1)?;
        }
        let picked = self
            .prompt_index("Template number: ")?
            .and_then(|i| names.get(i).cloned());
        if picked.is_none() {
            self.invalid_option()?;
        }
        Ok(picked)
    }

    fn invalid_option(&mut self) -> Result<()> {
        writeln!(self.out, "Invalid option.")?;
        Ok(())
    }

    /// Show a recoverable error and carry on; propagate anything fatal.
    fn report(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if is_fatal(&e) => Err(e),
            Err(e) => {
                writeln!(self.out, "Error: {e:#}")?;
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dogflow_db::MemoryStore;
    use dogflow_db::queries::checklists as checklist_db;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    /// Run a scripted session and return everything written.
    fn session(store: &mut MemoryStore, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(store, Cursor::new(script), &mut out, "R$", today())
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        catalog::create_template(&mut store, "Delivery", ["Embalar", "Etiquetar"]).unwrap();
        store
    }

    #[test]
    fn exit_option_and_end_of_input_both_stop() {
        let mut store = MemoryStore::new();
        assert!(session(&mut store, "0\n").ends_with("Goodbye!\n"));
        assert!(!session(&mut store, "").contains("Goodbye!"));
    }

    #[test]
    fn invalid_main_option_is_reported() {
        let mut store = MemoryStore::new();
        let output = session(&mut store, "9\n0\n");
        assert!(output.contains("Invalid option."));
    }

    #[test]
    fn start_and_toggle_checklist() {
        let mut store = seeded();
        let output = session(&mut store, "1\n1\n2\n1\n2\n0\n");
        assert!(output.contains("Progress: 0/2 (0%)"), "{output}");
        assert!(output.contains("Item updated: now done."), "{output}");

        let checklist = checklist_db::get_checklist(&store, today(), "Delivery")
            .unwrap()
            .unwrap();
        assert!(!checklist.items[0].done);
        assert!(checklist.items[1].done);
    }

    #[test]
    fn out_of_range_toggle_is_reported_and_session_continues() {
        let mut store = seeded();
        let output = session(&mut store, "2\n1\n5\n4\n1\n0\n");
        assert!(output.contains("Error: item 5 is out of range"), "{output}");
        assert!(output.contains("Status:    PENDING"), "{output}");
    }

    #[test]
    fn create_template_from_menu() {
        let mut store = MemoryStore::new();
        session(&mut store, "5\n2\nLimpeza Semanal\nCoifa\nPiso\n\n0\n0\n");
        let templates = catalog::list_templates(&store).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].items, vec!["Coifa", "Piso"]);
    }

    #[test]
    fn restore_needs_sim() {
        let mut store = seeded();
        let output = session(&mut store, "5\n4\nno\n0\n0\n");
        assert!(output.contains("Operation cancelled."));
        assert_eq!(catalog::template_names(&store).unwrap(), vec!["Delivery"]);

        session(&mut store, "5\n4\nSIM\n0\n0\n");
        assert_eq!(
            catalog::list_templates(&store).unwrap().len(),
            catalog::default_templates().len()
        );
    }

    #[test]
    fn cost_flow_register_recipe_and_margin_price() {
        let mut store = MemoryStore::new();
        let script = concat!(
            "6\n",
            "1\nPão\nun\n1,20\n",
            "1\nMolho\ng\n0.05\n",
            "3\nHot Dog\nPão\n1\nQueijo\nMolho\n30\n\n\n",
            "5\n1\n2\n30\n",
            "6\n",
            "0\n0\n"
        );
        let output = session(&mut store, script);
        assert!(output.contains("Ingredient not found"), "{output}");
        assert!(output.contains("Cost:    R$ 2,70"), "{output}");
        assert!(output.contains("updated: R$ 3,86"), "{output}");

        let recipe = costing::find_recipe(&store, "Hot Dog").unwrap().unwrap();
        assert_eq!(recipe.ingredient_lines.len(), 2);
        assert_eq!(recipe.sale_price.map(|p| p.to_string()).as_deref(), Some("3.86"));
    }

    #[test]
    fn full_margin_is_rejected_without_ending_session() {
        let mut store = MemoryStore::new();
        let script = concat!(
            "6\n",
            "1\nPão\nun\n1.20\n",
            "3\nPão na chapa\nPão\n1\n\n5.00\n",
            "5\n1\n2\n100\n",
            "0\n0\n"
        );
        let output = session(&mut store, script);
        assert!(output.contains("Error: margin must be below 100%"), "{output}");
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn oversized_amounts_are_reported_without_ending_session() {
        let mut store = MemoryStore::new();
        let script = concat!(
            "6\n",
            "1\nOuro\nkg\n79228162514264337593543950335\n",
            "3\nBarra\nOuro\n2\n\n",
            "1\nPão\nun\n1000\n",
            "3\nPão na chapa\nPão\n1\n\n\n",
            "5\n1\n2\n99.99999999999999999999999999\n",
            "0\n0\n"
        );
        let output = session(&mut store, script);
        assert!(output.contains("Error: cost of Ouro is too large"), "{output}");
        assert!(output.contains("has no representable price"), "{output}");
        assert!(output.ends_with("Goodbye!\n"));

        assert!(costing::find_recipe(&store, "Barra").unwrap().is_none());
        let recipe = costing::find_recipe(&store, "Pão na chapa").unwrap().unwrap();
        assert_eq!(recipe.sale_price, None);
    }
}
