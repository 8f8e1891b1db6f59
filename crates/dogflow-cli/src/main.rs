mod checklist_cmds;
mod config;
mod format;
mod ingredient_cmds;
mod menu;
mod recipe_cmds;
mod report_cmd;
mod template_cmds;
mod tui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use dogflow_core::catalog;
use dogflow_db::JsonFileStore;
use dogflow_db::config::StoreConfig;

use config::DogflowConfig;

#[derive(Parser)]
#[command(
    name = "dogflow",
    version,
    about = "Opening/closing checklists and recipe costing for a food counter"
)]
struct Cli {
    /// Path of the JSON data file (overrides DOGFLOW_DB_PATH env var)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Omit to start the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a dogflow config file (store path from --db-path)
    Init {
        /// Currency symbol shown before amounts
        #[arg(long)]
        currency: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Interactive numbered menu (default)
    Menu,
    /// Checklist template management
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Daily checklists
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommands,
    },
    /// Priced ingredients
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
    /// Recipes (bill of materials, cost and sale price)
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Execution and cost reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Launch interactive TUI dashboard
    Dashboard,
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List templates and their items
    List,
    /// Create a template, or replace the items of an existing one
    Create {
        /// Template name
        name: String,
        /// Checklist item, in order (repeat for each item)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Delete a template (checklists already started are kept)
    Delete {
        /// Template name
        name: String,
    },
    /// Replace every template with the built-in set
    Restore {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ChecklistCommands {
    /// Start (or load) the checklist for a template
    Start {
        /// Template name
        template: String,
        /// Day of the checklist, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Check or uncheck one item
    Toggle {
        /// Template name
        template: String,
        /// Item number, starting at 1
        item: usize,
        /// Day of the checklist, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show one checklist, or all checklists of the day
    Show {
        /// Template name (omit to show every checklist of the day)
        template: Option<String>,
        /// Day of the checklist, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the shift summary of a checklist
    Finish {
        /// Template name
        template: String,
        /// Day of the checklist, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Register an ingredient, or update its unit and cost
    Add {
        /// Ingredient name
        name: String,
        /// Base unit (e.g. un, kg, L, g, ml)
        #[arg(long, default_value = "un")]
        unit: String,
        /// Cost per base unit (e.g. 1.20 or 1,20)
        #[arg(long, allow_hyphen_values = true)]
        cost: String,
    },
    /// List ingredients
    List,
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Create or replace a recipe from registered ingredients
    Save {
        /// Final product name
        product: String,
        /// Ingredient and quantity in its base unit (repeat for each ingredient)
        #[arg(long = "line", value_name = "NAME=QTY", required = true)]
        lines: Vec<String>,
        /// Sale price
        #[arg(long)]
        price: Option<String>,
    },
    /// List recipes with their ingredients
    List,
    /// Set the sale price directly or from a target margin
    Price {
        /// Product name
        product: String,
        /// Sale price
        #[arg(long, conflicts_with = "margin", required_unless_present = "margin")]
        price: Option<String>,
        /// Target margin in percent of the sale price (below 100)
        #[arg(long, allow_hyphen_values = true)]
        margin: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Progress of the day's checklists
    Today {
        /// Day to report, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Progress of every checklist ever started
    History,
    /// Cost, price and margin per recipe
    Costs,
}

/// Execute the `dogflow init` command: write config file.
fn cmd_init(db_path: Option<&Path>, currency: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let store_path = db_path
        .map(Path::to_path_buf)
        .unwrap_or_else(StoreConfig::default_path);
    let currency = currency.unwrap_or(config::DEFAULT_CURRENCY);

    let cfg = config::ConfigFile {
        store: config::StoreSection {
            path: Some(store_path.clone()),
        },
        display: config::DisplaySection {
            currency_symbol: Some(currency.to_string()),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  store.path = {}", store_path.display());
    println!("  display.currency_symbol = {currency}");

    Ok(())
}

/// Open the store, seed the built-in templates if needed, and run a
/// store-backed command.
fn run_with_store(command: Commands, cli_db_path: Option<&Path>) -> anyhow::Result<()> {
    let resolved = DogflowConfig::resolve(cli_db_path)?;
    let mut store = JsonFileStore::open(&resolved.store_config).with_context(|| {
        format!(
            "failed to open data file {}",
            resolved.store_config.path.display()
        )
    })?;
    catalog::ensure_default_templates(&mut store)?;

    let currency = resolved.currency_symbol.as_str();
    let mut out = io::stdout().lock();

    match command {
        Commands::Menu => {
            menu::Menu::new(&mut store, io::stdin().lock(), out, currency, format::today()).run()?;
        }
        Commands::Template { command } => {
            template_cmds::run_template_command(command, &mut store, &mut io::stdin().lock(), &mut out)?;
        }
        Commands::Checklist { command } => {
            checklist_cmds::run_checklist_command(command, &mut store, &mut out)?;
        }
        Commands::Ingredient { command } => {
            ingredient_cmds::run_ingredient_command(command, &mut store, &mut out, currency)?;
        }
        Commands::Recipe { command } => {
            recipe_cmds::run_recipe_command(command, &mut store, &mut out, currency)?;
        }
        Commands::Report { command } => {
            report_cmd::run_report_command(command, &store, &mut out, currency)?;
        }
        Commands::Dashboard => {
            drop(out);
            tui::run_dashboard(store, currency, format::today())?;
        }
        Commands::Init { .. } | Commands::Completions { .. } => {
            anyhow::bail!("this command does not use the data file");
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init { currency, force } => {
            cmd_init(cli.db_path.as_deref(), currency.as_deref(), force)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dogflow", &mut io::stdout());
            Ok(())
        }
        command => run_with_store(command, cli.db_path.as_deref()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["dogflow"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn recipe_price_requires_exactly_one_mode() {
        assert!(Cli::try_parse_from(["dogflow", "recipe", "price", "Hot Dog"]).is_err());
        assert!(
            Cli::try_parse_from([
                "dogflow", "recipe", "price", "Hot Dog", "--price", "5", "--margin", "30"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["dogflow", "recipe", "price", "Hot Dog", "--margin", "30"]).is_ok());
    }

    #[test]
    fn global_db_path_after_subcommand() {
        let cli = Cli::try_parse_from(["dogflow", "report", "history", "--db-path", "/tmp/x.json"])
            .unwrap();
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/x.json")));
    }
}
