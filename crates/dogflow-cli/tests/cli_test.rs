//! End-to-end tests for the `dogflow` binary.
//!
//! Each test runs the compiled binary against a data file in its own temp
//! directory, with `XDG_CONFIG_HOME` pointed at the same directory so no
//! user config is picked up.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

use dogflow_db::JsonFileStore;
use dogflow_db::queries::{ingredients, recipes};
use dogflow_test_utils::{dec, temp_json_store};

fn dogflow(dir: &Path, db: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dogflow"))
        .args(args)
        .arg("--db-path")
        .arg(db)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("DOGFLOW_DB_PATH")
        .env_remove("DOGFLOW_CURRENCY")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn dogflow");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().expect("dogflow did not finish")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_ok(dir: &Path, db: &Path, args: &[&str]) -> String {
    let output = dogflow(dir, db, args, "");
    assert!(
        output.status.success(),
        "dogflow {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    stdout(&output)
}

#[test]
fn first_run_seeds_default_templates() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data").join("dogflow_db.json");

    let output = run_ok(dir.path(), &db, &["template", "list"]);
    assert!(output.contains("Template: Abertura – Hot Dog (10 items)"), "{output}");
    assert!(db.exists());
}

#[test]
fn checklist_lifecycle() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dogflow_db.json");

    run_ok(
        dir.path(),
        &db,
        &["template", "create", "Delivery", "--item", "Embalar", "--item", "Etiquetar"],
    );
    let output = run_ok(
        dir.path(),
        &db,
        &["checklist", "toggle", "Delivery", "1", "--date", "2026-10-19"],
    );
    assert!(output.contains("Progress: 1/2 (50%)"), "{output}");
    run_ok(
        dir.path(),
        &db,
        &["checklist", "toggle", "Delivery", "2", "--date", "2026-10-19"],
    );

    let output = run_ok(
        dir.path(),
        &db,
        &["checklist", "finish", "Delivery", "--date", "2026-10-19"],
    );
    assert!(output.contains("APPROVED"), "{output}");

    let output = run_ok(dir.path(), &db, &["report", "history"]);
    assert!(output.contains("2026-10-19 | Delivery"), "{output}");
    assert!(output.contains("02/02 => 100%"), "{output}");
}

#[test]
fn recipe_costing_reads_seeded_store() {
    let (mut store, config, dir) = temp_json_store();
    for (name, unit, cost) in [("Pão", "un", "1.20"), ("Molho", "g", "0.05")] {
        ingredients::insert_ingredient(
            &mut store,
            &dogflow_db::models::NewIngredient {
                name: name.into(),
                unit: unit.into(),
                unit_cost: dec(cost),
            },
        )
        .unwrap();
    }
    drop(store);

    let output = run_ok(
        dir.path(),
        &config.path,
        &["recipe", "save", "Hot Dog", "--line", "Pão=1", "--line", "Molho=30"],
    );
    assert!(output.contains("R$ 2,70"), "{output}");

    let output = run_ok(
        dir.path(),
        &config.path,
        &["recipe", "price", "Hot Dog", "--margin", "30"],
    );
    assert!(output.contains("R$ 3,86"), "{output}");

    let reopened = JsonFileStore::open(&config).unwrap();
    let recipe = recipes::get_recipe_by_name(&reopened, "Hot Dog")
        .unwrap()
        .unwrap();
    assert_eq!(recipe.total_cost, dec("2.70"));
    assert_eq!(recipe.sale_price, Some(dec("3.86")));
}

#[test]
fn operation_errors_exit_non_zero() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dogflow_db.json");

    let output = dogflow(dir.path(), &db, &["template", "delete", "Fantasma"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn corrupt_data_file_aborts_menu() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dogflow_db.json");
    std::fs::write(&db, "{ not json").unwrap();

    let output = dogflow(dir.path(), &db, &[], "0\n");
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(&db).unwrap(), "{ not json");
}

#[test]
fn menu_session_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dogflow_db.json");

    let output = dogflow(dir.path(), &db, &["menu"], "1\n1\n3\n0\n");
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Checklist ready."), "{text}");
    assert!(text.contains("Abertura – Hot Dog -"), "{text}");
    assert!(text.ends_with("Goodbye!\n"), "{text}");
}

#[test]
fn init_writes_config_and_currency_is_used() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dogflow_db.json");

    run_ok(dir.path(), &db, &["init", "--currency", "US$"]);
    let config = std::fs::read_to_string(dir.path().join("dogflow").join("config.toml")).unwrap();
    assert!(config.contains("currency_symbol = \"US$\""), "{config}");

    let output = dogflow(dir.path(), &db, &["init"], "");
    assert!(!output.status.success(), "init without --force must not overwrite");

    let output = run_ok(
        dir.path(),
        &db,
        &["ingredient", "add", "Pão", "--cost", "1,20"],
    );
    assert!(output.contains("US$ 1,20 per un"), "{output}");
}
