//! Wires the application graph against two throwaway directories and prints
//! the reconciliation plan.
//!
//! Run with: `cargo run -p arkiv --example reconcile`

use std::error::Error;
use std::fs;
use std::path::Path;

use arkiv::bootstrap::Bootstrapper;
use arkiv::services::{PlannedAction, Settings};

fn seed(dir: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
    for (relative, contents) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("arkiv=debug,arkiv_container=trace")
        .init();

    let workdir = std::env::temp_dir().join(format!("arkiv-demo-{}", std::process::id()));
    let source = workdir.join("source");
    let mirror = workdir.join("mirror");
    fs::create_dir_all(&source)?;
    fs::create_dir_all(&mirror)?;

    seed(
        &source,
        &[
            ("notes/todo.txt", "buy film"),
            ("photos/roll-01.raw", "pretend raw data"),
            ("index.txt", "v2"),
        ],
    )?;
    seed(&mirror, &[("index.txt", "v1-old"), ("leftover.tmp", "x")])?;

    let boot = Bootstrapper::init(Settings {
        source_root: source,
        mirror_root: mirror,
    })?;

    let plan = boot.main().refresh()?;
    println!("{} pending action(s):", plan.len());
    for action in &plan {
        match action {
            PlannedAction::CopyToMirror(path) => println!("  copy   {}", path.display()),
            PlannedAction::DeleteFromMirror(path) => println!("  delete {}", path.display()),
        }
    }

    fs::remove_dir_all(&workdir)?;
    Ok(())
}
