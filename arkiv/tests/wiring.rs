//! End-to-end wiring tests: the full bootstrap against real directories,
//! plus the container behaviors the application graph leans on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arkiv::bootstrap::{Bootstrapper, ServiceProvider};
use arkiv::prelude::*;
use arkiv::services::{
    FileEntry, MainModel, PaneModel, PlannedAction, Settings, TreeScanner,
};
use tempfile::TempDir;

fn seed(dir: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

fn two_roots() -> (TempDir, TempDir, Settings) {
    let source = TempDir::new().unwrap();
    let mirror = TempDir::new().unwrap();
    let settings = Settings {
        source_root: source.path().to_path_buf(),
        mirror_root: mirror.path().to_path_buf(),
    };
    (source, mirror, settings)
}

#[test]
fn bootstrap_resolves_the_entry_graph_eagerly() {
    let (_source, _mirror, settings) = two_roots();
    let boot = Bootstrapper::init(settings).unwrap();

    // the entry model is the shared instance, visible through the locator too
    let via_locator: Arc<MainModel> = boot.locator().get().unwrap();
    assert!(Arc::ptr_eq(boot.main(), &via_locator));

    // the locator binding resolves to a working façade
    let locator: Locator = boot.container().resolve().unwrap();
    let _: Arc<MainModel> = locator.get().unwrap();
}

#[test]
fn refresh_plans_copies_and_deletes() {
    let (source, mirror, settings) = two_roots();
    seed(
        source.path(),
        &[("kept.txt", "same"), ("sub/added.txt", "new file")],
    );
    seed(mirror.path(), &[("kept.txt", "same"), ("stale.txt", "old")]);

    let boot = Bootstrapper::init(settings).unwrap();
    let plan = boot.main().refresh().unwrap();

    assert_eq!(
        plan,
        vec![
            PlannedAction::CopyToMirror(PathBuf::from("sub").join("added.txt")),
            PlannedAction::DeleteFromMirror(PathBuf::from("stale.txt")),
        ]
    );
}

#[test]
fn panes_are_keyed_and_fresh_per_use() {
    let (source, mirror, settings) = two_roots();
    let boot = Bootstrapper::init(settings).unwrap();

    let source_pane: Arc<PaneModel> = boot.locator().create_in("source").unwrap();
    let mirror_pane: Arc<PaneModel> = boot.locator().create_in("mirror").unwrap();
    assert_eq!(source_pane.root(), source.path());
    assert_eq!(mirror_pane.root(), mirror.path());

    // per-use view models: every request builds a new pane
    let again: Arc<PaneModel> = boot.locator().create_in("source").unwrap();
    assert!(!Arc::ptr_eq(&source_pane, &again));
}

#[test]
fn rebinding_swaps_in_a_test_double() {
    struct CannedScanner;

    impl TreeScanner for CannedScanner {
        fn scan(&self, _root: &Path) -> io::Result<Vec<FileEntry>> {
            Ok(vec![FileEntry {
                relative: PathBuf::from("canned.txt"),
                len: 1,
            }])
        }
    }

    let (_source, _mirror, settings) = two_roots();

    // same wiring as production, scanner declared again afterwards: the
    // later declaration wins
    let container = Container::builder()
        .add_provider(&ServiceProvider { settings })
        .provide::<Arc<dyn TreeScanner>, _>(|_| {
            Ok(Arc::new(CannedScanner) as Arc<dyn TreeScanner>)
        })
        .build();

    let scanner: Arc<dyn TreeScanner> = container.resolve().unwrap();
    let listing = scanner.scan(Path::new("/nowhere")).unwrap();
    assert_eq!(listing[0].relative, PathBuf::from("canned.txt"));
}

// ============================================================
// Shared/fresh embedding, end to end
// ============================================================

struct Catalog;

struct Browser {
    catalog: Arc<Catalog>,
}

#[test]
fn shared_consumer_embeds_the_shared_dependency() {
    let container = Container::builder()
        .provide::<Arc<Catalog>, _>(|_| Ok(Arc::new(Catalog)))
        .provide::<Arc<Browser>, _>(|r| {
            let catalog: Arc<Catalog> = r.resolve()?;
            Ok(Arc::new(Browser { catalog }))
        })
        .build();

    let first: Arc<Browser> = container.resolve().unwrap();
    let second: Arc<Browser> = container.resolve().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.catalog, &second.catalog));

    // fresh consumers still embed the one shared dependency
    let fresh_a: Arc<Browser> = container.resolve_fresh().unwrap();
    let fresh_b: Arc<Browser> = container.resolve_fresh().unwrap();
    assert!(!Arc::ptr_eq(&fresh_a, &fresh_b));
    assert!(Arc::ptr_eq(&fresh_a.catalog, &fresh_b.catalog));
    assert!(Arc::ptr_eq(&fresh_a.catalog, &first.catalog));
}

#[test]
fn fresh_parameter_changes_the_embedding() {
    let container = Container::builder()
        .provide::<Arc<Catalog>, _>(|_| Ok(Arc::new(Catalog)))
        .provide::<Arc<Browser>, _>({
            let catalog = Dep::<Arc<Catalog>>::fresh();
            move |r| Ok(Arc::new(Browser { catalog: catalog.resolve(r)? }))
        })
        .build();

    let fresh_a: Arc<Browser> = container.resolve_fresh().unwrap();
    let fresh_b: Arc<Browser> = container.resolve_fresh().unwrap();
    assert!(!Arc::ptr_eq(&fresh_a.catalog, &fresh_b.catalog));
}
