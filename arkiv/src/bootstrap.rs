//! Startup wiring.
//!
//! Declares every binding once, then eagerly resolves the [`Locator`] and
//! the entry model — a wiring mistake therefore surfaces at startup, not in
//! the middle of a reconciliation run.

use std::sync::Arc;

use tracing::info;

use arkiv_container::prelude::*;

use crate::services::{
    BasicReconciler, FixedSettings, LocalTreeScanner, MainModel, PaneModel, Reconciler, Settings,
    SettingsStore, TreeScanner,
};

/// Bindings for the service layer.
pub struct ServiceProvider {
    pub settings: Settings,
}

impl Provider for ServiceProvider {
    fn register(&self, registry: &mut dyn ProviderRegistry) {
        let settings = self.settings.clone();
        registry.provide::<Arc<dyn SettingsStore>, _>(move |_| {
            Ok(Arc::new(FixedSettings::new(settings.clone())) as Arc<dyn SettingsStore>)
        });
        registry.provide::<Arc<dyn TreeScanner>, _>(|_| {
            Ok(Arc::new(LocalTreeScanner) as Arc<dyn TreeScanner>)
        });
        registry.provide::<Arc<dyn Reconciler>, _>(|_| {
            Ok(Arc::new(BasicReconciler) as Arc<dyn Reconciler>)
        });
    }
}

/// Owns the container for the application's lifetime.
///
/// Everything downstream holds a [`Locator`] clone; dropping the
/// bootstrapper is the teardown.
pub struct Bootstrapper {
    container: Container,
    locator: Locator,
    main: Arc<MainModel>,
}

impl Bootstrapper {
    /// Declares all bindings and eagerly resolves the entry graph.
    pub fn init(settings: Settings) -> Result<Self> {
        let container = Container::builder()
            .add_provider(&ServiceProvider { settings })
            .provide::<Locator, _>(|r| Ok(r.locator()))
            .provide_in::<Arc<PaneModel>, _>("source", |r| {
                let store: Arc<dyn SettingsStore> = r.resolve()?;
                let scanner: Arc<dyn TreeScanner> = r.resolve()?;
                Ok(Arc::new(PaneModel::new(scanner, store.current().source_root)))
            })
            .provide_in::<Arc<PaneModel>, _>("mirror", |r| {
                let store: Arc<dyn SettingsStore> = r.resolve()?;
                let scanner: Arc<dyn TreeScanner> = r.resolve()?;
                Ok(Arc::new(PaneModel::new(scanner, store.current().mirror_root)))
            })
            .provide::<Arc<MainModel>, _>({
                // parameter plan for the entry model, derived once
                let reconciler = Dep::<Arc<dyn Reconciler>>::shared();
                move |r| Ok(Arc::new(MainModel::new(r.locator(), reconciler.resolve(r)?)))
            })
            .build();

        let locator: Locator = container.resolve()?;
        let main: Arc<MainModel> = container.resolve()?;
        info!("bootstrap complete");

        Ok(Self {
            container,
            locator,
            main,
        })
    }

    /// The root container handle.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Resolution façade for consumers.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// The eagerly resolved entry model.
    pub fn main(&self) -> &Arc<MainModel> {
        &self.main
    }
}
