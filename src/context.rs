//! Everything one resolution session needs, built from a [`Config`].

use crate::builder::{BuildReport, IndexBuilder};
use crate::classify::SkipList;
use crate::config::Config;
use crate::error::Result;
use crate::index::FolderIndex;
use crate::intent::{Intent, ResolvedIntent};
use crate::resolve::{Disambiguator, Resolution, Resolver};
use crate::store::{Initialized, IndexStore, RefreshPolicy};
use tracing::warn;

pub struct FolderContext {
    config: Config,
    store: IndexStore,
    builder: IndexBuilder,
    resolver: Resolver,
    index: FolderIndex,
}

impl FolderContext {
    pub fn new(config: Config) -> Self {
        let resolver = Resolver::from_config(&config);
        Self::with_resolver(config, resolver)
    }

    /// Use a custom resolver, e.g. one scoring against a fixed home.
    pub fn with_resolver(config: Config, resolver: Resolver) -> Self {
        let skip = SkipList::new(&config.skip_keywords);
        Self {
            store: IndexStore::new(&config.index_path),
            builder: IndexBuilder::new(skip),
            resolver,
            index: FolderIndex::new(),
            config,
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn index(&self) -> &FolderIndex {
        &self.index
    }

    /// Load or build the index for the configured roots.
    pub fn initialize(&mut self, policy: &mut dyn RefreshPolicy) -> Result<Initialized> {
        let init = self
            .store
            .get_or_initialize(&self.builder, &self.config.roots, policy)?;
        self.index = init.index.clone();
        Ok(init)
    }

    /// Rebuild from the configured roots (or drives when `full_scan`) and
    /// save, replacing whatever was stored.
    pub fn rebuild<F>(&mut self, full_scan: bool, on_root: F) -> Result<BuildReport>
    where
        F: FnMut(&std::path::Path),
    {
        let roots = if full_scan {
            &self.config.drives
        } else {
            &self.config.roots
        };
        let mut report = self.builder.build_with_progress(roots, on_root);
        self.store.save(&report.index)?;
        self.index = std::mem::take(&mut report.index);
        Ok(report)
    }

    /// Load the stored index as is. Returns false when there is none.
    pub fn load(&mut self) -> Result<bool> {
        match self.store.load()? {
            Some(index) => {
                self.index = index;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn resolve(
        &self,
        name: Option<&str>,
        allow_fuzzy: bool,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution> {
        self.resolver.resolve(name, &self.index, allow_fuzzy, disambiguator)
    }

    /// Resolve the intent's source and destination folder names.
    pub fn resolve_intent(
        &self,
        intent: Intent,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<ResolvedIntent> {
        let resolved_source_path = self
            .resolve(intent.source.as_deref(), true, disambiguator)?
            .into_path();
        if intent.source.is_some() && resolved_source_path.is_none() {
            warn!(source = ?intent.source, "Could not resolve source folder");
        }

        let resolved_destination_path = self
            .resolve(intent.destination.as_deref(), true, disambiguator)?
            .into_path();
        if intent.destination.is_some() && resolved_destination_path.is_none() {
            warn!(destination = ?intent.destination, "Could not resolve destination folder");
        }

        Ok(ResolvedIntent {
            intent,
            resolved_source_path,
            resolved_destination_path,
        })
    }
}
