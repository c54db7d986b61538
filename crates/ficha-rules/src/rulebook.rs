//! The injected reference data every engine operation reads.

use ficha_core::Catalog;

use crate::config::RulesConfig;

/// An immutable catalog bundled with the numeric house rules.
///
/// Built once at startup and shared by reference; tests swap in small
/// synthetic catalogs.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    catalog: Catalog,
    config: RulesConfig,
}

impl RuleBook {
    /// Bundle a catalog with a configuration.
    pub fn new(catalog: Catalog, config: RulesConfig) -> Self {
        Self { catalog, config }
    }

    /// The shipped catalog with default house rules.
    pub fn standard() -> Self {
        Self::new(Catalog::standard(), RulesConfig::default())
    }

    /// The reference tables.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The numeric house rules.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }
}
