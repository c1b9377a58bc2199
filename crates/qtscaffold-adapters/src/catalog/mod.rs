//! Variant catalog adapters.

mod builtin;
mod directory;

pub use builtin::{BuiltinCatalog, qtquick, qwidget};
pub use directory::{DirectoryCatalog, MANIFEST_FILE, VariantManifest, load_manifest};

use qtscaffold_core::{application::ports::VariantCatalog, domain::Variant, error::ScaffoldResult};

/// Several catalogs searched in order. The first catalog that knows an id
/// wins, so a custom directory placed first shadows a built-in variant.
pub struct LayeredCatalog {
    layers: Vec<Box<dyn VariantCatalog>>,
}

impl LayeredCatalog {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn layer(mut self, catalog: impl VariantCatalog + 'static) -> Self {
        self.layers.push(Box::new(catalog));
        self
    }
}

impl Default for LayeredCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantCatalog for LayeredCatalog {
    fn list(&self) -> ScaffoldResult<Vec<Variant>> {
        let mut variants: Vec<Variant> = Vec::new();
        for layer in &self.layers {
            for variant in layer.list()? {
                if !variants.iter().any(|v| v.id == variant.id) {
                    variants.push(variant);
                }
            }
        }
        variants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(variants)
    }

    fn find(&self, id: &str) -> ScaffoldResult<Option<Variant>> {
        for layer in &self.layers {
            if let Some(variant) = layer.find(id)? {
                return Ok(Some(variant));
            }
        }
        Ok(None)
    }
}
