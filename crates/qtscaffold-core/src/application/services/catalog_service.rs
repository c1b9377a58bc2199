//! Catalog Service - variant listing and lookup.
//!
//! Separated from ScaffoldService for single responsibility.

use crate::{
    application::{ApplicationError, ports::VariantCatalog},
    domain::Variant,
    error::ScaffoldResult,
};

/// Information about a variant for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: usize,
    pub files: usize,
    pub gates: Vec<String>,
}

impl From<&Variant> for VariantInfo {
    fn from(v: &Variant) -> Self {
        Self {
            id: v.id.to_string(),
            title: v.title.clone(),
            description: v.description.clone(),
            options: v.schema.options().len(),
            files: v.files.len(),
            gates: v.gates.iter().map(|g| g.name().to_string()).collect(),
        }
    }
}

pub struct CatalogService<'a> {
    catalog: &'a dyn VariantCatalog,
}

impl<'a> CatalogService<'a> {
    pub fn new(catalog: &'a dyn VariantCatalog) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> ScaffoldResult<Vec<VariantInfo>> {
        Ok(self.catalog.list()?.iter().map(VariantInfo::from).collect())
    }

    pub fn ids(&self) -> ScaffoldResult<Vec<String>> {
        Ok(self
            .catalog
            .list()?
            .into_iter()
            .map(|v| v.id.to_string())
            .collect())
    }

    /// Look up a variant; unknown ids fail with the available ones listed.
    pub fn get(&self, id: &str) -> ScaffoldResult<Variant> {
        match self.catalog.find(id)? {
            Some(variant) => Ok(variant),
            None => Err(ApplicationError::VariantNotFound {
                variant: id.to_string(),
                available: self.ids()?,
            }
            .into()),
        }
    }
}
