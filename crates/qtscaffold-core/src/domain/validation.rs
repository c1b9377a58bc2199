use crate::domain::{
    error::DomainError, project::RenderedProject, variant::Variant, version::GateFamily,
};

/// Centralized domain validation.
///
/// Structural rules live on the entities; this is the single entry point
/// services call.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_variant(variant: &Variant) -> Result<(), DomainError> {
        variant.validate()
    }

    pub fn validate_gate(family: &GateFamily) -> Result<(), DomainError> {
        family.validate()
    }

    pub fn validate_project(project: &RenderedProject) -> Result<(), DomainError> {
        project.validate()
    }
}
