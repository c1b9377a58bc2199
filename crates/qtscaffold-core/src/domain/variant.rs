//! Variants: named, fixed sets of file templates sharing one option schema.
//!
//! ```text
//! Variant "qwidget"
//! ├── Schema          (name, className, useForm, uiUsage, ...)
//! ├── GateFamily*     (none for qwidget)
//! └── FileTemplate*   (main.cpp, {{ headerFile }}, {{ sourceFile }}, ...)
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::schema::{Condition, OptionKind, Schema};
use super::version::GateFamily;

// ============================================================================
// VariantId
// ============================================================================

/// Lowercase catalog identifier such as `qtquick`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantId(String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::InvalidVariant(format!(
                "'{id}' is not a valid variant id (use lowercase letters, digits, '-' or '_')"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VariantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// FileTemplate
// ============================================================================

/// One output file: a path pattern and a body, both rendered against the
/// same context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate {
    /// Template name used in error messages, e.g. `qwidget/widget.h`.
    pub name: String,
    /// Output path pattern, e.g. `{{ headerFile }}`.
    pub output: String,
    pub body: String,
    /// The file is produced only when this holds.
    pub when: Option<Condition>,
    /// Copy the body verbatim instead of rendering it.
    pub bypass: bool,
}

impl FileTemplate {
    pub fn new(
        name: impl Into<String>,
        output: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            body: body.into(),
            when: None,
            bypass: false,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }

    pub fn bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    /// Name under which the path pattern is rendered.
    pub fn output_name(&self) -> String {
        format!("{}#path", self.name)
    }
}

// ============================================================================
// Variant
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub title: String,
    pub description: String,
    pub schema: Schema,
    pub gates: Vec<GateFamily>,
    pub files: Vec<FileTemplate>,
}

impl Variant {
    pub fn builder() -> VariantBuilder {
        VariantBuilder::default()
    }

    pub fn gate(&self, name: &str) -> Option<&GateFamily> {
        self.gates.iter().find(|g| g.name() == name)
    }

    /// Structural checks that need no template engine.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::EmptyVariant {
                variant: self.id.to_string(),
            });
        }

        let mut names = HashSet::new();
        for file in &self.files {
            if !names.insert(file.name.as_str()) {
                return Err(DomainError::InvalidVariant(format!(
                    "variant '{}' declares template '{}' twice",
                    self.id, file.name
                )));
            }
            if let Some(condition) = &file.when {
                for option in condition.options() {
                    if !self.schema.declares(option) {
                        return Err(DomainError::UndeclaredField {
                            variant: self.id.to_string(),
                            template: file.name.clone(),
                            field: option.to_string(),
                        });
                    }
                }
            }
        }

        let mut gate_names = HashSet::new();
        for gate in &self.gates {
            if !gate_names.insert(gate.name()) {
                return Err(DomainError::InvalidGate {
                    family: gate.name().to_string(),
                    reason: "declared twice".into(),
                });
            }
            match self.schema.option(gate.option()) {
                Some(spec) if spec.kind == OptionKind::Version && spec.default.is_some() => {}
                Some(_) => {
                    return Err(DomainError::InvalidGate {
                        family: gate.name().to_string(),
                        reason: format!(
                            "input option '{}' must be a version with a default",
                            gate.option()
                        ),
                    });
                }
                None => {
                    return Err(DomainError::InvalidGate {
                        family: gate.name().to_string(),
                        reason: format!("input option '{}' is not declared", gate.option()),
                    });
                }
            }
            gate.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct VariantBuilder {
    id: Option<String>,
    title: String,
    description: String,
    schema: Schema,
    gates: Vec<GateFamily>,
    files: Vec<FileTemplate>,
}

impl VariantBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn gate(mut self, gate: GateFamily) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn file(mut self, file: FileTemplate) -> Self {
        self.files.push(file);
        self
    }

    pub fn build(self) -> Result<Variant, DomainError> {
        let id = self
            .id
            .ok_or_else(|| DomainError::InvalidVariant("variant id is required".into()))?;
        let variant = Variant {
            id: VariantId::new(id)?,
            title: self.title,
            description: self.description,
            schema: self.schema,
            gates: self.gates,
            files: self.files,
        };
        variant.validate()?;
        Ok(variant)
    }
}
