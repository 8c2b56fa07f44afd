//! Record schemas: the flag fields of one record type, declared in configuration.
//!
//! ```toml
//! [fields.flags_1]
//! flags = ["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]
//! default = ["FLAG_1", "FLAG_2"]
//!
//! [fields.flags_2]
//! flags = ["FLAG_4", "FLAG_5", "FLAG_6", "FLAG_7"]
//!
//! [composites]
//! flags = ["flags_1", "flags_2"]
//! ```

use crate::config::load_config;
use crate::error::{KernelError, KernelErrorExt};
use bitf_core::{BitHandler, CompositeField, CompositeView, FieldDeclaration, FieldSpec, FlagError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// The declaration of a record schema as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDeclaration>,
    /// Composite name to its member field names, in lookup order.
    #[serde(default)]
    pub composites: BTreeMap<String, Vec<String>>,
}

impl SchemaConfig {
    /// Loads a schema declaration through [`load_config`].
    ///
    /// # Errors
    /// Returns [`KernelError::Config`] if the source is missing or malformed.
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self, KernelError> {
        load_config(path)
    }

    /// Validates every field and composite.
    ///
    /// # Errors
    /// * [`KernelError::Flag`] for an invalid field declaration, a composite whose members share
    ///   a flag name, or a composite named like a field.
    /// * [`KernelError::UnknownField`] for a composite member that is not a declared field.
    pub fn compile(&self) -> Result<RecordSchema, KernelError> {
        let mut fields = BTreeMap::new();
        for (name, declaration) in &self.fields {
            let spec = declaration.compile().context(format!("Compiling field `{name}`"))?;
            debug!(field = %name, flags = spec.registry().len(), "Compiled field");
            fields.insert(name.clone(), spec);
        }

        let mut composites = BTreeMap::new();
        for (name, members) in &self.composites {
            if fields.contains_key(name) {
                return Err(KernelError::Flag {
                    source: FlagError::Validation {
                        message: format!("composite `{name}` shadows a field").into(),
                        context: None,
                    },
                    context: Some(format!("Compiling composite `{name}`").into()),
                });
            }
            let registries = members
                .iter()
                .map(|member| {
                    fields
                        .get(member)
                        .map(|spec: &FieldSpec| (member.as_str(), spec.registry()))
                        .ok_or_else(|| KernelError::unknown_field(member))
                })
                .collect::<Result<Vec<_>, _>>()
                .context(format!("Compiling composite `{name}`"))?;
            let composite = CompositeField::declare(name.clone(), registries)
                .context(format!("Compiling composite `{name}`"))?;
            composites.insert(name.clone(), composite);
        }

        info!(fields = fields.len(), composites = composites.len(), "Record schema ready");
        Ok(RecordSchema { fields, composites })
    }
}

/// A validated set of flag fields and composites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    fields: BTreeMap<String, FieldSpec>,
    composites: BTreeMap<String, CompositeField>,
}

impl RecordSchema {
    /// Loads and compiles a schema in one step.
    ///
    /// # Errors
    /// See [`SchemaConfig::load`] and [`SchemaConfig::compile`].
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self, KernelError> {
        SchemaConfig::load(path)?.compile()
    }

    /// # Errors
    /// Returns [`KernelError::UnknownField`] if no field has this name.
    pub fn field(&self, name: &str) -> Result<&FieldSpec, KernelError> {
        self.fields.get(name).ok_or_else(|| KernelError::unknown_field(name))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn composite(&self, name: &str) -> Option<&CompositeField> {
        self.composites.get(name)
    }

    pub fn composites(&self) -> impl Iterator<Item = &CompositeField> {
        self.composites.values()
    }

    /// A record where every field holds its declared default.
    #[must_use]
    pub fn default_record(&self) -> Record<'_> {
        let handlers = self
            .fields
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default_handler()))
            .collect();
        Record { schema: self, handlers }
    }

    /// Builds a record from stored column values. Fields without a value keep their default;
    /// `None` reads as 0.
    ///
    /// # Errors
    /// Returns [`KernelError::UnknownField`] for a value whose field is not declared.
    pub fn record<I, K>(&self, values: I) -> Result<Record<'_>, KernelError>
    where
        I: IntoIterator<Item = (K, Option<i64>)>,
        K: AsRef<str>,
    {
        let mut record = self.default_record();
        for (name, stored) in values {
            let name = name.as_ref();
            let handler = self.field(name)?.load(stored);
            record.handlers.insert(name.to_owned(), handler);
        }
        Ok(record)
    }
}

/// One record: a handler per declared field, all bound to the schema's registries.
#[derive(Debug, Clone)]
pub struct Record<'s> {
    schema: &'s RecordSchema,
    handlers: BTreeMap<String, BitHandler>,
}

impl Record<'_> {
    /// # Errors
    /// Returns [`KernelError::UnknownField`] if no field has this name.
    pub fn field(&self, name: &str) -> Result<&BitHandler, KernelError> {
        self.handlers.get(name).ok_or_else(|| KernelError::unknown_field(name))
    }

    /// # Errors
    /// Returns [`KernelError::UnknownField`] if no field has this name.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut BitHandler, KernelError> {
        self.handlers.get_mut(name).ok_or_else(|| KernelError::unknown_field(name))
    }

    /// A forwarding view over the members of a composite.
    ///
    /// # Errors
    /// Returns [`KernelError::UnknownField`] if no composite has this name.
    pub fn composite(&mut self, name: &str) -> Result<CompositeView<'_>, KernelError> {
        let schema = self.schema;
        let composite = schema.composite(name).ok_or_else(|| KernelError::unknown_field(name))?;

        let mut handlers: BTreeMap<&str, &mut BitHandler> = self
            .handlers
            .iter_mut()
            .filter(|(field, _)| composite.members().contains(*field))
            .map(|(field, handler)| (field.as_str(), handler))
            .collect();
        let members =
            composite.members().iter().filter_map(|member| handlers.remove(member.as_str())).collect();
        Ok(CompositeView::new(members))
    }

    /// Replaces a field's value wholesale, recovering negative values.
    ///
    /// # Errors
    /// * [`KernelError::Flag`] wrapping [`FlagError::Unsupported`] when `name` is a composite.
    /// * [`KernelError::UnknownField`] if no field has this name.
    pub fn set_value(&mut self, name: &str, value: i64) -> Result<(), KernelError> {
        if self.schema.composite(name).is_some() {
            return Err(FlagError::Unsupported {
                message: format!("composite `{name}` cannot be assigned, set its flags instead")
                    .into(),
                context: None,
            }
            .into());
        }
        let registry = self.schema.field(name)?.registry().clone();
        *self.field_mut(name)? = BitHandler::new(value, registry);
        Ok(())
    }

    /// The integers to persist, one per field.
    pub fn values(&self) -> impl Iterator<Item = (&str, i64)> {
        self.handlers.iter().map(|(name, handler)| (name.as_str(), handler.value()))
    }
}
