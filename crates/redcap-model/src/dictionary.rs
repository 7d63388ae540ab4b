//! Read-only view over a project's data dictionary.

use std::collections::BTreeMap;

use crate::error::DictionaryError;
use crate::field::{FieldDefinition, FieldType, NON_DATA_TYPES};

/// Ordered, name-indexed collection of field definitions.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    fields: Vec<FieldDefinition>,
    index: BTreeMap<String, usize>,
}

impl DataDictionary {
    /// Build a dictionary, rejecting repeated field names.
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, DictionaryError> {
        let mut index = BTreeMap::new();
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.field_name.clone(), position).is_some() {
                return Err(DictionaryError::DuplicateField {
                    field: field.field_name.clone(),
                });
            }
        }
        Ok(Self { fields, index })
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn lookup(&self, name: &str) -> Result<&FieldDefinition, DictionaryError> {
        self.get(name).ok_or_else(|| DictionaryError::FieldNotFound {
            field: name.to_string(),
        })
    }

    /// A dictionary without the fields whose type is in `types`.
    pub fn excluding_types(&self, types: &[FieldType]) -> DataDictionary {
        let fields: Vec<FieldDefinition> = self
            .fields
            .iter()
            .filter(|field| !types.contains(&field.field_type))
            .cloned()
            .collect();
        let index = fields
            .iter()
            .enumerate()
            .map(|(position, field)| (field.field_name.clone(), position))
            .collect();
        DataDictionary { fields, index }
    }

    /// A dictionary without descriptive, file and calc fields.
    pub fn data_fields(&self) -> DataDictionary {
        self.excluding_types(&NON_DATA_TYPES)
    }

    /// Distinct non-empty form names in order of first appearance.
    pub fn form_names(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = Vec::new();
        for field in &self.fields {
            let form = field.form_name.trim();
            if !form.is_empty() && !forms.contains(&form) {
                forms.push(form);
            }
        }
        forms
    }
}
