// 📋 Form Definitions - Fields, their types and display options
// Renders a whole record through the field formatter and prefills drafts

use crate::config::options_from_column;
use crate::formatting::{format_field, FieldFormatOptions, FieldType};
use crate::prefill::{merge_client_prefill, prefilled_keys};
use crate::value::{FieldValue, FieldValues};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

// ============================================================================
// FORM FIELD
// ============================================================================

/// FormField - One field of a form or report template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Key used in form values and client records (e.g. "pan")
    pub key: String,

    /// Label shown to the user (e.g. "PAN")
    pub label: String,

    pub field_type: FieldType,

    /// Display options; accepts an object or the stored JSON string
    #[serde(default, deserialize_with = "deserialize_format")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormatOptions>,

    #[serde(default)]
    pub required: bool,
}

impl FormField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        FormField {
            key: key.into(),
            label: label.into(),
            field_type: field_type.into(),
            format: None,
            required: false,
        }
    }

    /// Builder: display options
    pub fn with_format(mut self, options: FieldFormatOptions) -> Self {
        self.format = Some(options);
        self
    }

    /// Builder: mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Format a value of this field for display
    pub fn display(&self, value: &FieldValue) -> String {
        format_field(value, &self.field_type, self.format.as_ref())
    }
}

fn deserialize_format<'de, D>(deserializer: D) -> std::result::Result<Option<FieldFormatOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Ok(options_from_column(Some(&raw))),
        Some(other) => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// RENDERED FIELD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub key: String,
    pub label: String,
    pub display: String,
}

// ============================================================================
// FORM DEFINITION
// ============================================================================

/// FormDefinition - An ordered list of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        FormDefinition {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: append a field
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Parse a definition from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse form definition JSON")
    }

    /// Load a definition from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read form definition: {:?}", path.as_ref()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid form definition: {:?}", path.as_ref()))
    }

    /// Get a field by key
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field keys in display order
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    /// Format every field in order; missing values render as absent
    pub fn render(&self, values: &FieldValues) -> Vec<RenderedField> {
        self.fields
            .iter()
            .map(|field| {
                let value = values.get(&field.key).unwrap_or(&FieldValue::Absent);
                RenderedField {
                    key: field.key.clone(),
                    label: field.label.clone(),
                    display: field.display(value),
                }
            })
            .collect()
    }

    /// Fill blanks in a draft from the attached client's record
    pub fn prefill(&self, form_values: &FieldValues, client_values: &FieldValues) -> FieldValues {
        let merged = merge_client_prefill(form_values, client_values);

        let filled = prefilled_keys(form_values, &merged);
        tracing::debug!(form = %self.id, filled = filled.len(), "prefilled form from client record");

        merged
    }

    /// Required fields that are still blank
    pub fn missing_required(&self, values: &FieldValues) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| values.get(&f.key).map_or(true, FieldValue::is_blank))
            .map(|f| f.key.clone())
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
