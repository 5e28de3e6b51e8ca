// ⚙️ Format Config - Decode the JSON format-options column
// Strict parser for import/validation, lenient one for display paths

use crate::formatting::FieldFormatOptions;
use anyhow::{Context, Result};
use serde_json::Value;

/// Parse a stored format-options column
///
/// Blank text and JSON `null` mean "no options". Unknown keys are ignored;
/// malformed JSON or wrongly typed members are an error.
pub fn parse_format_options(raw: &str) -> Result<Option<FieldFormatOptions>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(raw).context("Format options are not valid JSON")?;
    if value.is_null() {
        return Ok(None);
    }

    let options = serde_json::from_value(value).context("Format options have an unexpected shape")?;
    Ok(Some(options))
}

/// Lenient variant for rendering: bad config falls back to "no options"
///
/// The formatter then takes its plain-stringify path for that field.
pub fn options_from_column(raw: Option<&str>) -> Option<FieldFormatOptions> {
    let raw = raw?;
    match parse_format_options(raw) {
        Ok(options) => options,
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::warn!(error = %reason, "ignoring unreadable format options");
            None
        }
    }
}
