// 🎨 Field Formatter - Raw field value → display string
//
// Three stages, always in this order:
// 1. Short-circuit: no options (fast path) or a nullish value
// 2. Type dispatch: date / number / everything else
// 3. Decoration: prefix + core + suffix

use crate::dates::{format_date, DateFormat};
use crate::value::{number_to_string, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// FIELD TYPE
// ============================================================================

/// FieldType - Which formatting branch a field takes
///
/// Matched case-insensitively; text, select, checkbox and anything unknown
/// all land in `Other` and keep their original tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Date,
    Number,
    Other(String),
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Other(tag) => tag,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("date") {
            FieldType::Date
        } else if tag.eq_ignore_ascii_case("number") {
            FieldType::Number
        } else {
            FieldType::Other(tag.to_string())
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from(tag.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.name().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// FORMAT OPTIONS
// ============================================================================

/// Case transform for text-like fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextTransform {
    Uppercase,
    Lowercase,
    /// Any tag we don't recognise: leave the text alone
    Unchanged,
}

impl TextTransform {
    fn apply(&self, text: String) -> String {
        match self {
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Unchanged => text,
        }
    }
}

impl From<String> for TextTransform {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "uppercase" => TextTransform::Uppercase,
            "lowercase" => TextTransform::Lowercase,
            _ => TextTransform::Unchanged,
        }
    }
}

impl From<TextTransform> for String {
    fn from(transform: TextTransform) -> Self {
        let tag = match transform {
            TextTransform::Uppercase => "uppercase",
            TextTransform::Lowercase => "lowercase",
            TextTransform::Unchanged => "none",
        };
        tag.to_string()
    }
}

/// FieldFormatOptions - Per-field display configuration
///
/// Stored by the app as a JSON column with camelCase keys. Every option is
/// optional; see `crate::config` for decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldFormatOptions {
    /// Date layout (date fields only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,

    /// Fixed-point places (number fields only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,

    /// Prepended to a formatted number, e.g. "₹" or "$"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,

    /// Case transform (text-like fields only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TextTransform>,

    /// Always applied, whatever the field type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl FieldFormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: date layout
    pub fn with_date_format(mut self, format: impl Into<DateFormat>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Builder: fixed-point places
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Builder: currency symbol
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = Some(symbol.into());
        self
    }

    /// Builder: case transform
    pub fn with_transform(mut self, transform: TextTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builder: prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Builder: suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Format one field value for display
///
/// `field_type` is the stored tag ("date", "Number", "text", ...).
/// Never fails: bad input comes back as its own string.
pub fn apply_field_formatting(
    value: &FieldValue,
    field_type: &str,
    options: Option<&FieldFormatOptions>,
) -> String {
    format_field(value, &FieldType::from(field_type), options)
}

/// Same as `apply_field_formatting`, for an already parsed field type
pub fn format_field(
    value: &FieldValue,
    field_type: &FieldType,
    options: Option<&FieldFormatOptions>,
) -> String {
    let options = match short_circuit(value, options) {
        Ok(options) => options,
        Err(done) => return done,
    };

    let core = format_core(value, field_type, options);
    decorate(core, options)
}

/// Stage 1: Err carries the final string when no further stage runs
fn short_circuit<'o>(
    value: &FieldValue,
    options: Option<&'o FieldFormatOptions>,
) -> Result<&'o FieldFormatOptions, String> {
    match options {
        // Fast path: plain stringify, no decoration
        None => Err(value.to_string()),
        // Empty value beats prefix/suffix
        Some(_) if value.is_nullish() => Err(String::new()),
        Some(options) => Ok(options),
    }
}

/// Stage 2: type-specific formatting
fn format_core(value: &FieldValue, field_type: &FieldType, options: &FieldFormatOptions) -> String {
    match field_type {
        FieldType::Date => format_date_value(value, options.date_format.unwrap_or_default()),
        FieldType::Number => format_number_value(value, options),
        FieldType::Other(_) => {
            let text = value.to_string();
            match options.transform {
                Some(transform) => transform.apply(text),
                None => text,
            }
        }
    }
}

/// Stage 3: prefix and suffix, for every field type
fn decorate(core: String, options: &FieldFormatOptions) -> String {
    let prefix = options.prefix.as_deref().unwrap_or_default();
    let suffix = options.suffix.as_deref().unwrap_or_default();

    if prefix.is_empty() && suffix.is_empty() {
        return core;
    }
    format!("{}{}{}", prefix, core, suffix)
}

fn format_date_value(value: &FieldValue, format: DateFormat) -> String {
    match value {
        FieldValue::Date(d) => format_date(*d, format),
        FieldValue::DateTime(dt) => format_date(*dt, format),
        FieldValue::Text(s) => format_date(s, format),
        // Falsy values count as an empty date
        FieldValue::Number(n) if *n == 0.0 || n.is_nan() => format_date("", format),
        FieldValue::Bool(false) => format_date("", format),
        other => format_date(&other.to_string(), format),
    }
}

fn format_number_value(value: &FieldValue, options: &FieldFormatOptions) -> String {
    let Some(n) = coerce_number(value) else {
        tracing::trace!(?value, "non-numeric value in number field, passing through");
        return value.to_string();
    };

    let digits = match options.decimals {
        Some(decimals) => to_fixed(n, decimals),
        None => number_to_string(n),
    };

    match &options.currency_symbol {
        Some(symbol) => format!("{}{}", symbol, digits),
        None => digits,
    }
}

/// Numbers pass through, text is parsed; NaN and anything else is not a number
///
/// Infinity stays a number; in text only the "Infinity" spelling counts.
fn coerce_number(value: &FieldValue) -> Option<f64> {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => parse_number_text(s.trim())?,
        _ => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn parse_number_text(text: &str) -> Option<f64> {
    let unsigned = text.trim_start_matches(['+', '-']);
    if unsigned.eq_ignore_ascii_case("inf")
        || (unsigned.eq_ignore_ascii_case("infinity") && unsigned != "Infinity")
    {
        return None;
    }
    text.parse::<f64>().ok()
}

// ============================================================================
// FIXED-POINT ROUNDING
// ============================================================================

const MAX_DECIMALS: u32 = 100;

/// Fixed-point string with exact halves rounded away from zero (3.7 → "4", 2.5 → "3")
fn to_fixed(n: f64, decimals: u32) -> String {
    let places = decimals.min(MAX_DECIMALS) as usize;

    if n.is_infinite() {
        return number_to_string(n);
    }
    if n < 0.0 {
        return format!("-{}", to_fixed(-n, decimals));
    }

    // std rounds exact ties to even; step just above the tie instead.
    // -0.0 lands here too and must print without a sign.
    let n = if n == 0.0 {
        0.0
    } else if is_exact_tie(n, places) {
        f64::from_bits(n.to_bits() + 1)
    } else {
        n
    };
    format!("{:.*}", places, n)
}

/// True when `n` (non-negative, finite) sits exactly halfway between two
/// multiples of 10^-places.
///
/// With n = m·2^e and m odd, n·10^p·2 = m·5^p·2^(e+p+1), which is an odd
/// integer exactly when e + p + 1 == 0.
fn is_exact_tie(n: f64, places: usize) -> bool {
    let bits = n.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    let (mantissa, exponent) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    if mantissa == 0 {
        return false;
    }

    let exponent = exponent + mantissa.trailing_zeros() as i64;
    exponent + places as i64 + 1 == 0
}

// ============================================================================
// TESTS
// ============================================================================
