// LedgerCraft - Field Formatting Core
// Display formatting and client prefill for forms, used by the desktop app and the CLI

pub mod value;
pub mod dates;
pub mod formatting;
pub mod prefill;
pub mod config;
pub mod forms;

// Re-export commonly used types
pub use value::{FieldValue, FieldValues, values_from_json, values_to_json};
pub use dates::{
    DateFormat, DateInput,
    format_date, format_date_time, parse_date_like,
};
pub use formatting::{
    FieldFormatOptions, FieldType, TextTransform,
    apply_field_formatting, format_field,
};
pub use prefill::{merge_client_prefill, prefilled_keys};
pub use config::{parse_format_options, options_from_column};
pub use forms::{FormDefinition, FormField, RenderedField};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
