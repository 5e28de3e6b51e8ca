// 🧩 Client Prefill - Fill a form draft from the attached client's record
// Manual entries always win; the client only fills blanks

use crate::value::FieldValues;

/// Merge a client's stored values into a form draft
///
/// - Starts from a copy of `form_values` (every key kept)
/// - A client value is used only where the draft is missing, null or ""
/// - Keys only the client has are added
///
/// Neither input is touched, and merging the result again with the same
/// client is a no-op.
pub fn merge_client_prefill(form_values: &FieldValues, client_values: &FieldValues) -> FieldValues {
    let mut merged = form_values.clone();

    for (key, client_value) in client_values {
        let blank = merged.get(key).map_or(true, |current| current.is_blank());
        if blank {
            merged.insert(key.clone(), client_value.clone());
        }
    }

    merged
}

/// Keys whose value in `merged` came from the client rather than the draft
pub fn prefilled_keys(form_values: &FieldValues, merged: &FieldValues) -> Vec<String> {
    let mut keys: Vec<String> = merged
        .iter()
        .filter(|(key, value)| form_values.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.sort();
    keys
}
