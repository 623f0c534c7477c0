//! Device-native value encoding
//!
//! RouterOS serialises booleans as the strings `"true"` / `"false"`, and most
//! resources expose a `disabled` flag where callers think in terms of
//! `enabled`. All translation between the two lives here.

/// Encode a logical boolean the way the device does
pub fn encode_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Decode a device boolean
///
/// Returns `None` for anything other than `"true"` / `"false"`.
pub fn decode_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Device `disabled` flag for a logical `enabled` value
pub fn disabled_flag(enabled: bool) -> &'static str {
    encode_bool(!enabled)
}

/// Logical `enabled` value for a device `disabled` flag
pub fn enabled_from_disabled(disabled: &str) -> Option<bool> {
    decode_bool(disabled).map(|d| !d)
}
