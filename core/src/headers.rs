//! Default request headers and their merge with caller headers.

use crate::config::CreConfig;

/// Headers sent on every request unless the caller supplies the same name.
pub fn default_headers(config: &CreConfig) -> Vec<(String, String)> {
    vec![
        ("client_id".to_string(), config.client_id.clone()),
        ("client_secret".to_string(), config.client_secret.clone()),
        ("Content-Type".to_string(), "text/plain".to_string()),
        ("source_system".to_string(), config.source_system.clone()),
    ]
}

/// Merge `defaults` under `caller`.
///
/// Caller headers are kept in order and win on a name clash; names compare
/// case-insensitively. Defaults the caller did not set follow in their own
/// order.
pub fn merge_headers(
    caller: &[(String, String)],
    defaults: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged = caller.to_vec();
    for (name, value) in defaults {
        if !caller.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)) {
            merged.push((name.clone(), value.clone()));
        }
    }
    merged
}
