//! Environment lookup helpers.
//!
//! Values are read through a lookup function so tests can supply a map instead
//! of the process environment. An empty value counts as unset.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::warn;

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Build a lookup over a fixed set of pairs (useful for testing).
pub fn lookup_from_pairs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// String value of `key`, or `default` when unset or empty.
pub fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Parsed value of `key`, or `default` when unset, empty, or unparseable.
pub fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.is_empty() => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable environment value");
                default
            }
        },
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_falls_back_to_default() {
        let env = lookup_from_pairs(&[("AGENT_SERVER_URL", "")]);
        assert_eq!(
            string_or(&env, "AGENT_SERVER_URL", "http://localhost:8080"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn set_value_wins() {
        let env = lookup_from_pairs(&[("AGENT_SERVER_URL", "http://agent:9000")]);
        assert_eq!(string_or(&env, "AGENT_SERVER_URL", "x"), "http://agent:9000");
    }

    #[test]
    fn unparseable_number_uses_default() {
        let env = lookup_from_pairs(&[("PLAYGROUND_PORT", "eighty")]);
        assert_eq!(parsed_or(&env, "PLAYGROUND_PORT", 3000u16), 3000);
        let env = lookup_from_pairs(&[("PLAYGROUND_PORT", "8081")]);
        assert_eq!(parsed_or(&env, "PLAYGROUND_PORT", 3000u16), 8081);
    }
}
