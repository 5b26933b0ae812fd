//! Environment-driven configuration helpers

use std::str::FromStr;

/// Load variables from a `.env` file in the working directory, if one exists.
///
/// Returns `true` when a file was found and loaded. Variables already set in the
/// process environment take precedence over the file.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
            false
        }
    }
}

/// Read an environment variable, treating empty or whitespace-only values as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable.
///
/// Unset variables yield `None`. Values that fail to parse are logged and also
/// yield `None`, so callers fall back to their defaults.
pub fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_var(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}

/// Read a boolean flag (`1`, `true`, `yes`, `on`, case-insensitive).
pub fn env_flag(name: &str) -> bool {
    env_var(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable() {
        assert!(env_var("AGENT_UTILS_TEST_DEFINITELY_UNSET").is_none());
        assert!(env_parse::<u32>("AGENT_UTILS_TEST_DEFINITELY_UNSET").is_none());
        assert!(!env_flag("AGENT_UTILS_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_path_is_readable() {
        // PATH is set in every test environment we run in
        assert!(env_var("PATH").is_some());
        assert!(env_parse::<u32>("PATH").is_none());
    }
}
