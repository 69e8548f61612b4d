//! Configuration for the interactive driver.
//!
//! Configuration is read from environment variables:
//! - `TASKDEX_LOG` - Optional. Tracing filter directive. Defaults to `taskdex=info`.
//! - `TASKDEX_DEBUG_VIEWS` - Optional. When truthy, every mutating command
//!   is followed by the internal index views. Defaults to off.

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tracing filter directive for the subscriber.
    pub log_filter: String,

    /// Print the heap array, in-order list, and both ASCII renderings
    /// after each mutating command.
    pub debug_views: bool,
}

impl Config {
    /// Load configuration from the environment. Every variable has a
    /// default, so this cannot fail.
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("TASKDEX_LOG")
                .unwrap_or_else(|_| "taskdex=info".to_string()),
            debug_views: std::env::var("TASKDEX_DEBUG_VIEWS")
                .map(|value| truthy(&value))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "taskdex=info".to_string(),
            debug_views: false,
        }
    }
}

/// Recognises `1`, `true`, `yes`, `y`, `on` (case-insensitive) as `true`.
fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "YES", " on ", "y"] {
            assert!(truthy(value), "{value:?} should parse as true");
        }
        for value in ["0", "false", "off", "", "maybe"] {
            assert!(!truthy(value), "{value:?} should parse as false");
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_filter, "taskdex=info");
        assert!(!config.debug_views);
    }
}
