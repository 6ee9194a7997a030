use crate::interceptor::ErrorHandler;
use crate::logging::LogSink;
use std::collections::HashSet;
use std::sync::Arc;

/// Paths that never produce a not-found warning: browsers request these
/// automatically, and logging each one is noise.
pub const DEFAULT_IGNORED_PATHS: [&str; 4] = [
    "/favicon.ico",
    "/robots.txt",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
];

/// Options consumed by [`AppFactory::bootstrap`](crate::factory::AppFactory::bootstrap).
///
/// Every field has a sensible default; supplied values are merged over
/// them, and `ignored_paths` extends the built-in set rather than
/// replacing it.
pub struct BootstrapOptions {
    /// Gate informational log output. Warnings and errors always pass.
    pub verbose: bool,
    /// Optional sink receiving every framework log line in addition to
    /// the `tracing` output.
    pub logger: Option<LogSink>,
    /// Extra paths that return a bodyless 404 without a warning log.
    pub ignored_paths: Vec<String>,
    /// Replacement for the default error interceptor.
    pub error_handler: Option<Arc<dyn ErrorHandler>>,
    /// When false, no not-found fallback is installed and unmatched
    /// requests get the underlying router's plain 404.
    pub enable_error_handling: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            logger: None,
            ignored_paths: Vec::new(),
            error_handler: None,
            enable_error_handling: true,
        }
    }
}

impl BootstrapOptions {
    /// The built-in ignored paths unioned with the supplied ones,
    /// normalized to a leading slash.
    pub(crate) fn ignored_set(&self) -> HashSet<String> {
        DEFAULT_IGNORED_PATHS
            .iter()
            .map(|path| (*path).to_string())
            .chain(self.ignored_paths.iter().map(|path| normalize(path)))
            .collect()
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_set_unions_builtin_and_supplied() {
        let options = BootstrapOptions {
            ignored_paths: vec!["/health".to_string(), "metrics".to_string()],
            ..Default::default()
        };

        let set = options.ignored_set();
        assert!(set.contains("/favicon.ico"));
        assert!(set.contains("/health"));
        assert!(set.contains("/metrics"));
        assert_eq!(set.len(), DEFAULT_IGNORED_PATHS.len() + 2);
    }
}
