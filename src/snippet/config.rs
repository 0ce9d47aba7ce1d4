//! Configuration for the snippet resolver

/// Configuration options for rendering
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum number of nested snippet expansions below the top-level render
    pub max_depth: usize,

    /// Expand `###SNIPPET_<id>###` markers in rendered output
    pub marker_expansion: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            marker_expansion: true,
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enable or disable marker expansion
    pub fn with_marker_expansion(mut self, enabled: bool) -> Self {
        self.marker_expansion = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_depth, 32);
        assert!(config.marker_expansion);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResolverConfig::new()
            .with_max_depth(4)
            .with_marker_expansion(false);

        assert_eq!(config.max_depth, 4);
        assert!(!config.marker_expansion);
    }
}
