//! Pipeline configuration.

use std::time::Duration;

/// Configuration for the report pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Inclusive range the per-stage pacing delay is drawn from (`None` disables pacing)
    pub pacing: Option<(Duration, Duration)>,
    /// Whether the best-effort retrieval call is made for each stage
    pub retrieval: bool,
    /// Number of events buffered between producer and consumer
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing: Some((Duration::from_millis(800), Duration::from_millis(1200))),
            retrieval: true,
            channel_capacity: 16,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default pacing and retrieval enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pacing range. The bounds are reordered if given backwards.
    pub fn pacing(mut self, min: Duration, max: Duration) -> Self {
        self.pacing = Some(if min <= max { (min, max) } else { (max, min) });
        self
    }

    /// Disable the pacing delay.
    pub fn no_pacing(mut self) -> Self {
        self.pacing = None;
        self
    }

    /// Enable or disable the retrieval call.
    pub fn retrieval(mut self, enabled: bool) -> Self {
        self.retrieval = enabled;
        self
    }

    /// Set the event buffer size (at least one).
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.pacing,
            Some((Duration::from_millis(800), Duration::from_millis(1200)))
        );
        assert!(config.retrieval);
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn test_pacing_bounds_are_ordered() {
        let config = PipelineConfig::new().pacing(Duration::from_millis(50), Duration::from_millis(10));
        assert_eq!(
            config.pacing,
            Some((Duration::from_millis(10), Duration::from_millis(50)))
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineConfig::new()
            .no_pacing()
            .retrieval(false)
            .channel_capacity(0);
        assert!(config.pacing.is_none());
        assert!(!config.retrieval);
        assert_eq!(config.channel_capacity, 1);
    }
}
