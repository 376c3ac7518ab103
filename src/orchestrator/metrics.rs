use std::collections::HashMap;

/// Attempt counters for one endpoint slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointStats {
    pub successes: u64,
    pub failures: u64,
}

impl EndpointStats {
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }
}

/// Per-endpoint attempt counters, one entry per endpoint slot.
#[derive(Debug, Default)]
pub struct Metrics {
    stats: HashMap<&'static str, EndpointStats>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, endpoint: &'static str) {
        self.stats.entry(endpoint).or_default().successes += 1;
    }

    pub fn record_failure(&mut self, endpoint: &'static str) {
        self.stats.entry(endpoint).or_default().failures += 1;
    }

    pub fn stats(&self, endpoint: &str) -> EndpointStats {
        self.stats.get(endpoint).copied().unwrap_or_default()
    }

    pub fn success_rate(&self, endpoint: &str) -> f32 {
        let stats = self.stats(endpoint);
        if stats.attempts() == 0 {
            return 0.0;
        }
        stats.successes as f32 / stats.attempts() as f32
    }

    /// One-line summary for end-of-job logging.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .stats
            .iter()
            .map(|(endpoint, stats)| {
                format!("{} {}/{} ok", endpoint, stats.successes, stats.attempts())
            })
            .collect();
        parts.sort();

        if parts.is_empty() {
            "no requests issued".to_string()
        } else {
            parts.join(", ")
        }
    }
}
