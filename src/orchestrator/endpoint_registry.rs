use crate::config::Config;
use crate::stt::{HttpEndpoint, TranscribeEndpoint};

/// Build the (primary, fallback) endpoint pair the orchestrator runs against.
pub fn endpoints_from_config(
    config: &Config,
) -> (Box<dyn TranscribeEndpoint>, Box<dyn TranscribeEndpoint>) {
    (
        Box::new(HttpEndpoint::new("primary server", &config.primary_url)),
        Box::new(HttpEndpoint::new("secondary server", &config.fallback_url)),
    )
}
