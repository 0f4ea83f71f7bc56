use std::sync::Arc;
use ppt2pdf_core::{Config, ConversionService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<ConversionService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<ConversionService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn service(&self) -> &ConversionService {
        self.service.as_ref()
    }
}
