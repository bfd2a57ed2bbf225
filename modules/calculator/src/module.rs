//! Calculator module definition
//!
//! Reads the module config section, constructs the process-wide variable store
//! and hands out the bound TCP server.

use std::sync::Arc;

use anyhow::Result;
use calc_bootstrap::{ConfigProvider, module_config_or_default};
use tracing::info;

use crate::api::tcp::CalcServer;
use crate::config::CalculatorConfig;
use crate::domain::{Service, VariableStore};

/// Config key under `modules.`.
pub const MODULE_NAME: &str = "calculator";

/// Calculator module.
///
/// Owns the single [`VariableStore`] for the process; every connection served by
/// [`CalculatorModule::bind`] shares it.
pub struct CalculatorModule {
    config: CalculatorConfig,
    service: Service,
}

impl CalculatorModule {
    /// Load `modules.calculator.config` (defaults when absent) and create the store.
    ///
    /// # Errors
    /// Returns an error if the config section is present but invalid.
    pub fn init(provider: &dyn ConfigProvider) -> Result<Self> {
        info!("Initializing calculator module");

        let config: CalculatorConfig = module_config_or_default(provider, MODULE_NAME)?;
        info!(
            listen_addr = %config.listen_addr,
            max_line_length = config.max_line_length,
            "Loaded calculator configuration"
        );

        Ok(Self::with_config(config))
    }

    #[must_use]
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            service: Service::new(Arc::new(VariableStore::new())),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Override the listen port, keeping the configured host.
    pub fn set_port(&mut self, port: u16) {
        self.config.listen_addr.set_port(port);
    }

    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Bind the TCP listener.
    ///
    /// # Errors
    /// Returns an error if the configured address cannot be bound.
    pub async fn bind(&self) -> Result<CalcServer> {
        CalcServer::bind(&self.config, self.service.clone()).await
    }
}
