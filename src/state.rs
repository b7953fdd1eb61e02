//! The compiled, request-ready view of a configuration.

use crate::config::GatewayConfig;
use crate::http::code_form::CodeForm;
use crate::redirect::{RedirectTable, RuleError};

/// Everything a request needs, swapped as one unit on reload.
#[derive(Debug)]
pub struct GatewayState {
    pub config: GatewayConfig,
    pub table: RedirectTable,
    pub form: CodeForm,
}

impl GatewayState {
    pub fn from_config(config: GatewayConfig) -> Result<Self, RuleError> {
        let table = RedirectTable::compile(&config.effective_redirects())?;
        let form = CodeForm::new(&config.code_input);
        Ok(Self {
            config,
            table,
            form,
        })
    }

    pub fn form_path(&self) -> &str {
        &self.config.code_input.form_path
    }

    /// Serve and post the code form at `form_path` instead of the configured one.
    pub fn with_form_path(mut self, form_path: &str) -> Self {
        if self.form_path() != form_path {
            self.config.code_input.form_path = form_path.to_string();
            self.form = CodeForm::new(&self.config.code_input);
        }
        self
    }
}
