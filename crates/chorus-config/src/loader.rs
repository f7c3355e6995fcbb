use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, variable expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error when no vendor is configured or transport settings
    /// are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        let has_vendor = self.vendors.openai.is_some()
            || self.vendors.anthropic.is_some()
            || self.vendors.gemini.is_some()
            || self.vendors.grok.is_some()
            || self.vendors.openrouter.is_some();

        if !has_vendor {
            anyhow::bail!("at least one vendor must be configured");
        }

        if self.transport.request_timeout_secs == 0 || self.transport.stream_timeout_secs == 0 {
            anyhow::bail!("transport timeouts must be greater than 0");
        }

        Ok(())
    }
}
