//! Configuration for the chorus engine
//!
//! A TOML file with `{{ env.VAR }}` expansion supplies per-vendor credentials
//! and transport tuning. The engine consumes this as a plain key-value
//! lookup; nothing here reaches the network.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod vendors;

use serde::Deserialize;

pub use vendors::{TransportConfig, VendorSettings, VendorsConfig};

/// Top-level chorus configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-vendor credentials and endpoints
    #[serde(default)]
    pub vendors: VendorsConfig,
    /// Transport tuning
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Settings for a vendor, by its lowercase identifier
    pub fn vendor(&self, name: &str) -> Option<&VendorSettings> {
        match name {
            "openai" => self.vendors.openai.as_ref(),
            "anthropic" => self.vendors.anthropic.as_ref(),
            "gemini" => self.vendors.gemini.as_ref(),
            "grok" => self.vendors.grok.as_ref(),
            "openrouter" => self.vendors.openrouter.as_ref(),
            _ => None,
        }
    }
}
