use std::path::PathBuf;

use clap::Parser;

/// Chorus — one interface over many LLM vendors
#[derive(Debug, Parser)]
#[command(name = "chorus", about = "Send a prompt to any configured LLM vendor")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "chorus.toml", env = "CHORUS_CONFIG")]
    pub config: PathBuf,

    /// Vendor to call (openai, anthropic, gemini, grok, openrouter)
    #[arg(short, long, env = "CHORUS_VENDOR")]
    pub vendor: String,

    /// Model identifier
    #[arg(short, long)]
    pub model: String,

    /// Optional system instruction
    #[arg(long)]
    pub system: Option<String>,

    /// Stream the response, forwarding raw vendor bytes to stdout
    #[arg(long)]
    pub stream: bool,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// The user prompt
    pub prompt: String,
}
