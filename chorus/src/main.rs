#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use args::Args;
use chorus_config::Config;
use chorus_llm::types::{GenerationParams, Message, Role};
use chorus_llm::{ChatRequest, Client, Vendor};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let vendor = Vendor::parse(&args.vendor)
        .ok_or_else(|| anyhow::anyhow!("unknown vendor: {}", args.vendor))?;

    let config = Config::load(&args.config)?;
    let client = Client::new(config);

    let mut messages = Vec::new();
    if let Some(system) = &args.system {
        messages.push(Message::text(Role::System, system));
    }
    messages.push(Message::text(Role::User, &args.prompt));

    let request = ChatRequest {
        model: args.model.clone(),
        messages,
        params: GenerationParams {
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            ..GenerationParams::default()
        },
        tools: None,
        tool_choice: None,
        stream: args.stream,
        previous_response: None,
    };

    tracing::info!(vendor = %vendor, model = %args.model, "sending request");

    let response = if args.stream {
        // Ctrl+C aborts the in-flight stream without waiting on the vendor
        let cancel = CancellationToken::new();
        let cancel_on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_on_signal.cancel();
            }
        });

        let stdout = std::io::stdout();
        let mut sink = move |chunk: &[u8]| {
            let mut handle = stdout.lock();
            let _ = handle.write_all(chunk);
            let _ = handle.flush();
        };

        client
            .stream_request_with_cancel(vendor, &request, &mut sink, &cancel)
            .await?
    } else {
        let response = client.request(vendor, &request).await?;
        println!("{}", response.content);
        response
    };

    tracing::info!(
        finish_reason = ?response.finish_reason,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "turn complete"
    );

    if let Some(calls) = &response.tool_calls {
        for call in calls {
            println!("tool call {} -> {}({})", call.id, call.name, call.arguments);
        }
    }

    Ok(())
}
