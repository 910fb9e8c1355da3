//! gradio-chat: send one chat turn to a prediction space from the command line
//!
//! Usage:
//!   gradio-chat [--stream] [--blocking] [--qwen] <prompt...>

use futures::StreamExt;
use gradio_adapter::{
    AdapterConfig, ChatParams, ChatPreset, GradioClient, GradioClientBuilder, Message,
    StreamingChunk,
};
use std::io::Write;
use tracing_subscriber::EnvFilter;

struct Args {
    stream: bool,
    blocking: bool,
    preset: ChatPreset,
    prompt: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Some(a) => a,
        None => {
            print_usage();
            std::process::exit(1);
        }
    };

    let config = match AdapterConfig::from_env(args.preset.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    let params = ChatParams::new().messages(vec![Message::user(args.prompt.as_str())]);
    let result = if args.blocking {
        run_blocking(config, &params, args.stream)
    } else {
        match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(run_async(config, &params, args.stream)),
            Err(e) => Err(gradio_adapter::Error::Io(e)),
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn parse_args(raw: Vec<String>) -> Option<Args> {
    let mut args = Args {
        stream: false,
        blocking: false,
        preset: ChatPreset::llama_codestral(),
        prompt: String::new(),
    };
    let mut words = Vec::new();
    for arg in raw {
        match arg.as_str() {
            "--stream" => args.stream = true,
            "--blocking" => args.blocking = true,
            "--qwen" => args.preset = ChatPreset::qwen3(),
            "help" | "--help" | "-h" => return None,
            _ => words.push(arg),
        }
    }
    if words.is_empty() {
        return None;
    }
    args.prompt = words.join(" ");
    Some(args)
}

fn print_usage() {
    println!(
        r#"gradio-chat: send one chat turn to a prediction space

USAGE:
    gradio-chat [--stream] [--blocking] [--qwen] <prompt...>

OPTIONS:
    --stream      Print chunks as they arrive
    --blocking    Use the blocking client instead of the async one
    --qwen        Use the Qwen3 space defaults (default: Llama/Codestral)

ENVIRONMENT:
    GRADIO_SPACE_URL    Base address of the space
    RUST_LOG            Log filter (default: warn)"#
    );
}

async fn run_async(
    config: AdapterConfig,
    params: &ChatParams,
    stream: bool,
) -> gradio_adapter::Result<()> {
    let client: GradioClient = GradioClientBuilder::from_config(config).build()?;
    if stream {
        let mut chunks = client.streaming(params).await?;
        let mut shown = String::new();
        while let Some(chunk) = chunks.next().await {
            print_chunk(&mut shown, &chunk?);
        }
    } else {
        let completion = client.completion(params).await?;
        println!("{}", serde_json::to_string_pretty(&completion)?);
    }
    Ok(())
}

fn run_blocking(
    config: AdapterConfig,
    params: &ChatParams,
    stream: bool,
) -> gradio_adapter::Result<()> {
    let client = GradioClientBuilder::from_config(config).build_blocking()?;
    if stream {
        let mut shown = String::new();
        for chunk in client.streaming(params)? {
            print_chunk(&mut shown, &chunk?);
        }
    } else {
        let completion = client.completion(params)?;
        println!("{}", serde_json::to_string_pretty(&completion)?);
    }
    Ok(())
}

/// Chunks carry the text so far; print only what is new.
fn print_chunk(shown: &mut String, chunk: &StreamingChunk) {
    match chunk.text.strip_prefix(shown.as_str()) {
        Some(rest) => {
            print!("{rest}");
            shown.push_str(rest);
        }
        // raw frame
        None => print!("\n{}\n", chunk.text),
    }
    if chunk.is_finished {
        println!();
    }
    let _ = std::io::stdout().flush();
}
