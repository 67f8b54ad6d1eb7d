//! Entry point: reads `Content-Length`-framed JSON-RPC from stdin, dispatches each
//! message synchronously against a single in-process `State`, and writes any response or
//! notification back out through stdout.

use std::io::{self, Read, Write};

use clap::Parser;
use log::{error, info, warn, LevelFilter};

use pebble_ls::rpc;
use pebble_ls::server::{self, Outgoing, State};

/// Language server for Pebble, a small dynamically-typed expression-oriented language.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Where to write log output. Stdout is reserved for the protocol stream.
    #[arg(long, default_value = "pebble-ls.log")]
    log_file: String,

    /// Minimum severity of log record to write.
    #[arg(value_enum, long, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    pebble_ls::logger::init(&cli.log_file, cli.log_level.into())
        .expect("a logger has not already been installed");
    info!("pebble-ls starting, logging to {}", cli.log_file);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    let mut state = State::new();
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        while let Some(frame_len) = rpc::frame_length(&buffer) {
            let frame: Vec<u8> = buffer.drain(..frame_len).collect();
            match rpc::decode_message(&frame) {
                Ok(decoded) => {
                    let content: serde_json::Value =
                        serde_json::from_slice(&decoded.content).unwrap_or(serde_json::Value::Null);
                    match server::dispatch(&mut state, &decoded.method, &content) {
                        Outgoing::Response(value) => write_message(&mut writer, &value)?,
                        Outgoing::Notification { method, params } => {
                            let envelope = serde_json::json!({
                                "jsonrpc": "2.0",
                                "method": method,
                                "params": params,
                            });
                            write_message(&mut writer, &envelope)?;
                        }
                        Outgoing::None => {}
                    }
                    if decoded.method == "exit" {
                        info!("received exit, shutting down");
                        return Ok(());
                    }
                }
                Err(e) => warn!("dropping malformed message: {e}"),
            }
        }

        let n = reader.read(&mut chunk)?;
        if n == 0 {
            info!("stdin closed, exiting cleanly");
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
}

fn write_message(writer: &mut impl Write, value: &serde_json::Value) -> io::Result<()> {
    let framed = rpc::encode_message(value).map_err(|e| {
        error!("failed to encode outgoing message: {e}");
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;
    writer.write_all(&framed)?;
    writer.flush()
}
