use anyhow::Context;
use clap::{Parser, Subcommand};
use dlms_push_rs::util::hex::decode_hex;
use dlms_push_rs::{init_logger, log_info, AesKey, MeterDecoder, SecurityMode};
use tokio::net::UdpSocket;

#[derive(Parser)]
#[command(name = "dlms-push-cli")]
#[command(about = "CLI tool for decoding smart meter push telemetry")]
struct Cli {
    /// Decryption key as 32 hex digits
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Ciphertext carries a GCM authentication tag
    #[arg(long, global = true)]
    authenticated: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for broadcast frames on a UDP port and decode them
    Listen {
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        bind: String,
        /// Emit readings as JSON lines on stdout
        #[arg(long)]
        json: bool,
    },
    /// Decode a single frame given as a hex string
    Decode { frame_hex: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let key_hex = cli.key.context("--key is required")?;
    let key = AesKey::from_hex(&key_hex).context("invalid decryption key")?;
    let mode = if cli.authenticated {
        SecurityMode::AuthenticatedGcm
    } else {
        SecurityMode::EncryptOnly
    };
    let mut decoder = MeterDecoder::with_mode(key, mode);

    match cli.command {
        Commands::Listen { bind, json } => {
            let socket = UdpSocket::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            log_info(&format!("listening on {bind} for meter push frames"));

            let mut buf = [0u8; 1024];
            loop {
                let (len, peer) = socket.recv_from(&mut buf).await?;
                match decoder.decode_frame(&buf[..len]) {
                    Ok(decoded) => {
                        if json {
                            println!("{}", serde_json::to_string(&decoded.reading)?);
                        } else {
                            print_reading(&decoded);
                        }
                    }
                    // A rejected frame never stops the loop.
                    Err(e) => log::error!("frame from {peer} rejected: {e}"),
                }
            }
        }
        Commands::Decode { frame_hex } => {
            let frame = decode_hex(&frame_hex).context("invalid frame hex")?;
            let decoded = decoder.decode_frame(&frame)?;
            println!("{}", serde_json::to_string_pretty(&decoded.reading)?);
        }
    }

    Ok(())
}

fn print_reading(decoded: &dlms_push_rs::DecodedFrame) {
    if let Some(ts) = &decoded.reading.timestamp {
        if let Some(naive) = ts.to_naive() {
            log_info(&format!(
                "frame {} at {naive}{}",
                decoded.frame_counter,
                if ts.is_dst { " DST" } else { "" }
            ));
        }
    }
    for (name, register) in &decoded.reading.registers {
        match register {
            Some(reg) => match reg.value {
                Some(value) => log_info(&format!("{name}: {value} {}", reg.unit)),
                None => log_info(&format!("{name}: value unreadable")),
            },
            None => log_info(&format!("{name}: absent")),
        }
    }
    if let Some(net) = decoded.reading.net_active_power {
        log_info(&format!("net_active_power: {net} W"));
    }
}
