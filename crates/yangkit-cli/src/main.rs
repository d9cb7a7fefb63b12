//! yangkit CLI - inspect YANG value types and typedef derivation.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{decimal, typedef, uint, wire};

#[derive(Parser)]
#[command(name = "yangkit")]
#[command(about = "YANG value types and type derivation CLI")]
struct Cli {
    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a decimal64 value and print its canonical form
    Decimal {
        /// Decimal literal, e.g. "12.50"
        #[arg(allow_negative_numbers = true)]
        value: String,
        /// Rescale to this many fraction digits
        #[arg(long)]
        scale: Option<u8>,
        /// Rounding mode used by --scale
        #[arg(long, default_value = "unnecessary")]
        rounding: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse an unsigned integer of the given width
    Uint {
        /// Bit width: 8, 16, 32 or 64
        width: u32,
        /// Integer literal
        #[arg(allow_negative_numbers = true)]
        value: String,
        /// Radix of the literal
        #[arg(long, default_value_t = 10)]
        radix: u32,
        /// Clamp out-of-range values instead of failing
        #[arg(long)]
        saturate: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encode or decode the binary wire form
    Wire {
        #[command(subcommand)]
        action: WireAction,
    },
    /// Derive the typedefs of a JSON document and print their effective form
    Typedef {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Fail on fraction-digits that differ from the base type
        #[arg(long)]
        strict: bool,
        /// Only print this typedef
        #[arg(long)]
        name: Option<String>,
        /// Validate a value against the typedef selected by --name
        #[arg(long, requires = "name")]
        check: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WireAction {
    /// Encode a value; prints hex
    Encode {
        /// Type name: decimal64, uint8, uint16, uint32 or uint64
        kind: String,
        /// Value in canonical form
        value: String,
    },
    /// Decode a hex-encoded value
    Decode {
        /// Hex-encoded bytes
        hex: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Decimal {
            value,
            scale,
            rounding,
            json,
        } => decimal::run(value, scale, rounding, json),
        Commands::Uint {
            width,
            value,
            radix,
            saturate,
            json,
        } => uint::run(width, value, radix, saturate, json),
        Commands::Wire { action } => match action {
            WireAction::Encode { kind, value } => wire::encode(kind, value),
            WireAction::Decode { hex, json } => wire::decode(hex, json),
        },
        Commands::Typedef {
            input,
            strict,
            name,
            check,
            json,
        } => typedef::run(input, strict, name, check, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
