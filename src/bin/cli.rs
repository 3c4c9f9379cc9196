//! kvlink CLI
//!
//! Sends one command to a kvstore server and prints the reply.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use kvlink::{
    Command, Config, Endpoint, KvlinkError, ReadPolicy, Session, SessionObserver,
};

/// kvlink CLI
#[derive(Parser, Debug)]
#[command(name = "kvlink-cli")]
#[command(about = "TCP client for text-protocol key-value stores")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "192.168.31.43")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "2000")]
    port: u16,

    /// Connect timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Response timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    response_timeout_ms: u64,

    /// Accumulate the reply until the server closes the connection,
    /// instead of stopping after the first delivery
    #[arg(long)]
    wait_close: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Optional time-to-live in seconds
        #[arg(long)]
        ttl: Option<u32>,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

/// Prints the operator-facing connect/recv/error/close reports
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_connected(&mut self, endpoint: &Endpoint) {
        println!("connected to {}", endpoint);
    }

    fn on_data(&mut self, chunk: &[u8]) {
        println!("recv: {}", String::from_utf8_lossy(chunk));
    }

    fn on_error(&mut self, error: &KvlinkError) {
        eprintln!("error: {}", error);
    }

    fn on_close(&mut self) {
        println!("connection closed");
    }
}

fn main() {
    // Initialize tracing/logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,kvlink=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let command = match args.command {
        Commands::Get { key } => Command::Get { key },
        Commands::Set { key, value, ttl } => Command::Set {
            key,
            value,
            ttl_secs: ttl,
        },
        Commands::Del { key } => Command::Del { key },
    };

    let request = match command.encode() {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let endpoint = match Endpoint::new(args.host, args.port) {
        Ok(ep) => ep,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let config = Config::builder()
        .connect_timeout_ms(args.connect_timeout_ms)
        .response_timeout_ms(args.response_timeout_ms)
        .read_policy(if args.wait_close {
            ReadPolicy::UntilClose
        } else {
            ReadPolicy::FirstChunk
        })
        .build();

    tracing::info!("kvlink v{}", kvlink::VERSION);
    tracing::info!(endpoint = %endpoint, "sending command");

    let mut session = Session::open(endpoint, request, config);
    match session.run(&mut ConsoleObserver) {
        Ok(response) => {
            if response.is_server_error() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("session failed: {}", e);
            std::process::exit(1);
        }
    }
}
