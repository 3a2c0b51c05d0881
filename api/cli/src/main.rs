//! xplat-api CLI - issue requests against a configured API from the shell

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xplat_api::auth::{AuthClient, LoginCredentials};
use xplat_api::{ApiClient, ApiResponse, ConfigOverrides, RestMethod};

#[derive(Parser)]
#[command(name = "xplat-api")]
#[command(about = "Send requests to an HTTP API and print the response envelope", long_about = None)]
struct Cli {
    /// Base URL of the API [default: $NEXT_PUBLIC_API_URL or $API_URL]
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Bearer token sent as `Authorization: Bearer <TOKEN>`
    #[arg(long, value_name = "TOKEN", global = true)]
    token: Option<String>,

    /// Request timeout in milliseconds [default: $API_TIMEOUT_MS or 10000]
    #[arg(long, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,

    /// Extra default header (repeatable: -H "X-Trace: 1" -H "Accept: text/plain")
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", global = true)]
    headers: Vec<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET an endpoint
    Get {
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,
    },

    /// DELETE an endpoint
    Delete {
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,
    },

    /// POST a JSON body to an endpoint
    Post {
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,

        /// JSON request body
        #[arg(short, long, value_name = "JSON")]
        data: Option<String>,
    },

    /// PUT a JSON body to an endpoint
    Put {
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,

        /// JSON request body
        #[arg(short, long, value_name = "JSON")]
        data: Option<String>,
    },

    /// PATCH a JSON body to an endpoint
    Patch {
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,

        /// JSON request body
        #[arg(short, long, value_name = "JSON")]
        data: Option<String>,
    },

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Show the profile of the user behind --token
    Profile,

    /// End the session behind --token
    Logout,
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins over -v flags
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,xplat_api=info".to_string(),
            2 => "info,xplat_api=debug".to_string(),
            _ => "debug,xplat_api=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Splits a `Name: value` header argument.
fn parse_header_arg(raw: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("Invalid header '{raw}', expected 'Name: value'").into())
}

fn parse_body(data: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let Some(raw) = data else {
        return Ok(None);
    };
    let body = serde_json::from_str(raw).map_err(|e| format!("Invalid JSON in --data: {e}"))?;
    Ok(Some(body))
}

fn build_client(cli: &Cli) -> Result<Arc<ApiClient>, Box<dyn std::error::Error>> {
    let mut overrides = ConfigOverrides::default();
    if let Some(base_url) = &cli.base_url {
        overrides = overrides.base_url(base_url);
    }
    if let Some(ms) = cli.timeout_ms {
        overrides = overrides.timeout(Duration::from_millis(ms));
    }
    for raw in &cli.headers {
        let (name, value) = parse_header_arg(raw)?;
        overrides = overrides.header(name, value)?;
    }

    let client = ApiClient::new(overrides.resolve()?)?;
    if let Some(token) = &cli.token {
        client.set_auth_token(token)?;
    }
    Ok(Arc::new(client))
}

/// Prints the envelope and maps its outcome to an exit code.
fn report<T: Serialize>(response: &ApiResponse<T>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let api = build_client(&cli)?;
    let auth = AuthClient::new(Arc::clone(&api));

    match cli.command {
        Commands::Get { endpoint } => report(&api.get::<Value>(&endpoint, None).await),
        Commands::Delete { endpoint } => report(&api.delete::<Value>(&endpoint, None).await),
        Commands::Post { endpoint, data } => {
            send_with_body(&api, RestMethod::Post, &endpoint, data.as_deref()).await
        }
        Commands::Put { endpoint, data } => {
            send_with_body(&api, RestMethod::Put, &endpoint, data.as_deref()).await
        }
        Commands::Patch { endpoint, data } => {
            send_with_body(&api, RestMethod::Patch, &endpoint, data.as_deref()).await
        }
        Commands::Login { email, password } => {
            report(&auth.login(&LoginCredentials::new(email, password)).await)
        }
        Commands::Profile => report(&auth.get_profile().await),
        Commands::Logout => report(&auth.logout().await),
    }
}

async fn send_with_body(
    api: &ApiClient,
    method: RestMethod,
    endpoint: &str,
    data: Option<&str>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let body = parse_body(data)?;
    report(
        &api.request::<Value, Value>(method, endpoint, body.as_ref(), None)
            .await,
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    tracing::debug!("xplat-api CLI starting");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
