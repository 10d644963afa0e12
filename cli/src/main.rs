use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pdfshift_client::{ClientConfig, PdfShiftClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Convert web pages and HTML to PDF with the PDFShift API.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// API key used to authenticate against PDFShift.
    #[arg(long, env = "PDFSHIFT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API base URL.
    #[arg(long, env = "PDFSHIFT_API_BASE", value_name = "URL")]
    api_base: Option<String>,

    /// Abort requests that take longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a URL, an HTML file, or HTML from stdin to PDF.
    Convert(ConvertArgs),

    /// Show the credit status of the account.
    Credits,
}

#[derive(Args)]
struct ConvertArgs {
    /// URL, path to an HTML file, or "-" to read HTML from stdin.
    source: String,

    /// Write the document to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Use landscape orientation.
    #[arg(long)]
    landscape: bool,

    /// Page format (e.g., A4, Letter).
    #[arg(long, value_name = "FMT")]
    format: Option<String>,

    /// Sandbox mode: free, watermarked output.
    #[arg(long)]
    sandbox: bool,

    /// Keep the document on PDFShift under this name and print its metadata.
    #[arg(long, value_name = "NAME")]
    filename: Option<String>,

    /// Same margin on every side (CSS length, e.g. 10mm).
    #[arg(long, value_name = "CSS")]
    margin: Option<String>,

    /// Page header: URL or HTML.
    #[arg(long, value_name = "SRC")]
    header: Option<String>,

    /// Page footer: URL or HTML.
    #[arg(long, value_name = "SRC")]
    footer: Option<String>,

    /// HTTP header sent when fetching the source. Repeatable.
    #[arg(long = "http-header", value_name = "NAME=VALUE", value_parser = parse_pair)]
    http_headers: Vec<(String, String)>,

    /// Cookie sent when fetching the source. Repeatable.
    #[arg(long = "cookie", value_name = "NAME=VALUE", value_parser = parse_pair)]
    cookies: Vec<(String, String)>,

    /// Any other API option; the value is parsed as JSON when possible. Repeatable.
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_pair)]
    options: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn build_client(cli: &Cli) -> anyhow::Result<PdfShiftClient> {
    let mut config = ClientConfig::new();
    config.api_key = cli.api_key.clone().filter(|key| !key.trim().is_empty());
    config.base_url = cli.api_base.clone();
    config.timeout = cli.timeout.map(Duration::from_secs);

    tracing::debug!("Using {:?}", config);
    Ok(PdfShiftClient::new(config)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = build_client(&cli)?;

    match cli.command {
        Command::Convert(args) => commands::convert(&client, args).await,
        Command::Credits => commands::credits(&client).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout may carry the document.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,pdfshift=info,pdfshift_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
