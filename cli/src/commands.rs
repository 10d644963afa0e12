// Subcommand handlers

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use pdfshift_client::{ConversionResult, Cookie, ErrorKind, Margin, PdfShiftClient, PdfShiftError};
use serde_json::Value;

use crate::ConvertArgs;

/// `pdfshift convert`
pub async fn convert(client: &PdfShiftClient, args: ConvertArgs) -> anyhow::Result<()> {
    let source = resolve_source(&args.source)?;

    let mut conversion = client.conversion();
    apply_options(conversion.options_mut(), &args);

    conversion
        .convert(source)
        .await
        .with_context(|| format!("converting {}", args.source))?;

    if let Some(path) = &args.output {
        let written = conversion
            .save(path)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote {} bytes to {}", written, path.display());
        return Ok(());
    }

    match conversion.into_data().ok_or_else(PdfShiftError::no_data)? {
        ConversionResult::Binary(data) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data).context("writing to stdout")?;
            stdout.flush().context("writing to stdout")?;
        }
        ConversionResult::Stored(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
    }

    Ok(())
}

/// `pdfshift credits`
pub async fn credits(client: &PdfShiftClient) -> anyhow::Result<()> {
    let status = client.credits().await.context("fetching credits")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

/// Process exit code for a failed command
pub fn exit_code(error: &anyhow::Error) -> u8 {
    let Some(error) = error.downcast_ref::<PdfShiftError>() else {
        return 1;
    };

    match error.kind() {
        ErrorKind::InvalidCredential => 3,
        ErrorKind::PreconditionFailure if error.status_code() == Some(401) => 3,
        ErrorKind::NoCredits => 4,
        ErrorKind::RateLimited => 5,
        _ => 1,
    }
}

fn apply_options(request: &mut pdfshift_client::ConversionRequest, args: &ConvertArgs) {
    if args.landscape {
        request.set("landscape", true);
    }
    if let Some(format) = &args.format {
        request.set("format", format.as_str());
    }
    if args.sandbox {
        request.set("sandbox", true);
    }
    if let Some(filename) = &args.filename {
        request.save_remotely(filename.as_str());
    }
    if let Some(margin) = &args.margin {
        request.set_margin(Margin::uniform(margin.as_str()));
    }
    if let Some(header) = &args.header {
        request.set_header(header.as_str(), None);
    }
    if let Some(footer) = &args.footer {
        request.set_footer(footer.as_str(), None);
    }

    request.set_http_headers(args.http_headers.iter().cloned());
    request.set_cookies(
        args.cookies
            .iter()
            .map(|(name, value)| Cookie::new(name.as_str()).with_value(value.as_str())),
    );

    for (key, raw) in &args.options {
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        request.set(key.as_str(), value);
    }
}

// URLs pass through, "-" reads stdin, an existing file is read, and anything
// else is sent as inline HTML.
fn resolve_source(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .context("reading HTML from stdin")?;
        return Ok(html);
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    if path.is_file() {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }

    Ok(source.to_string())
}
