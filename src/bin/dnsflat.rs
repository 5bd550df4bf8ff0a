use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use dnsflat::{
    ExportError, NormalizerConfig, config::local_server_name, export::ExportFormat,
    source::read_records, try_normalize,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// JSON file with raw DNS records (array, objects or JSON lines); `-` or omitted reads stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Zone the records belong to, used to build FQDNs (e.g. contoso.com)
    #[arg(long, value_name = "ZONE", env = "DNSFLAT_ZONE_NAME")]
    zone_name: Option<String>,
    /// DNS server name stamped on every record (defaults to the local host name)
    #[arg(long, value_name = "NAME", env = "DNSFLAT_SERVER_NAME")]
    server_name: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,
    /// Only emit records of this type (repeat for multiple values)
    #[arg(long = "record-type", value_name = "TYPE")]
    record_type: Vec<String>,
    /// Write output to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_normalizer_config(&cli);
    let input = open_input(cli.input.as_ref())?;
    let output = open_output(cli.output.as_ref())?;

    let raw_records = read_records(input).map(|record| {
        record.map_err(|err| ExportError::Read(err.context("failed to read input records")))
    });
    let records = try_normalize(raw_records, &config).filter(|record| match record {
        Ok(record) => record.matches_types(cli.record_type.as_slice()),
        Err(_) => true,
    });

    let written = dnsflat::export::write(cli.format, output, records)
        .context("failed to export records")?;

    info!(records = written, server = %config.server_name(), "export complete");
    Ok(())
}

fn build_normalizer_config(cli: &Cli) -> NormalizerConfig {
    let server_name = cli
        .server_name
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(local_server_name);

    NormalizerConfig::new(cli.zone_name.clone(), server_name)
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
