//! chaincheck: inspect and validate TLS certificate chains.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chaincheck_lib::{
    encode_chain, source_for_target, validate_chain_http, Encoding, TrustStore, ValidateOptions,
};

#[derive(Parser)]
#[command(name = "chaincheck", version, about = "TLS certificate chain validator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the chain presented by a host or stored in a PEM bundle
    Verify {
        /// Host to connect to, or file://PATH for a local PEM bundle
        #[arg(short, long)]
        target: String,

        /// TCP port for live targets
        #[arg(short, long, default_value_t = 443)]
        port: u16,

        /// Query OCSP responders (off by default)
        #[arg(long)]
        ocsp: bool,

        /// Skip CRL distribution point lookups
        #[arg(long)]
        no_crl: bool,

        /// Network timeout in seconds for connects and revocation fetches
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Evaluate validity at this Unix timestamp instead of now
        #[arg(long)]
        attime: Option<i64>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable debug logging on stderr
        #[arg(long)]
        debug: bool,
    },

    /// Print the chain a host presents without judging it
    Dump {
        /// Host to connect to, or file://PATH for a local PEM bundle
        #[arg(short, long)]
        target: String,

        /// TCP port for live targets
        #[arg(short, long, default_value_t = 443)]
        port: u16,

        /// Output encoding: pem (whole chain) or der (leaf only)
        #[arg(short, long, default_value = "pem")]
        encoding: Encoding,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable debug logging on stderr
        #[arg(long)]
        debug: bool,
    },
}

fn init_logging(debug: bool) {
    let default = if debug {
        "chaincheck=debug,chaincheck_lib=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn write_output(output: Option<&PathBuf>, data: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, data)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            std::io::stdout().write_all(data)?;
            Ok(())
        }
    }
}

fn run_verify(
    target: &str,
    port: u16,
    ocsp: bool,
    no_crl: bool,
    timeout: u64,
    attime: Option<i64>,
    json: bool,
    output: Option<&PathBuf>,
) -> anyhow::Result<bool> {
    let timeout = Duration::from_secs(timeout);
    let chain = source_for_target(target, port, timeout)
        .acquire()
        .with_context(|| format!("failed to acquire chain for '{}'", target))?;

    let trust_store = TrustStore::system().context("failed to load system trust store")?;
    let options = ValidateOptions {
        check_crl: !no_crl,
        check_ocsp: ocsp,
        fetch_timeout: timeout,
        at_time: attime,
    };

    let report = validate_chain_http(&chain.certs_der, &chain.hostname, &trust_store, &options)?;

    tracing::debug!(
        valid = report.is_valid(),
        failures = report.failure_messages().len(),
        "validation finished"
    );

    let rendered = if json {
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        text
    } else {
        report.to_string()
    };
    write_output(output, rendered.as_bytes())?;

    Ok(report.is_valid())
}

fn run_dump(
    target: &str,
    port: u16,
    encoding: Encoding,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let chain = source_for_target(target, port, Duration::from_secs(10))
        .acquire()
        .with_context(|| format!("failed to acquire chain for '{}'", target))?;
    let encoded = encode_chain(&chain.certs_der, encoding)?;
    write_output(output, &encoded)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Verify {
            target,
            port,
            ocsp,
            no_crl,
            timeout,
            attime,
            json,
            output,
            debug,
        } => {
            init_logging(debug);
            match run_verify(
                &target,
                port,
                ocsp,
                no_crl,
                timeout,
                attime,
                json,
                output.as_ref(),
            ) {
                Ok(true) => return ExitCode::SUCCESS,
                Ok(false) => return ExitCode::from(2),
                Err(e) => Err(e),
            }
        }
        Command::Dump {
            target,
            port,
            encoding,
            output,
            debug,
        } => {
            init_logging(debug);
            run_dump(&target, port, encoding, output.as_ref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chaincheck: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
