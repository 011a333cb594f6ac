// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ippdoc — pull the embedded document out of an IPP print-service response.
//
// Entry point. Parses arguments, initialises logging on stderr (stdout may
// carry the document), and dispatches to the subcommands.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use ippdoc_core::config::{DEFAULT_ATTRIBUTE_NAME, DEFAULT_CONTENT_TYPE_PREFIX};
use ippdoc_core::human_errors::humanize_error;
use ippdoc_core::types::Framing;

#[derive(Parser)]
#[command(name = "ippdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the embedded document from a saved response
    Extract {
        /// Raw IPP response body
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        select: SelectArgs,

        /// Print a JSON report instead of the document
        #[arg(long)]
        json: bool,
    },
    /// List every attribute record in a response
    List {
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,

        /// bare or message
        #[arg(long, default_value_t = Framing::Bare)]
        framing: Framing,
    },
    /// Embed a document in a response buffer, as a print service would
    Wrap {
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[arg(long, value_name = "NAME", default_value = DEFAULT_ATTRIBUTE_NAME)]
        attribute: String,

        /// Content type declared for the document part
        #[arg(long = "content-type", value_name = "TYPE", default_value = DEFAULT_CONTENT_TYPE_PREFIX)]
        content_type: String,

        /// bare or message
        #[arg(long, default_value_t = Framing::Bare)]
        framing: Framing,
    },
}

/// Settings shared by commands that run the extraction pipeline.
///
/// Flags override the config file, which overrides the built-in defaults.
#[derive(Args, Debug, Default)]
pub struct SelectArgs {
    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Attribute carrying the document
    #[arg(long, env = "IPPDOC_ATTRIBUTE", value_name = "NAME")]
    pub attribute: Option<String>,

    /// Content-type prefix of the wanted body part
    #[arg(long = "content-type", env = "IPPDOC_CONTENT_TYPE", value_name = "PREFIX")]
    pub content_type: Option<String>,

    /// bare or message
    #[arg(long)]
    pub framing: Option<Framing>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Command::Extract {
            response,
            output,
            select,
            json,
        } => commands::extract(response, output.as_deref(), select, *json, &mut out),
        Command::List { response, framing } => commands::list(response, *framing, &mut out),
        Command::Wrap {
            document,
            output,
            attribute,
            content_type,
            framing,
        } => commands::wrap(document, output, attribute, content_type, *framing),
    };
    let result = commands::finish(result, &mut out);

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, "ippdoc failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::from(2)
        }
    }
}

/// `RUST_LOG` wins; otherwise the level follows the `-v` count.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
