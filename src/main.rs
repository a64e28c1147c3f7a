// src/main.rs
mod config;
mod journal;
mod logger;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::{Cli, Commands, Settings};
use huffpress::Summary;
use huffpress::codec::inspect_file;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);
    logger::init(settings.log_level)?;

    let span = tracing::info_span!("command", name = cli.command.name());
    let _enter = span.enter();

    match &cli.command {
        Commands::Encode { input, output, text } => {
            let summary = huffpress::encode_file(input, output, text.as_deref())
                .with_context(|| format!("failed to encode {}", input.display()))?;
            report("encoded", input, output, &summary);
            record(&settings, "encode", input, output, &summary)?;
        }
        Commands::Decode { input, output } => {
            let summary = huffpress::decode_file(input, output)
                .with_context(|| format!("failed to decode {}", input.display()))?;
            report("decoded", input, output, &summary);
            record(&settings, "decode", input, output, &summary)?;
        }
        Commands::Codes { input } => {
            print_codes(input)?;
        }
    }

    Ok(())
}

fn report(verb: &str, input: &Path, output: &Path, summary: &Summary) {
    let ratio = if summary.input_bytes == 0 {
        0.0
    } else {
        summary.output_bytes as f64 / summary.input_bytes as f64 * 100.0
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = summary.input_bytes,
        output_bytes = summary.output_bytes,
        symbols = summary.distinct_symbols,
        "{verb} ({ratio:.1}% of input)"
    );
}

fn record(settings: &Settings, action: &str, input: &Path, output: &Path, summary: &Summary) -> anyhow::Result<()> {
    let Some(path) = &settings.journal else {
        return Ok(());
    };
    let entry = journal::JournalEntry::new(action, input, output, summary)
        .with_context(|| format!("failed to hash {}", input.display()))?;
    journal::append(path, &entry).with_context(|| format!("failed to write journal {}", path.display()))
}

fn print_codes(input: &Path) -> anyhow::Result<()> {
    let (header, codes) =
        inspect_file(input).with_context(|| format!("failed to read {}", input.display()))?;

    let mut out = io::stdout().lock();
    write!(out, "header: {}", header.to_line())?;
    if codes.is_empty() {
        writeln!(out, "no body: the header alone describes the input")?;
        return Ok(());
    }
    for (byte, code) in codes.iter() {
        writeln!(out, "{:>3}  {:>10}  {}", byte, header.table().get(byte), code)?;
    }
    Ok(())
}
