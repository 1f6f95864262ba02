mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use landed_cost::{
    app,
    domain::RateTables,
    infra::export::{write_rows, ExportFormat},
    init_tracing,
    ui::report::render_report,
};

use crate::cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_level());

    let rates = match &args.rates {
        Some(path) => RateTables::load(path)
            .with_context(|| format!("loading rate tables from {}", path.display()))?,
        None => RateTables::default(),
    };

    let options = args.run_options();
    options.input.validate().context("invalid input")?;

    let outcome = app::run(&options, &rates).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rows = std::slice::from_ref(&outcome.row);
    match args.format {
        OutputFormat::Table => {
            let link = outcome.tariff_link.as_ref();
            let report = render_report(&options.input, &outcome.result, link);
            out.write_all(report.as_bytes())?;
        }
        OutputFormat::Csv => write_rows(rows, ExportFormat::Csv, &mut out)?,
        OutputFormat::Json => write_rows(rows, ExportFormat::Json, &mut out)?,
    }
    out.flush()?;

    for notice in &outcome.notices {
        eprintln!("{notice}");
    }

    Ok(())
}
