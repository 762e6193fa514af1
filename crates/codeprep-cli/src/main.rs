use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use codeprep_cli::io::{read_records, write_records};
use codeprep_cli::{logging, BatchOptions, BatchRunner, Cli, Pipeline};
use codeprep_common::ConfigLoader;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    logging::init_logging(&config.log_level, cli.verbose);

    let language = config
        .language
        .ok_or_else(|| anyhow!("no language given; pass --language or set it in the config file"))?;
    let pipeline = Pipeline::from_config(language, &config)?;
    let runner = BatchRunner::new(pipeline, BatchOptions::from(&config));

    let input = File::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let read = read_records(BufReader::new(input))?;
    info!(records = read.records.len(), skipped = read.skipped, %language, "corpus loaded");

    let (outputs, stats) = runner.run(&read.records)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_records(BufWriter::new(file), &outputs)?;
        }
        None => write_records(BufWriter::new(io::stdout().lock()), &outputs)?,
    }

    stats.log_summary(read.skipped);
    Ok(())
}
