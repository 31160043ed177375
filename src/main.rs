//! # chatflat CLI
//!
//! Command-line interface for the chatflat library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chatflat::ChatflatError;
use chatflat::cli::Args;
use chatflat::core::output::write_lines;
use chatflat::pipeline::Pipeline;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "chatflat=debug" } else { "chatflat=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<(), ChatflatError> {
    let start = Instant::now();

    // Bad dates fail here, before the input is read
    let filter = args.filter_params().build()?;
    let input = args.input_file();
    debug!(input = %input.display(), output = %args.output.display(), "starting");

    let pipeline = Pipeline::new();
    let (lines, stats) = match std::fs::read_to_string(&input) {
        Ok(document) => pipeline.run_with_stats(&document, filter.as_ref())?,
        Err(err) => return Err(ChatflatError::from_io_at(err, &input)),
    };
    write_lines(&lines, &args.output)?;

    if args.verbose {
        println!("chatflat v{}", env!("CARGO_PKG_VERSION"));
        println!("Input:     {}", input.display());
        println!("Output:    {}", args.output.display());
        println!("Messages:  {}", stats.total);
        if filter.is_some() {
            println!("Filtered:  {}", stats.retained);
        }
        println!("Lines:     {} ({:.1}% kept)", stats.rendered, stats.retention_ratio());
        println!("Time:      {:.2}s", start.elapsed().as_secs_f64());
    }

    println!("Done! Processed {} messages.", stats.rendered);
    Ok(())
}
