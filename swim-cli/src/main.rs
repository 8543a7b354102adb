mod cli;

use std::{
    env, fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swim_parser::{parse_grouped, Document, Extractor, Registry, Schedule};

const SWIM_REGISTRY: &str = "SWIM_REGISTRY";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = cli::parse(env::args().skip(1).collect());

    let registry = match args
        .registry
        .clone()
        .or_else(|| env::var_os(SWIM_REGISTRY).map(PathBuf::from))
    {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read registry {}", path.display()))?;
            Registry::from_json(&json)
                .with_context(|| format!("Failed to load registry {}", path.display()))?
        }
        None => Registry::default(),
    };

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
    };

    let extractor = Extractor::new(registry, args.config);

    let events = if args.grouped {
        extractor.reshape_grouped(&parse_grouped(&input)?)
    } else {
        let document: Document =
            serde_json::from_str(&input).context("Input is not an extracted document")?;
        extractor.extract(&document)?
    };

    info!(events = events.len(), "extracted practices");

    let schedule = Schedule {
        name: args.name,
        events,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print!("{}", schedule.to_ics(args.buffer));
    }

    Ok(())
}
