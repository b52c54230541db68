use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use descent_core::comparison::DescentComparison;
use descent_core::rotating_fall::FallSimulation;
use descent_core::solvers::Stepper;
use descent_core::{DescentConfig, FallConfig};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Parses a JSON config; absent fields keep their defaults.
pub fn parse_config<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).context("Failed to parse config JSON.")
}

pub fn load_config<T: DeserializeOwned + Default>(path: Option<&str>) -> Result<T> {
    match path {
        None => Ok(T::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {path}."))?;
            parse_config(&text).with_context(|| format!("Invalid config file {path}."))
        }
    }
}

pub fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(Path::new(path))
                .with_context(|| format!("Failed to create output file {path}."))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize frames.")?;
    writeln!(writer)?;
    writer.flush().context("Failed to flush output.")?;
    Ok(())
}

pub fn run_fall(matches: &ArgMatches) -> Result<()> {
    let mut config: FallConfig = load_config(matches.value_of("config"))?;
    if let Some(name) = matches.value_of("stepper") {
        config.stepper =
            Stepper::from_name(name).ok_or_else(|| anyhow!("Unknown stepper `{name}`."))?;
    }

    let run = FallSimulation::new(config)
        .context("Invalid fall configuration.")?
        .run();
    info!("fall produced {} frames", run.frames.len());
    write_json(&run, matches.value_of("output"))
}

pub fn run_race(matches: &ArgMatches) -> Result<()> {
    let config: DescentConfig = load_config(matches.value_of("config"))?;
    let comparison = DescentComparison::new(config).context("Failed to build descent curves.")?;

    if matches.is_present("summary") {
        return write_json(&comparison.summary(), matches.value_of("output"));
    }

    let frames = comparison
        .frames()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to sample descent frames.")?;
    info!("race produced {} frames", frames.len());
    write_json(&RaceExport::new(&comparison, frames), matches.value_of("output"))
}

/// Everything a renderer needs: the static curves plus the moving markers.
#[derive(Serialize)]
struct RaceExport<'a> {
    curves: Vec<&'a descent_core::curves::Curve>,
    summary: descent_core::comparison::DescentSummary,
    frames: Vec<descent_core::comparison::DescentFrame>,
}

impl<'a> RaceExport<'a> {
    fn new(
        comparison: &'a DescentComparison,
        frames: Vec<descent_core::comparison::DescentFrame>,
    ) -> Self {
        Self {
            curves: comparison.runs().iter().map(|run| &run.curve).collect(),
            summary: comparison.summary(),
            frames,
        }
    }
}
