use anyhow::Result;
use clap::Parser;
use energy_s::artifact::Artifact;
use energy_s::registry::ModelName;
use energy_s::util::{self, config::GatewayConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate the model artifacts an energy-s config points to")]
struct Args {
    #[arg(short, long, env = "ENERGY_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    util::init_logging("warn");

    let config = GatewayConfig::load(args.config.as_deref())?;

    let mut failed = 0;
    for name in ModelName::ALL {
        let path = config.models.path_for(name);
        let checked = Artifact::from_file(&path).and_then(|artifact| {
            name.check(&artifact)?;
            Ok(artifact)
        });
        match checked {
            Ok(artifact) => println!(
                "ok      {:<20} {:<26} {}",
                name,
                artifact.kind(),
                path.display()
            ),
            Err(e) => {
                failed += 1;
                println!("FAILED  {:<20} {} ({})", name, path.display(), e);
            }
        }
    }

    match config.calendar() {
        Ok(calendar) => {
            let years: Vec<i32> = calendar.covered_years().collect();
            match (years.first(), years.last()) {
                (Some(first), Some(last)) => {
                    println!("ok      {:<20} lunar holidays {}-{}", "calendar", first, last)
                }
                _ => println!("WARN    {:<20} no lunar holiday data", "calendar"),
            }
            // Missing years still serve, so they warn without failing the check.
            for year in calendar.uncovered_upcoming(1) {
                println!(
                    "WARN    {:<20} no lunar holidays for {}, add them via [holidays] extra_file",
                    "calendar", year
                );
            }
        }
        Err(e) => {
            failed += 1;
            println!("FAILED  holiday calendar: {e:#}");
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
