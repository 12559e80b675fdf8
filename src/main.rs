use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use vmprobe::scenario::{Pause, ScenarioConfig, ScenarioReport, run_scenario};
use vmprobe_core::platform::NativeProvider;
use vmprobe_core::usage::UsageKind;
use vmprobe_core::util::Size;

/// CLI arguments for the vmprobe binary.
///
/// The defaults reproduce the original interactive demo: a 4 GiB region,
/// a 2 second observation delay inside each scenario, and both scenarios in
/// sequence.
#[derive(Debug, Parser, Serialize, Clone)]
#[command(about = "Demand-paging probe: reserve, touch, and measure virtual memory")]
struct CliArgs {
    /// Region size to reserve per scenario, in GiB.
    #[clap(long = "size-gb", default_value = "4")]
    size_gb: usize,
    /// Observation delay before each release, in seconds.
    #[clap(long = "delay-secs", default_value = "2")]
    delay_secs: u64,
    /// Pause for Enter instead of sleeping.
    #[clap(long = "interactive")]
    interactive: bool,
    /// Skip all pauses (for automated runs).
    #[clap(long = "skip-pauses")]
    skip_pauses: bool,
    /// Report the peak resident size instead of the current one.
    #[clap(long = "peak")]
    peak: bool,
    /// Omit the usage sample between reservation and touching.
    #[clap(long = "no-pretouch-sample")]
    no_pretouch_sample: bool,
    /// Which scenario(s) to run.
    #[clap(long = "scenario", value_enum, default_value = "both")]
    scenario: ScenarioSelect,
    /// Output file for the scenario transcript (JSON format).
    #[clap(long = "output")]
    output: Option<String>,
    /// Verbose output - enables debug logging.
    #[clap(long = "verbose", short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum ScenarioSelect {
    /// Reserve only; no page is ever touched.
    Lazy,
    /// Reserve and touch every page.
    Commit,
    /// Lazy first, then force commit.
    Both,
}

#[derive(Debug, Serialize)]
struct RunResults {
    args: CliArgs,
    scenarios: Vec<ScenarioReport>,
}

impl RunResults {
    fn save_to_file(&self, filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Transcript saved to {}", filename);
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let progress =
        vmprobe::init_logging_with_progress(if args.verbose { "debug" } else { "info" })?;
    info!("CLI args: {:?}", args);

    let provider = NativeProvider;
    let size = Size::GB(args.size_gb);
    let usage_kind = if args.peak {
        UsageKind::Peak
    } else {
        UsageKind::Resident
    };
    let pause = if args.skip_pauses {
        Pause::None
    } else if args.interactive {
        Pause::Interactive
    } else {
        Pause::Timed(Duration::from_secs(args.delay_secs))
    };

    println!(
        "Memory paging strategy probe ({}: mmap/VirtualAlloc, {} region)",
        std::env::consts::OS,
        size
    );

    let mut configs = Vec::new();
    if matches!(args.scenario, ScenarioSelect::Lazy | ScenarioSelect::Both) {
        configs.push(ScenarioConfig::lazy(size));
    }
    if matches!(args.scenario, ScenarioSelect::Commit | ScenarioSelect::Both) {
        configs.push(ScenarioConfig::force_commit(size));
    }

    let mut results = RunResults {
        args: args.clone(),
        scenarios: Vec::new(),
    };
    let mut first = true;
    for mut config in configs {
        config.pause = pause;
        config.usage_kind = usage_kind;
        config.sample_before_touch = !args.no_pretouch_sample;
        if !first {
            println!("\nNext up: {} scenario", config.name);
            pause.wait();
        }
        first = false;

        // A refused reservation is the one fatal error: exit non-zero.
        let report = run_scenario(&provider, &config, Some(&progress))
            .with_context(|| format!("{} scenario aborted", config.name))?;
        results.scenarios.push(report);
    }

    if let Some(output) = &args.output {
        results.save_to_file(output)?;
    }

    Ok(())
}
