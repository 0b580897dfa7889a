use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tempr::dataset;
use tempr::device::{list_platforms_devices, GpuClient};
use tempr::pipeline;

#[derive(Parser)]
#[command(
    name = "tempr",
    about = "GPU-accelerated temperature statistics: min, max, average, histogram",
    version,
    long_about = None
)]
struct Cli {
    /// Select platform (backend group)
    #[arg(short = 'p', long = "platform", default_value_t = 0)]
    platform: usize,

    /// Select device within the platform
    #[arg(short = 'd', long = "device", default_value_t = 0)]
    device: usize,

    /// List all platforms and devices, then exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Number of histogram bins; prompted interactively when omitted
    #[arg(short = 'b', long = "bins")]
    bins: Option<u32>,

    /// Dataset file of whitespace-delimited temperature records
    #[arg(default_value = "temp_lincolnshire.txt")]
    dataset: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        print!("{}", list_platforms_devices()?);
        return Ok(());
    }

    let readings = dataset::load_readings(&cli.dataset)?;
    println!("File read complete, {} records found", readings.len());
    let temperatures = dataset::temperatures(&readings);

    let client = GpuClient::new(cli.platform, cli.device)?;
    println!(
        "Running on {} ({:?})",
        client.adapter_name(),
        client.backend()
    );

    let bin_count = match cli.bins {
        Some(n) if n >= 1 => n,
        Some(n) => anyhow::bail!("--bins must be a positive integer, got {n}"),
        None => prompt_bin_count()?,
    };

    let summary = pipeline::run(&client, &temperatures, bin_count)?;

    println!();
    println!("Minimum Temp = {}", summary.min);
    println!("Maximum Temp = {}", summary.max);
    println!("Average Temp = {}", summary.average);
    println!();
    println!("Histogram:");
    let range = summary.max - summary.min + 1;
    for (b, count) in summary.histogram.iter().enumerate() {
        let (lo, hi) = pipeline::bin_bounds(b, summary.min, bin_count, range);
        println!("  [{lo:>5}, {hi:>5})  {count}");
    }

    Ok(())
}

/// Solicit the bin count on stdin, re-prompting until a positive integer
/// arrives.
fn prompt_bin_count() -> Result<u32> {
    loop {
        print!("How many bins would you like in your histogram? ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = std::io::stdin().read_line(&mut line)?;
        if read == 0 {
            anyhow::bail!("stdin closed before a bin count was provided");
        }

        match line.trim().parse::<u32>() {
            Ok(n) if n >= 1 => return Ok(n),
            _ => eprintln!("Bin count must be a positive integer"),
        }
    }
}
