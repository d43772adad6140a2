use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use env_logger::Builder;
use log::info;

use flash_ftl::workload::{self, WorkloadConfig};

/// Flash translation layer benchmark
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a workload config in YAML format (built-in sample workload by default).
    #[arg(long)]
    config: Option<String>,

    /// Number of read/write requests per disk size (>= 1).
    #[arg(long)]
    requests: Option<u64>,

    /// Seed for the request generator.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();

    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let mut config: WorkloadConfig = match &args.config {
        Some(path) => serde_yaml::from_reader(File::open(Path::new(path)).unwrap()).unwrap(),
        None => WorkloadConfig::default(),
    };
    if let Some(requests) = args.requests {
        config.requests = requests;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!("running workload: {:?}", config);

    let t = Instant::now();
    let table = workload::run(&config).unwrap();
    println!("{}", table);
    println!(
        "Measured {} disk sizes with {} requests each in {:.2?}",
        table.len(),
        config.requests,
        t.elapsed()
    );
}
