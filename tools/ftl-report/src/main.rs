mod plot;
mod sample;

use std::io::Write;
use std::path::Path;

use env_logger::Builder;
use log::info;

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let table = sample::sample_table();
    println!("{}", table);

    plot::render_charts(&table, Path::new("."));
    info!("saved {} charts", flash_ftl::metrics::METRIC_NAMES.len());
}
