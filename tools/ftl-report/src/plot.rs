use std::iter::zip;
use std::path::Path;

use plotters::prelude::*;

use flash_ftl::metrics::{MetricsTable, METRIC_NAMES};

const CHART_SIZE: (u32, u32) = (640, 480);

/// Chart file name for a metric: lower-cased, spaces replaced with underscores.
pub(crate) fn chart_file_name(metric: &str) -> String {
    format!("{}.png", metric.to_lowercase().replace(' ', "_"))
}

/// Renders one line chart per metric into `out_dir`, overwriting existing files.
pub(crate) fn render_charts(table: &MetricsTable, out_dir: &Path) {
    let blocks: Vec<f64> = table.disk_blocks().iter().map(|&v| v as f64).collect();
    for (idx, metric) in METRIC_NAMES.iter().enumerate() {
        let values: Vec<f64> = table.column(idx).iter().map(|&v| v as f64).collect();
        draw_line_chart(&out_dir.join(chart_file_name(metric)), metric, &blocks, &values);
    }
}

fn draw_line_chart(path: &Path, metric: &str, blocks: &[f64], values: &[f64]) {
    let root_area = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root_area.fill(&WHITE).unwrap();
    let max = values.iter().fold(0., |acc, &v| f64::max(acc, v)) * 1.1;
    let mut ctx = ChartBuilder::on(&root_area)
        .caption(format!("{} vs Disk Blocks", metric), ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(blocks[0]..blocks.last().copied().unwrap(), 0.0..max)
        .unwrap();
    ctx.configure_mesh()
        .y_desc(metric)
        .x_desc("Number of Disk Blocks")
        .draw()
        .unwrap();
    let style = Into::<ShapeStyle>::into(BLUE).filled();
    ctx.draw_series(LineSeries::new(zip(blocks.iter(), values.iter()).map(|(x, y)| (*x, *y)), style).point_size(5))
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_table;

    #[test]
    fn file_names_follow_metric_names() {
        assert_eq!(chart_file_name("Disk Reads"), "disk_reads.png");
        assert_eq!(chart_file_name("Flash Erases"), "flash_erases.png");
    }

    #[test]
    fn renders_one_file_per_metric() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();

        render_charts(&table, dir.path());
        for name in [
            "disk_reads.png",
            "disk_writes.png",
            "flash_reads.png",
            "flash_writes.png",
            "flash_erases.png",
        ] {
            assert!(dir.path().join(name).is_file());
        }
        assert_eq!(dir.path().read_dir().unwrap().count(), 5);

        // Re-rendering overwrites the files instead of accumulating new ones
        render_charts(&table, dir.path());
        assert_eq!(dir.path().read_dir().unwrap().count(), 5);
    }
}
