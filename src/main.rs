use geogrid::{CsvCellConfig, GeoGridError, GridSize, Heatmap, csv_to_heatmap, read_gps_json};
use log::info;
use std::path::Path;

const USAGE: &str = "usage: geogrid-rs <gps.json|gps.csv> [grid_size]";

fn parse_grid_size(raw: &str) -> Result<GridSize, GeoGridError> {
    let degrees: f64 = raw.trim().parse().map_err(|_| {
        GeoGridError::InvalidArgument(format!("grid size '{}' is not a number; {}", raw, USAGE))
    })?;
    GridSize::new(degrees)
}

fn main() -> Result<(), GeoGridError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or_else(|| GeoGridError::InvalidArgument(USAGE.to_string()))?;
    let grid_size = match args.next() {
        Some(raw) => parse_grid_size(&raw)?,
        None => GridSize::default(),
    };

    let path = Path::new(&input);
    let heatmap = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => {
            let config = CsvCellConfig::from_coords("latitude", "longitude")
                .grid_size(grid_size)
                .skip_invalid_rows(true);
            csv_to_heatmap(path, &config)?
        }
        _ => {
            let points = read_gps_json(path)?;
            let mut heatmap = Heatmap::new(grid_size);
            heatmap.add_points(&points);
            heatmap
        }
    };

    info!(
        "{} cells, {} points, {} skipped",
        heatmap.len(),
        heatmap.total_points(),
        heatmap.skipped()
    );
    println!("{}", heatmap.to_json()?);

    Ok(())
}
