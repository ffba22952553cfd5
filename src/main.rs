use std::path::PathBuf;

use anyhow::{Context, Result};
use rusty_phase::config::ViewConfig;
use rusty_phase::data::loader;
use rusty_phase::state::AppState;

const USAGE: &str = "usage: rusty-phase <data.csv|data.json|data.parquet> [config.json] [y-header]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data_path = PathBuf::from(args.next().context(USAGE)?);
    let config = match args.next() {
        Some(path) => ViewConfig::from_json_file(&PathBuf::from(path))?,
        None => ViewConfig::default(),
    };
    let y_header = args.next();

    let table = loader::load_file(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))?;

    let mut state = AppState::with_config(config)?;
    state.set_table(table)?;
    if let Some(header) = y_header {
        state.select_y_header(&header)?;
    }

    let snapshot = state.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
