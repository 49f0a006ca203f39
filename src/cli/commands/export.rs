use chrono::Local;

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::export::{csv, fs_utils};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { out } = cmd {
        let store = Store::open(&cfg.database)?;
        let rows = store.export_rows()?;

        let explicit = out
            .as_deref()
            .or_else(|| (!cfg.export_path.is_empty()).then_some(cfg.export_path.as_str()));
        let dir = fs_utils::resolve_export_dir(explicit)?;

        let filename = format!(
            "TimeClock_Entries_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(filename);

        csv::write_raw_entries(&path, &rows)?;

        success(format!("Exported {} entries to {}", rows.len(), path.display()));
    }

    Ok(())
}
