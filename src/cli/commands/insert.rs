use chrono::Local;

use crate::cli::commands::resolve_employee;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::InsertEntry { name, tag, time: at } = cmd {
        let store = Store::open(&cfg.database)?;
        let employee = resolve_employee(&store, name.as_deref(), tag.as_deref())?;

        let timestamp = match at {
            Some(s) => time::parse_datetime(s)?,
            None => Local::now().naive_local(),
        };

        if let Some(last) = store.get_last_active_entry(&employee)? {
            info(format!(
                "Last entry: {} - {}",
                last.timestamp_str(),
                last.action.to_db_str().to_uppercase()
            ));
        } else {
            info("No previous entries found");
        }

        let entry = store.insert_manual_entry(&employee, timestamp)?;

        success(format!(
            "Entry {} created: {} {} @ {}",
            entry.id,
            employee.name,
            entry.action.to_db_str().to_uppercase(),
            entry.timestamp_str()
        ));
    }

    Ok(())
}
