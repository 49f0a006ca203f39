use crate::cli::commands::resolve_employee;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{action_colour, info};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::ListEntries { name, tag, all } = cmd {
        let store = Store::open(&cfg.database)?;

        if *all {
            let employees = store.list_employees(false)?;
            if employees.is_empty() {
                info("No employees registered.");
                return Ok(());
            }
            println!("{:<6} {:<30} {:<12} {}", "ID", "Name", "Role", "Tag");
            for e in employees {
                println!("{:<6} {:<30} {:<12} {}", e.id, e.name, e.role_str(), e.rfid_tag);
            }
            return Ok(());
        }

        let employee = resolve_employee(&store, name.as_deref(), tag.as_deref())?;
        let entries = store.list_entries(&employee, None, None)?;

        if entries.is_empty() {
            info(format!("No clock entries found for {}", employee));
            return Ok(());
        }

        println!("Clock entries for: {}", employee);
        println!("Total entries: {}", entries.len());
        println!("{:<6} {:<20} {:<8}", "ID", "Timestamp", "Action");

        // Newest first, like the entry editor shows them.
        for entry in entries.iter().rev() {
            let colour = action_colour(entry.action.is_in());
            println!(
                "{:<6} {:<20} {}",
                entry.id,
                entry.timestamp_str(),
                colour.paint(entry.action.to_db_str().to_uppercase())
            );
        }
    }

    Ok(())
}
