use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::tag;

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::DeleteEntry {
        id,
        name,
        tag: tag_id,
        force,
    } = cmd
    {
        let store = Store::open(&cfg.database)?;

        let entry = store
            .get_entry(*id)?
            .ok_or_else(|| AppError::InvalidInput(format!("entry {} not found", id)))?;

        if !entry.active {
            return Err(AppError::InvalidInput(format!(
                "entry {} is already deleted",
                id
            )));
        }

        let employee = store
            .get_employee(entry.employee_id)?
            .ok_or_else(|| AppError::Other(format!("no employee for entry {}", id)))?;

        //
        // Ownership verification, unless forced
        //
        if !force {
            if let Some(t) = tag_id {
                if employee.rfid_tag != tag::normalize(t) {
                    return Err(AppError::InvalidInput(format!(
                        "entry {} belongs to {}, not tag {}",
                        id, employee, t
                    )));
                }
            } else if let Some(n) = name {
                if !employee.name.to_lowercase().contains(&n.to_lowercase()) {
                    return Err(AppError::InvalidInput(format!(
                        "entry {} belongs to {}, not '{}'",
                        id, employee, n
                    )));
                }
            }
        }

        info(format!(
            "Entry to delete: {} | {} | {} {}",
            entry.id,
            employee,
            entry.timestamp_str(),
            entry.action.to_db_str().to_uppercase()
        ));

        if !force
            && !ask_confirmation("Delete this entry? The in/out sequence will be repaired.")
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let deleted = store.soft_delete_entries(&[entry.id])?;
        if deleted == 0 {
            return Err(AppError::Other(format!("failed to delete entry {}", id)));
        }

        success(format!(
            "Entry {} deleted; remaining entries repaired.",
            entry.id
        ));
    }

    Ok(())
}
