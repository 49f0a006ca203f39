use crate::cli::commands::resolve_employee;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::ChangeEmployeeName {
        name,
        tag,
        new_name,
    } = cmd
    {
        let store = Store::open(&cfg.database)?;
        let employee = resolve_employee(&store, name.as_deref(), tag.as_deref())?;

        let old_name = employee.name.clone();
        let updated = store.update_employee_name(employee.id, new_name)?;

        success(format!("Renamed '{}' to '{}'", old_name, updated.name));
    }

    Ok(())
}
