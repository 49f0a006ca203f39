use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::AddEmployee { name, tag, admin } = cmd {
        let store = Store::open(&cfg.database)?;
        let employee = store.create_employee(name, tag, *admin)?;

        success(format!(
            "Registered {} as {}",
            employee,
            employee.role_str()
        ));
    }

    Ok(())
}
