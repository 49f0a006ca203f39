pub mod add;
pub mod del;
pub mod export;
pub mod init;
pub mod insert;
pub mod list;
pub mod rename;
pub mod report;
pub mod run;

use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::utils::tag;

/// Resolve an employee from `--tag` or `--name` (partial, must be
/// unambiguous; an exact name match wins over partial ones).
pub fn resolve_employee(
    store: &Store,
    name: Option<&str>,
    tag_id: Option<&str>,
) -> AppResult<Employee> {
    if let Some(t) = tag_id {
        return store
            .get_employee_by_tag(t)?
            .ok_or_else(|| AppError::UnknownTag(tag::normalize(t)));
    }

    if let Some(n) = name {
        let mut matches = store.find_employees_by_name(n)?;

        if let Some(exact) = matches.iter().find(|e| e.name.eq_ignore_ascii_case(n)) {
            return Ok(exact.clone());
        }

        return match matches.len() {
            0 => Err(AppError::InvalidInput(format!(
                "no employee found with name: {}",
                n
            ))),
            1 => Ok(matches.remove(0)),
            _ => {
                let candidates = matches
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(AppError::InvalidInput(format!(
                    "multiple employees match '{}': {}",
                    n, candidates
                )))
            }
        };
    }

    Err(AppError::InvalidInput(
        "provide --name or --tag to identify the employee".into(),
    ))
}
