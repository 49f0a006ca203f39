use chrono::Local;

use crate::cli::commands::resolve_employee;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportEngine;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        name,
        tag,
        from,
        to,
    } = cmd
    {
        let store = Store::open(&cfg.database)?;
        let employee = resolve_employee(&store, name.as_deref(), tag.as_deref())?;

        let end = match to {
            Some(s) => time::parse_date(s)?,
            None => Local::now().date_naive(),
        };
        let start = match from {
            Some(s) => time::parse_date(s)?,
            None => match store.first_active_entry(&employee)? {
                Some(first) => first.date(),
                None => end,
            },
        };

        let report = ReportEngine::generate(&store, &employee, start, end)?;

        println!("{}", "=".repeat(56));
        println!("WORKING TIME REPORT");
        println!("{}", "=".repeat(56));
        println!("Name:   {}", report.employee.name);
        println!("Period: {} to {}", report.start, report.end);

        if report.days.is_empty() {
            info("No time entries found for this period.");
            return Ok(());
        }

        println!("{}", "-".repeat(56));
        println!(
            "{:<12} {:<10} {:<10} {:<10}",
            "Date", "Clock In", "Clock Out", "Hours"
        );
        println!("{}", "-".repeat(56));

        for day in &report.days {
            for session in &day.sessions {
                let clock_out = session
                    .clock_out
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "(open)".to_string());
                let hours = session
                    .duration
                    .map(time::format_hms)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<12} {:<10} {:<10} {:<10}",
                    day.date.to_string(),
                    session.clock_in.format("%H:%M:%S").to_string(),
                    clock_out,
                    hours
                );
            }
        }

        println!("{}", "-".repeat(56));
        println!("SUMMARY");
        println!("Total worked:    {}", time::format_hms(report.totals.total));
        println!("Days worked:     {}", report.totals.days_with_work);
        println!(
            "Average per day: {}",
            time::format_hms(report.totals.average_per_day)
        );
        println!("{}", "=".repeat(56));

        for w in &report.warnings {
            warning(w);
        }
    }

    Ok(())
}
