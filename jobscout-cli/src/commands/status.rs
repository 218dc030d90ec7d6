//! Status command

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::render::{print_resume, results_heading};
use crate::store;

/// Show what has been done so far
pub fn show_status(config: &Config) -> Result<()> {
    let state = store::load(&config.state_file)?;

    println!("{}", "JobScout Status:".bold());
    println!("  API:        {}", config.api_url.cyan());
    println!("  State file: {}", config.state_file.display().to_string().dimmed());

    println!("\n{}", "Résumé:".bold());
    match state.resume() {
        Some(resume) => print_resume(&resume),
        None => println!("  {}", "not uploaded".yellow()),
    }

    println!("\n{}", "Last Search:".bold());
    match state.search.current() {
        Some(results) => println!("  {}", results_heading(&results)),
        None => println!("  {}", "none".yellow()),
    }

    println!("\n{}", "Selected Job:".bold());
    match state.selected_job() {
        Some(job) => println!(
            "  {} at {} ({})",
            job.title.as_deref().unwrap_or("Untitled position"),
            job.company.as_deref().unwrap_or("-"),
            job.job_id.dimmed()
        ),
        None => println!("  {}", "none".yellow()),
    }

    println!("\n{}", "Application Kit:".bold());
    match state.kit.current() {
        Some(kit) => println!(
            "  {} ({} résumé bullet(s))",
            kit.kit_id.as_deref().unwrap_or("generated"),
            kit.resume_bullets.len()
        ),
        None => println!("  {}", "not generated".yellow()),
    }

    println!("\n{}", "Last Form Fill:".bold());
    match state.form_fill.current() {
        Some(outcome) => println!("  {} field(s) filled", outcome.filled_fields.len()),
        None => println!("  {}", "none".yellow()),
    }

    Ok(())
}
