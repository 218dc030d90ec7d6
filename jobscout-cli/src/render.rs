//! Terminal rendering
//!
//! Plain-text views of jobs, kits, form-fill outcomes and tasks. The
//! `*_line`/`*_heading` helpers are pure so the wording can be tested.

use colored::*;
use jobscout_core::domain::form::FormFillOutcome;
use jobscout_core::domain::job::{JobListing, SearchResults};
use jobscout_core::domain::kit::ApplicationKit;
use jobscout_core::domain::resume::ResumeRef;
use jobscout_core::domain::task::{Task, TaskStatus};

/// Longest description excerpt shown on a job card, in characters
const DESCRIPTION_EXCERPT: usize = 200;

pub const NO_JOBS: &str = "No jobs found. Try different search criteria.";
pub const NO_SCREENSHOT: &str = "No screenshot available";
pub const NO_FIELDS: &str = "No fields were filled";

/// Heading above a list of search results
pub fn results_heading(results: &SearchResults) -> String {
    if results.is_empty() {
        NO_JOBS.to_string()
    } else {
        format!("Found {} job(s)", results.len())
    }
}

/// Screenshot link of a form fill, or the placeholder
pub fn screenshot_line(outcome: &FormFillOutcome) -> String {
    match outcome.screenshot() {
        Some(url) => format!("Screenshot: {}", url),
        None => NO_SCREENSHOT.to_string(),
    }
}

/// One `field: value` line per filled field, or the placeholder
pub fn filled_field_lines(outcome: &FormFillOutcome) -> Vec<String> {
    if outcome.filled_fields.is_empty() {
        return vec![NO_FIELDS.to_string()];
    }

    outcome
        .filled_fields
        .iter()
        .map(|(field, value)| format!("{}: {}", field, value))
        .collect()
}

/// File name for a downloaded cover letter
pub fn cover_letter_filename(company: Option<&str>) -> String {
    let company: String = company
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    if company.is_empty() {
        "cover_letter.txt".to_string()
    } else {
        format!("cover_letter_{}.txt", company)
    }
}

/// Cuts `text` to at most `max` characters, marking the cut
pub fn excerpt(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Print the results of a search, numbered for `jobs select`
pub fn print_search_results(results: &SearchResults) {
    if results.is_empty() {
        println!("{}", NO_JOBS.yellow());
        return;
    }

    println!("{}", format!("{}:", results_heading(results)).bold());
    println!();
    for (index, job) in results.jobs.iter().enumerate() {
        print_job_card(Some(index + 1), job);
    }
}

/// Print a job summary
pub fn print_job_card(index: Option<usize>, job: &JobListing) {
    let title = job.title.as_deref().unwrap_or("Untitled position");
    match index {
        Some(index) => println!("  {} {}", format!("[{}]", index).cyan(), title.bold()),
        None => println!("  {} {}", "▸".cyan(), title.bold()),
    }

    println!("    ID:       {}", job.job_id.dimmed());
    if let Some(company) = &job.company {
        println!("    Company:  {}", company);
    }
    if let Some(location) = &job.location {
        println!("    Location: {}", location);
    }
    if let Some(salary) = &job.salary_range {
        println!("    Salary:   {}", salary);
    }
    if let Some(posted) = &job.posted_date {
        println!("    Posted:   {}", posted.dimmed());
    }
    if let Some(status) = &job.status {
        println!("    Stage:    {}", status.cyan());
    }
    if let Some(url) = job.application_url() {
        println!("    URL:      {}", url.underline());
    }
    if let Some(description) = job.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("    {}", excerpt(description, DESCRIPTION_EXCERPT).dimmed());
    }
    println!();
}

/// Print a generated kit
pub fn print_kit(kit: &ApplicationKit) {
    println!("{}", "Application Kit:".bold());
    if let Some(kit_id) = &kit.kit_id {
        println!("  Kit ID: {}", kit_id.cyan());
    }
    if let Some(job_id) = &kit.job_id {
        println!("  Job ID: {}", job_id.dimmed());
    }

    println!("\n{}", "Cover Letter:".bold());
    match kit.cover_letter() {
        Some(letter) => println!("{}", letter),
        None => println!("{}", "No cover letter generated".yellow()),
    }

    if !kit.resume_bullets.is_empty() {
        println!("\n{}", "Résumé Bullets:".bold());
        for bullet in &kit.resume_bullets {
            println!("  • {}", bullet);
        }
    }

    if let Some(url) = &kit.cover_letter_url {
        println!("\n  Download: {}", url.underline());
    }
}

/// Print the outcome of a form fill
pub fn print_form_fill(outcome: &FormFillOutcome) {
    println!("{}", "✓ Form filled".green().bold());
    if let Some(message) = &outcome.message {
        println!("  {}", message);
    }
    if let Some(title) = &outcome.job_title {
        let company = outcome.company.as_deref().unwrap_or("-");
        println!("  Job: {} at {}", title, company);
    }

    println!("\n{}", "Filled Fields:".bold());
    for line in filled_field_lines(outcome) {
        println!("  {}", line);
    }

    println!("\n{}", screenshot_line(outcome));
}

/// Print a stored résumé reference
pub fn print_resume(resume: &ResumeRef) {
    println!("  File:   {}", resume.filename.as_deref().unwrap_or("-"));
    println!("  S3 key: {}", resume.s3_key.dimmed());
}

/// Print the raw status of a task
pub fn print_task(task_id: &str, task: &Task) {
    println!("{}", "Task Details:".bold());
    println!("  ID:      {}", task_id.cyan());
    println!("  Status:  {}", colorize_status(&task.status));

    if let Some(created) = task.created_at {
        println!("  Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(updated) = task.updated_at {
        println!("  Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(error) = &task.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(result) = &task.result {
        println!("\n{}", "Result:".bold());
        match serde_json::to_string_pretty(result) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", result),
        }
    }
}

/// Colorize task status for display
pub fn colorize_status(status: &TaskStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        TaskStatus::Pending => text.yellow(),
        TaskStatus::Processing => text.cyan(),
        TaskStatus::Completed => text.green(),
        TaskStatus::Failed => text.red(),
        TaskStatus::Unknown(_) => text.dimmed(),
    }
}
