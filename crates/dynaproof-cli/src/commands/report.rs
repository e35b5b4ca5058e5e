//! The `dynaproof report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use dynaproof_core::report::CohortReport;
use dynaproof_report::html::write_html_report;

use super::Overrides;

pub fn execute(overrides: &Overrides, output: Option<PathBuf>, format: String) -> Result<()> {
    let extension = match format.as_str() {
        "html" => "html",
        "json" => "json",
        other => anyhow::bail!("unknown format: {other} (expected html or json)"),
    };

    let (config, service) = overrides.service()?;
    let report = CohortReport::from_events(&service.events());
    let path = output.unwrap_or_else(|| config.data_dir.join(format!("report.{extension}")));

    if extension == "json" {
        report.save_json(&path)?;
    } else {
        write_html_report(&report, &path)?;
    }

    print_overview(&report);
    println!("Report: {}", path.display());
    Ok(())
}

fn print_overview(report: &CohortReport) {
    if report.learners.is_empty() {
        println!("No answers logged yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Class", "Answered", "Mean", "Best", "Worst"]);
    for learner in &report.learners {
        table.add_row(vec![
            Cell::new(&learner.learner_id),
            Cell::new(&learner.full_name),
            Cell::new(&learner.class_label),
            Cell::new(learner.answers.len()),
            Cell::new(format!("{:.1}", learner.mean_score)),
            Cell::new(learner.best_score),
            Cell::new(learner.worst_score),
        ]);
    }

    println!("{table}");
}
