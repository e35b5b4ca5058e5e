//! HTML cohort report.
//!
//! One self-contained page for the class instructor: a sortable learner
//! overview with a bar per mean score, then every learner's answers in a
//! collapsible table. Rows are coloured by the scoring tier of their score.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use dynaproof_core::report::{AnswerEntry, CohortReport, LearnerReport};
use dynaproof_core::scoring::ScoreTier;

/// Answers longer than this are cut in the per-answer table.
pub const ANSWER_PREVIEW_CHARS: usize = 200;

/// Escape text for element content and quoted attributes.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// First [`ANSWER_PREVIEW_CHARS`] characters of an answer.
fn preview(answer: &str) -> String {
    match answer.char_indices().nth(ANSWER_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &answer[..cut]),
        None => answer.to_string(),
    }
}

/// CSS class of the tier a score falls in.
fn tier_class(score: f64) -> String {
    let total = score.round().clamp(0.0, 100.0) as u32;
    format!("tier-{}", ScoreTier::from_total(total))
}

/// Render the cohort report as a complete HTML document.
pub fn generate_html(report: &CohortReport) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"tr\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>dynaproof: {} learners</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        report.learners.len()
    );
    let _ = writeln!(
        html,
        "<h1>Class report</h1>\n<p>{} learners | {} answers | generated {}</p>",
        report.learners.len(),
        report.total_answers,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    push_overview(&mut html, &report.learners);
    for learner in &report.learners {
        push_answers(&mut html, learner);
    }

    let _ = write!(html, "<script>{SORT_SCRIPT}</script>\n</body>\n</html>\n");
    html
}

fn push_overview(html: &mut String, learners: &[LearnerReport]) {
    if learners.is_empty() {
        html.push_str("<p>No answers have been logged yet.</p>\n");
        return;
    }

    html.push_str("<table id=\"overview\">\n<thead><tr>");
    for (col, label) in ["ID", "Name", "Class", "Answered", "Mean", "Best", "Worst"]
        .iter()
        .enumerate()
    {
        let _ = write!(html, "<th data-col=\"{col}\">{label}</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for learner in learners {
        let width = learner.mean_score.clamp(0.0, 100.0);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td data-value=\"{:.1}\"><span class=\"bar {}\" style=\"width:{width:.0}%\"></span>{:.1}</td>\
             <td>{}</td><td>{}</td></tr>",
            html_escape(&learner.learner_id),
            html_escape(&learner.full_name),
            html_escape(&learner.class_label),
            learner.answers.len(),
            learner.mean_score,
            tier_class(learner.mean_score),
            learner.mean_score,
            learner.best_score,
            learner.worst_score,
        );
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_answers(html: &mut String, learner: &LearnerReport) {
    let _ = writeln!(
        html,
        "<details>\n<summary>{} ({}), first answer {}</summary>",
        html_escape(&learner.full_name),
        html_escape(&learner.class_label),
        learner.started_at.format("%Y-%m-%d %H:%M")
    );
    html.push_str(
        "<table>\n<thead><tr><th>#</th><th>Difficulty</th><th>Question</th>\
         <th>Answer</th><th>Score</th><th>Feedback</th></tr></thead>\n<tbody>\n",
    );
    for answer in &learner.answers {
        push_answer_row(html, answer);
    }
    html.push_str("</tbody>\n</table>\n</details>\n");
}

fn push_answer_row(html: &mut String, answer: &AnswerEntry) {
    let _ = writeln!(
        html,
        "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        tier_class(f64::from(answer.score)),
        answer.ordinal,
        answer.difficulty,
        html_escape(&answer.question_text),
        html_escape(&preview(&answer.answer_text)),
        answer.score,
        html_escape(&answer.feedback),
    );
}

/// Write the HTML report to `path`, creating parent directories.
pub fn write_html_report(report: &CohortReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, generate_html(report))
        .with_context(|| format!("failed to write report to {}", path.display()))
}

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 70rem; margin: 2rem auto; padding: 0 1rem; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
#overview th { cursor: pointer; }
.bar { display: inline-block; height: 0.8rem; margin-right: 0.5rem; border-radius: 2px; }
.tier-excellent, .bar.tier-excellent { background: #bbf7d0; }
.tier-good, .bar.tier-good { background: #d9f99d; }
.tier-developing, .bar.tier-developing { background: #fde68a; }
.tier-weak, .bar.tier-weak { background: #fecaca; }
summary { cursor: pointer; margin: 0.5rem 0; }
";

// Click a header of the overview table to sort by that column.
const SORT_SCRIPT: &str = "
document.querySelectorAll('#overview th').forEach(th => th.addEventListener('click', () => {
  const body = th.closest('table').tBodies[0];
  const col = Number(th.dataset.col);
  const desc = th.dataset.dir !== 'desc';
  th.dataset.dir = desc ? 'desc' : 'asc';
  const key = row => row.cells[col].dataset.value ?? row.cells[col].textContent;
  const rows = Array.from(body.rows).sort((a, b) => {
    const x = key(a), y = key(b);
    const cmp = isNaN(x) || isNaN(y) ? x.localeCompare(y, 'tr') : x - y;
    return desc ? -cmp : cmp;
  });
  rows.forEach(r => body.appendChild(r));
}));
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dynaproof_core::model::DifficultyTier;
    use dynaproof_core::traits::EventRow;

    fn row(learner: &str, name: &str, ordinal: u32, score: u32, answer: &str) -> EventRow {
        EventRow {
            timestamp: Utc::now(),
            learner_id: learner.into(),
            full_name: name.into(),
            class_label: "7-A".into(),
            question_text: "(1/2) + (1/3) işleminin sonucunun neden 5/6 olduğunu adım adım açıkla."
                .into(),
            answer_text: answer.into(),
            score,
            difficulty: DifficultyTier::Basic,
            ordinal,
            feedback: "Mükemmel! | Devam et!".into(),
        }
    }

    fn make_test_report() -> CohortReport {
        CohortReport::from_events(&[
            row("a1b2c3d4", "Ada Kaya", 1, 100, "çünkü payda eşitlenir"),
            row("a1b2c3d4", "Ada Kaya", 2, 60, "payda"),
            row("ffee0011", "Can <Demir>", 1, 20, "bilmiyorum"),
        ])
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_test_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("a1b2c3d4"));
        assert!(html.contains("Ada Kaya"));
        assert!(html.contains("80.0"));
        assert!(html.contains("2 learners | 3 answers"));
        assert!(html.contains("style=\"width:80%\""));
    }

    #[test]
    fn rows_carry_score_tier() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("<tr class=\"tier-excellent\"><td>1</td>"));
        assert!(html.contains("<tr class=\"tier-developing\"><td>2</td>"));
        assert!(html.contains("bar tier-weak"));
        assert_eq!(tier_class(64.6), "tier-good");
    }

    #[test]
    fn names_are_escaped() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("Can &lt;Demir&gt;"));
        assert!(!html.contains("Can <Demir>"));
    }

    #[test]
    fn long_answers_are_truncated() {
        let long = "ş".repeat(ANSWER_PREVIEW_CHARS + 50);
        let report = CohortReport::from_events(&[row("a", "Ada Kaya", 1, 20, &long)]);
        let html = generate_html(&report);

        let cut = format!("{}…", "ş".repeat(ANSWER_PREVIEW_CHARS));
        assert!(html.contains(&cut));
        assert_eq!(preview("kısa"), "kısa");
    }

    #[test]
    fn empty_report_renders() {
        let html = generate_html(&CohortReport::from_events(&[]));
        assert!(html.contains("0 learners | 0 answers"));
        assert!(html.contains("No answers have been logged yet."));
        assert!(!html.contains("id=\"overview\""));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
