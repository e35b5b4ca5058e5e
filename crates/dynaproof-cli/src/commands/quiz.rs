//! The `dynaproof quiz` command: a whole session over stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use dynaproof_core::engine::{AssessmentService, NextQuestion, Submission};

use super::{print_question, print_result, print_summary, Overrides};

pub fn execute(
    overrides: &Overrides,
    name: String,
    surname: String,
    class_label: String,
) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "name must not be empty");
    anyhow::ensure!(!surname.trim().is_empty(), "surname must not be empty");

    let (_, service) = overrides.service()?;
    let (id, profile) = service.register(&name, &surname, &class_label)?;
    println!("Learner ID: {id}");
    println!("Welcome, {}. Type your explanation and press Enter.\n", profile.full_name());

    let stdin = std::io::stdin();
    run(&service, &id, stdin.lock())
}

/// Ask questions until the session completes or input runs out.
fn run(service: &AssessmentService, id: &str, mut input: impl BufRead) -> Result<()> {
    loop {
        let view = match service.next_question(id)? {
            NextQuestion::Question(view) => view,
            NextQuestion::Completed(summary) => {
                println!("Session complete.");
                print_summary(&summary);
                return Ok(());
            }
        };

        print_question(&view);
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("failed to read answer")?;
        if read == 0 {
            println!("\nInput closed. Resume with: dynaproof question --learner {id}");
            return Ok(());
        }

        let result = service.submit_answer(id, &Submission::answer(line.trim_end()))?;
        print_result(&result);
        println!();
    }
}
