//! The `dynaproof question` command.

use anyhow::Result;

use dynaproof_core::engine::NextQuestion;

use super::{print_question, print_summary, with_hint, Overrides};

pub fn execute(overrides: &Overrides, learner: String) -> Result<()> {
    let (_, service) = overrides.service()?;

    match with_hint(service.next_question(&learner))? {
        NextQuestion::Question(view) => print_question(&view),
        NextQuestion::Completed(summary) => {
            println!("Session complete.");
            print_summary(&summary);
        }
    }
    Ok(())
}
