//! The `dynaproof answer` command.

use anyhow::Result;

use dynaproof_core::engine::Submission;
use dynaproof_core::model::QUESTIONS_PER_SESSION;

use super::{print_result, with_hint, Overrides};

pub fn execute(overrides: &Overrides, learner: String, text: String) -> Result<()> {
    let (_, service) = overrides.service()?;

    let result = with_hint(service.submit_answer(&learner, &Submission::answer(text)))?;
    print_result(&result);

    let profile = service.profile(&learner)?;
    if profile.questions_answered >= QUESTIONS_PER_SESSION {
        println!("\nSession complete. Run: dynaproof summary --learner {learner}");
    } else {
        println!(
            "\n{}/{} answered. Next: dynaproof question --learner {learner}",
            profile.questions_answered, QUESTIONS_PER_SESSION
        );
    }
    Ok(())
}
