//! The `dynaproof summary` command.

use anyhow::Result;

use super::{print_summary, with_hint, Overrides};

pub fn execute(overrides: &Overrides, learner: String) -> Result<()> {
    let (_, service) = overrides.service()?;
    let summary = with_hint(service.summary(&learner))?;
    print_summary(&summary);
    Ok(())
}
