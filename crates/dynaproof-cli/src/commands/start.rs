//! The `dynaproof start` command.

use anyhow::Result;

use super::Overrides;

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
    println!(
        "Registered {} ({}). Next: dynaproof question --learner {id}",
        profile.full_name(),
        profile.class_label
    );
    Ok(())
}
