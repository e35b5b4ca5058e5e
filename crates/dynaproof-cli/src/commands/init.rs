//! The `dynaproof init` command.

use anyhow::Result;

use dynaproof_store::DynaproofConfig;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("dynaproof.toml");
    if path.exists() {
        println!("dynaproof.toml already exists, skipping.");
        return Ok(());
    }

    let body = DynaproofConfig::default().to_toml()?;
    std::fs::write(path, format!("{HEADER}{body}"))?;
    println!("Created dynaproof.toml");

    println!("\nNext steps:");
    println!("  1. Adjust data_dir and the keyword lists in dynaproof.toml");
    println!("  2. Run: dynaproof quiz --name Ada --surname Kaya --class 7-A");
    println!("  3. Run: dynaproof report");

    Ok(())
}

const HEADER: &str = "# dynaproof configuration\n\
# Set `seed = <number>` for reproducible question sequences.\n\n";
