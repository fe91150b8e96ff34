use anyhow::Context;
use training_core::{config::Config, database::Database, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing training data in: {}", root.display());

    let dir = paths::training_dir(root);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config = serde_yaml::to_string(&Config::new(&project_name))?;
    let created = io::write_if_missing(&paths::config_path(root), config.as_bytes())
        .context("failed to write config.yaml")?;
    report(created, ".training/config.yaml");

    let db = serde_yaml::to_string(&Database::new())?;
    let created = io::write_if_missing(&paths::database_path(root), db.as_bytes())
        .context("failed to write db.yaml")?;
    report(created, ".training/db.yaml");

    println!("\nTraining data ready for '{project_name}'.");
    Ok(())
}

fn report(created: bool, file: &str) {
    if created {
        println!("  created: {file}");
    } else {
        println!("  exists:  {file}");
    }
}
