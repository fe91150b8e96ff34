use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use training_core::{contact_course, database::Database, types::ContactId};
use std::path::Path;

#[derive(Subcommand)]
pub enum ContactSubcommand {
    /// List the courses a contact is attached to through their jobs
    Courses { contact: u64 },
}

pub fn run(root: &Path, subcmd: ContactSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ContactSubcommand::Courses { contact } => courses(root, ContactId(contact), json),
    }
}

fn courses(root: &Path, contact: ContactId, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let rows = contact_course::courses_for_contact(&db, contact)?;

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("Contact {contact} is not attached to any course.");
        return Ok(());
    }
    let mut table = Vec::with_capacity(rows.len());
    for row in &rows {
        table.push(vec![
            row.course.to_string(),
            db.course(row.course)?.name.clone(),
            row.job.to_string(),
            or_dash(row.function.as_deref()),
        ]);
    }
    print_table(&["COURSE", "NAME", "JOB", "FUNCTION"], table);
    Ok(())
}
