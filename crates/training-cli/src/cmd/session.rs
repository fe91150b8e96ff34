use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use training_core::{
    database::Database,
    duplicate::DuplicateWizard,
    records::Seance,
    store::TrainingStore,
    types::{GroupId, SessionId, SubscriptionLineId},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// List sessions
    List,
    /// Show a session with its groups and seances
    Show { id: u64 },
    /// Copy the session schedule to a group and move the selected subscribers onto it
    Duplicate {
        /// Session id
        session: u64,
        /// Group the schedule is duplicated for
        #[arg(long)]
        group: Option<u64>,
        /// Subscription line to move (repeatable)
        #[arg(long = "line", value_name = "LINE")]
        lines: Vec<u64>,
    },
}

pub fn run(root: &Path, subcmd: SessionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SessionSubcommand::List => list(root, json),
        SessionSubcommand::Show { id } => show(root, SessionId(id), json),
        SessionSubcommand::Duplicate {
            session,
            group,
            lines,
        } => duplicate(root, SessionId(session), group.map(GroupId), &lines, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;

    if json {
        return print_json(&db.sessions);
    }
    if db.sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }
    let rows = db
        .sessions
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                s.state.to_string(),
                s.group_ids.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "STATE", "GROUPS"], rows);
    Ok(())
}

fn show(root: &Path, id: SessionId, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let session = db.session(id)?;

    let mut groups = Vec::new();
    for group_id in &session.group_ids {
        let group = db.group(*group_id)?;
        let seances = db.group_seances(group.id)?;
        groups.push((group, seances));
    }

    if json {
        let groups: Vec<_> = groups
            .iter()
            .map(|(g, seances)| {
                serde_json::json!({
                    "id": g.id,
                    "name": g.name,
                    "seances": seances,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "id": session.id,
            "name": session.name,
            "state": session.state,
            "groups": groups,
        }));
    }

    println!("Session {}: {} [{}]", session.id, session.name, session.state);
    for (group, seances) in &groups {
        println!("\nGroup {}: {}", group.id, group.name);
        if seances.is_empty() {
            println!("  (no seances)");
            continue;
        }
        print_table(
            &["ID", "DATE", "MINUTES", "COURSE", "KIND", "PARTICIPANTS"],
            seances.iter().map(seance_row).collect(),
        );
    }
    Ok(())
}

fn seance_row(seance: &Seance) -> Vec<String> {
    let mut kind = seance.kind.to_string();
    if seance.duplicata {
        kind.push_str(" (copy)");
    }
    vec![
        seance.id.to_string(),
        seance.date.format("%Y-%m-%d %H:%M").to_string(),
        seance.duration_minutes.to_string(),
        seance.course.to_string(),
        kind,
        seance.participant_ids.len().to_string(),
    ]
}

fn duplicate(
    root: &Path,
    session: SessionId,
    group: Option<GroupId>,
    lines: &[u64],
    json: bool,
) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;

    let mut wizard =
        DuplicateWizard::for_session(session).with_lines(lines.iter().copied().map(SubscriptionLineId));
    if let Some(group) = group {
        wizard = wizard.with_group(group);
    }

    let outcome = db.transaction(|db| wizard.apply(db))?;
    db.save(root).context("failed to save database")?;

    if json {
        return print_json(&outcome);
    }
    println!(
        "Duplicated session {} for group {} (reference group {})",
        outcome.session, outcome.target_group, outcome.reference_group
    );
    if !outcome.created_seances.is_empty() {
        println!("  created {} seance(s)", outcome.created_seances.len());
    }
    println!("  moved {} participation(s)", outcome.repointed.len());
    Ok(())
}
