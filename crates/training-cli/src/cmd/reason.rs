use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use training_core::{config::Config, database::Database, pending_reason as reason_ops};
use std::path::Path;

#[derive(Subcommand)]
pub enum ReasonSubcommand {
    /// Add a pending reason
    Add {
        code: String,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Set the name of a reason in another language
    Translate {
        code: String,
        lang: String,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List reasons as offered for selection
    List {
        /// Language to show names in (default: project.lang from config.yaml)
        #[arg(long)]
        lang: Option<String>,
    },
    /// Remove a pending reason
    Remove { code: String },
}

pub fn run(root: &Path, subcmd: ReasonSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReasonSubcommand::Add { code, name } => add(root, &code, &name.join(" "), json),
        ReasonSubcommand::Translate { code, lang, name } => {
            translate(root, &code, &lang, &name.join(" "), json)
        }
        ReasonSubcommand::List { lang } => list(root, lang, json),
        ReasonSubcommand::Remove { code } => remove(root, &code, json),
    }
}

fn add(root: &Path, code: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;
    reason_ops::add_reason(&mut db.pending_reasons, code, name)?;
    db.save(root).context("failed to save database")?;

    if json {
        print_json(&serde_json::json!({ "code": code, "name": name }))?;
    } else {
        println!("Added pending reason '{code}': {name}");
    }
    Ok(())
}

fn translate(root: &Path, code: &str, lang: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;
    reason_ops::translate_reason(&mut db.pending_reasons, code, lang, name)?;
    db.save(root).context("failed to save database")?;

    if json {
        print_json(&serde_json::json!({ "code": code, "lang": lang, "name": name }))?;
    } else {
        println!("Translated '{code}' [{lang}]: {name}");
    }
    Ok(())
}

fn list(root: &Path, lang: Option<String>, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let lang = match lang {
        Some(lang) => Some(lang),
        None => Config::load(root)
            .context("failed to load config")?
            .project
            .lang,
    };
    let choices = reason_ops::selection(&db.pending_reasons, lang.as_deref());

    if json {
        let items: Vec<_> = choices
            .iter()
            .map(|(code, name)| serde_json::json!({ "code": code, "name": name }))
            .collect();
        return print_json(&items);
    }
    if choices.is_empty() {
        println!("No pending reasons.");
        return Ok(());
    }
    let rows = choices
        .into_iter()
        .map(|(code, name)| vec![code, name])
        .collect();
    print_table(&["CODE", "NAME"], rows);
    Ok(())
}

fn remove(root: &Path, code: &str, json: bool) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;
    let removed = reason_ops::remove_reason(&mut db.pending_reasons, &db.course_pendings, code)?;
    db.save(root).context("failed to save database")?;

    if json {
        print_json(&removed)?;
    } else {
        println!("Removed pending reason '{}'", removed.code);
    }
    Ok(())
}
