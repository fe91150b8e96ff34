use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use training_core::{
    config::{Config, WarnLevel},
    types::{PenaltyTrigger, ProductType, Threshold},
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show products, penalties and invoice thresholds
    Show,

    /// Validate a hand-edited config
    Validate,

    /// Products used for course supports and vouchers
    Product {
        #[command(subcommand)]
        subcommand: ProductSubcommand,
    },

    /// Penalty rates applied on discounts
    Penalty {
        #[command(subcommand)]
        subcommand: PenaltySubcommand,
    },

    /// Minimum and maximum invoice prices
    Threshold {
        #[command(subcommand)]
        subcommand: ThresholdSubcommand,
    },
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// Assign a product to a type: support_of_course or voucher
    Add {
        #[arg(value_name = "TYPE")]
        kind: ProductType,
        product: String,
    },
    Remove {
        #[arg(value_name = "TYPE")]
        kind: ProductType,
        product: String,
    },
}

#[derive(Subcommand)]
pub enum PenaltySubcommand {
    /// Define the rate (0-100) for a trigger: discount_refund or discount_invoice
    Add { trigger: PenaltyTrigger, rate: f64 },
    Remove { trigger: PenaltyTrigger },
}

#[derive(Subcommand)]
pub enum ThresholdSubcommand {
    /// Define the price for a threshold: minimum or maximum
    Add {
        threshold: Threshold,
        #[arg(allow_negative_numbers = true)]
        price: i64,
    },
    Remove { threshold: Threshold },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Product { subcommand } => product(root, subcommand),
        ConfigSubcommand::Penalty { subcommand } => penalty(root, subcommand),
        ConfigSubcommand::Threshold { subcommand } => threshold(root, subcommand),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if json {
        return print_json(&config);
    }

    println!("Project: {} (user: {})", config.project.name, config.project.user);
    if let Some(lang) = &config.project.lang {
        println!("Language: {lang}");
    }

    println!("\nProducts:");
    if config.products.is_empty() {
        println!("  (none)");
    } else {
        print_table(
            &["TYPE", "PRODUCT"],
            config
                .products
                .iter()
                .map(|p| vec![p.kind.to_string(), p.product.clone()])
                .collect(),
        );
    }

    println!("\nPenalties:");
    if config.penalties.is_empty() {
        println!("  (none)");
    } else {
        print_table(
            &["TRIGGER", "RATE"],
            config
                .penalties
                .iter()
                .map(|p| vec![p.trigger.to_string(), format!("{}%", p.rate)])
                .collect(),
        );
    }

    println!("\nInvoice thresholds:");
    if config.invoice_thresholds.is_empty() {
        println!("  (none)");
    } else {
        print_table(
            &["THRESHOLD", "PRICE"],
            config
                .invoice_thresholds
                .iter()
                .map(|t| vec![t.threshold.to_string(), t.price.to_string()])
                .collect(),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Table edits
// ---------------------------------------------------------------------------

fn product(root: &Path, subcmd: ProductSubcommand) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ProductSubcommand::Add { kind, product } => {
            config.add_product(kind, &product)?;
            println!("Assigned product '{product}' to {kind}");
        }
        ProductSubcommand::Remove { kind, product } => {
            if !config.remove_product(kind, &product) {
                anyhow::bail!("product '{product}' is not assigned to {kind}");
            }
            println!("Removed product '{product}' from {kind}");
        }
    }
    config.save(root).context("failed to save config")?;
    Ok(())
}

fn penalty(root: &Path, subcmd: PenaltySubcommand) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    match subcmd {
        PenaltySubcommand::Add { trigger, rate } => {
            config.add_penalty(trigger, rate)?;
            println!("Penalty {trigger}: {rate}%");
        }
        PenaltySubcommand::Remove { trigger } => {
            if !config.remove_penalty(trigger) {
                anyhow::bail!("no penalty defined for {trigger}");
            }
            println!("Removed penalty {trigger}");
        }
    }
    config.save(root).context("failed to save config")?;
    Ok(())
}

fn threshold(root: &Path, subcmd: ThresholdSubcommand) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ThresholdSubcommand::Add { threshold, price } => {
            config.add_threshold(threshold, price)?;
            println!("Invoice {threshold} threshold: {price}");
        }
        ThresholdSubcommand::Remove { threshold } => {
            if !config.remove_threshold(threshold) {
                anyhow::bail!("no {threshold} threshold defined");
            }
            println!("Removed {threshold} threshold");
        }
    }
    config.save(root).context("failed to save config")?;
    Ok(())
}
