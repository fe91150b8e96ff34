use crate::error::{Result, TrainingError};
use crate::paths;
use crate::types::{PenaltyTrigger, ProductType, Threshold};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Configuration tables
// ---------------------------------------------------------------------------

/// Product used for a kind of training item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProduct {
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub product: String,
}

/// Discount rate, in percent, applied when a penalty trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigPenalty {
    pub trigger: PenaltyTrigger,
    pub rate: f64,
}

/// Invoicing price bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInvoice {
    pub threshold: Threshold,
    pub price: i64,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Login recorded on follow-ups when no user is given on the command line.
    #[serde(default = "default_user")]
    pub user: String,
    /// Language used for translated lookup names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

fn default_user() -> String {
    "admin".to_string()
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ConfigProduct>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub penalties: Vec<ConfigPenalty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invoice_thresholds: Vec<ConfigInvoice>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                user: default_user(),
                lang: None,
            },
            products: Vec::new(),
            penalties: Vec::new(),
            invoice_thresholds: Vec::new(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(TrainingError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_product(&mut self, kind: ProductType, product: impl Into<String>) -> Result<()> {
        let product = product.into();
        if self
            .products
            .iter()
            .any(|p| p.kind == kind && p.product == product)
        {
            return Err(TrainingError::DuplicateProduct {
                kind: kind.to_string(),
                product,
            });
        }
        self.products.push(ConfigProduct { kind, product });
        Ok(())
    }

    /// Remove a product assignment. Returns `false` if it was not present.
    pub fn remove_product(&mut self, kind: ProductType, product: &str) -> bool {
        let before = self.products.len();
        self.products
            .retain(|p| !(p.kind == kind && p.product == product));
        self.products.len() < before
    }

    pub fn products_for(&self, kind: ProductType) -> impl Iterator<Item = &str> {
        self.products
            .iter()
            .filter(move |p| p.kind == kind)
            .map(|p| p.product.as_str())
    }

    pub fn add_penalty(&mut self, trigger: PenaltyTrigger, rate: f64) -> Result<()> {
        check_rate(rate)?;
        if self.penalties.iter().any(|p| p.trigger == trigger) {
            return Err(TrainingError::DuplicatePenalty(trigger.to_string()));
        }
        self.penalties.push(ConfigPenalty { trigger, rate });
        Ok(())
    }

    pub fn remove_penalty(&mut self, trigger: PenaltyTrigger) -> bool {
        let before = self.penalties.len();
        self.penalties.retain(|p| p.trigger != trigger);
        self.penalties.len() < before
    }

    pub fn penalty_rate(&self, trigger: PenaltyTrigger) -> Option<f64> {
        self.penalties
            .iter()
            .find(|p| p.trigger == trigger)
            .map(|p| p.rate)
    }

    pub fn add_threshold(&mut self, threshold: Threshold, price: i64) -> Result<()> {
        if price < 0 {
            return Err(TrainingError::NegativePrice(price));
        }
        if self
            .invoice_thresholds
            .iter()
            .any(|t| t.threshold == threshold)
        {
            return Err(TrainingError::DuplicateThreshold(threshold.to_string()));
        }
        self.invoice_thresholds
            .push(ConfigInvoice { threshold, price });
        Ok(())
    }

    pub fn remove_threshold(&mut self, threshold: Threshold) -> bool {
        let before = self.invoice_thresholds.len();
        self.invoice_thresholds
            .retain(|t| t.threshold != threshold);
        self.invoice_thresholds.len() < before
    }

    pub fn threshold_price(&self, threshold: Threshold) -> Option<i64> {
        self.invoice_thresholds
            .iter()
            .find(|t| t.threshold == threshold)
            .map(|t| t.price)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check a hand-edited config against the table constraints.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for p in &self.products {
            if p.product.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("product of type '{}' is empty", p.kind),
                });
            }
            if !seen.insert((p.kind, p.product.as_str())) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "product '{}' is assigned twice to type '{}'",
                        p.product, p.kind
                    ),
                });
            }
        }

        let mut seen = HashSet::new();
        for p in &self.penalties {
            if check_rate(p.rate).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "penalty '{}' has rate {} (must be between 0 and 100)",
                        p.trigger, p.rate
                    ),
                });
            }
            if !seen.insert(p.trigger) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("penalty trigger '{}' is defined twice", p.trigger),
                });
            }
        }

        let mut seen = HashSet::new();
        for t in &self.invoice_thresholds {
            if t.price < 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("threshold '{}' has negative price {}", t.threshold, t.price),
                });
            }
            if !seen.insert(t.threshold) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("threshold '{}' is defined twice", t.threshold),
                });
            }
        }

        if let (Some(min), Some(max)) = (
            self.threshold_price(Threshold::Minimum),
            self.threshold_price(Threshold::Maximum),
        ) {
            if min > max {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("minimum invoice threshold {min} is above the maximum {max}"),
                });
            }
        }

        warnings
    }
}

fn check_rate(rate: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(TrainingError::RateOutOfRange(rate));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
