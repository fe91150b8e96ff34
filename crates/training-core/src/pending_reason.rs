use crate::course_pending::CoursePending;
use crate::error::{Result, TrainingError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reason a course is waiting on something, selectable on course pendings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReason {
    pub code: String,
    pub name: String,
    /// Name per language code, e.g. `fr_FR`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,
}

impl PendingReason {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Name in `lang`, falling back to the untranslated name.
    pub fn name_for(&self, lang: Option<&str>) -> &str {
        lang.and_then(|l| self.translations.get(l))
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Table operations (operate on a mutable Vec<PendingReason>)
// ---------------------------------------------------------------------------

pub fn add_reason(
    reasons: &mut Vec<PendingReason>,
    code: impl Into<String>,
    name: impl Into<String>,
) -> Result<()> {
    let code = code.into();
    let name = name.into();
    paths::validate_code(&code)?;
    paths::validate_name(&name)?;
    if reasons.iter().any(|r| r.code == code) {
        return Err(TrainingError::DuplicatePendingReason(code));
    }
    reasons.push(PendingReason::new(code, name));
    Ok(())
}

pub fn translate_reason(
    reasons: &mut [PendingReason],
    code: &str,
    lang: impl Into<String>,
    name: impl Into<String>,
) -> Result<()> {
    let name = name.into();
    paths::validate_name(&name)?;
    let reason = reasons
        .iter_mut()
        .find(|r| r.code == code)
        .ok_or_else(|| TrainingError::UnknownPendingReason(code.to_string()))?;
    reason.translations.insert(lang.into(), name);
    Ok(())
}

/// Remove a reason no course pending refers to.
pub fn remove_reason(
    reasons: &mut Vec<PendingReason>,
    pendings: &[CoursePending],
    code: &str,
) -> Result<PendingReason> {
    let pos = reasons
        .iter()
        .position(|r| r.code == code)
        .ok_or_else(|| TrainingError::UnknownPendingReason(code.to_string()))?;
    let count = pendings
        .iter()
        .filter(|p| p.reason.as_deref() == Some(code))
        .count();
    if count > 0 {
        return Err(TrainingError::PendingReasonInUse {
            code: code.to_string(),
            count,
        });
    }
    Ok(reasons.remove(pos))
}

pub fn find_reason<'a>(reasons: &'a [PendingReason], code: &str) -> Result<&'a PendingReason> {
    reasons
        .iter()
        .find(|r| r.code == code)
        .ok_or_else(|| TrainingError::UnknownPendingReason(code.to_string()))
}

/// `(code, name)` choices in code order, names translated to `lang` when possible.
pub fn selection(reasons: &[PendingReason], lang: Option<&str>) -> Vec<(String, String)> {
    let mut choices: Vec<(String, String)> = reasons
        .iter()
        .map(|r| (r.code.clone(), r.name_for(lang).to_string()))
        .collect();
    choices.sort_by(|a, b| a.0.cmp(&b.0));
    choices
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
