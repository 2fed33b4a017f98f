//! Attending clinic templates.
//!
//! Every supervision record names the clinic template it runs under.
//! Lookup order:
//! 1. exact activity label (not for substitutions)
//! 2. the fallback template for the activity type
//! 3. a built-in default

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ActivityType, TemplateRecord};

const DEFAULT_TEMPLATE_ID: &str = "default_template";
const DEFAULT_TEMPLATE_NAME: &str = "General Supervision";
const SUBSTITUTION_TEMPLATE_NAME: &str = "Leave Supervision Override";

/// Template identity as carried on supervision records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicTemplate {
    pub id: String,
    pub name: String,
}

impl ClinicTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    fn fallback(is_substitution: bool) -> Self {
        let name = if is_substitution {
            SUBSTITUTION_TEMPLATE_NAME
        } else {
            DEFAULT_TEMPLATE_NAME
        };
        Self::new(DEFAULT_TEMPLATE_ID, name)
    }
}

/// Name of the type-level fallback template.
fn type_template_name(activity_type: ActivityType) -> &'static str {
    match activity_type {
        ActivityType::Procedure => "Procedure Template",
        ActivityType::Clinic => "Resident Supervision",
        ActivityType::Inpatient => "Inpatient Teaching",
    }
}

/// Templates keyed by activity type label (or name).
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    by_key: HashMap<String, ClinicTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes template rows. The key is `Activity Type`, else `Name`;
    /// rows with neither are ignored and the first row per key wins.
    pub fn build(records: &[TemplateRecord]) -> Self {
        let mut catalog = Self::new();
        for record in records {
            let key = record
                .activity_type
                .as_deref()
                .or(record.name.as_deref())
                .map(str::trim)
                .filter(|k| !k.is_empty());
            let Some(key) = key else { continue };
            let name = record.name.clone().unwrap_or_else(|| key.to_string());
            catalog
                .by_key
                .entry(key.to_string())
                .or_insert_with(|| ClinicTemplate::new(record.id.clone(), name));
        }
        catalog
    }

    pub fn with_template(mut self, key: impl Into<String>, template: ClinicTemplate) -> Self {
        self.by_key.entry(key.into()).or_insert(template);
        self
    }

    /// Template for an activity. Never fails; falls back to a default.
    pub fn lookup(
        &self,
        activity: &str,
        activity_type: ActivityType,
        is_substitution: bool,
    ) -> ClinicTemplate {
        if !is_substitution {
            if let Some(t) = self.by_key.get(activity) {
                return t.clone();
            }
        }
        self.by_key
            .get(type_template_name(activity_type))
            .cloned()
            .unwrap_or_else(|| ClinicTemplate::fallback(is_substitution))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
