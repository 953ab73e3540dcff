//! Typed views over job payloads

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary of a single job as reported by the active-jobs endpoint.
///
/// Only the commonly used fields are typed; everything else the backend
/// sends is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the active-jobs endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveJobs {
    /// Job id → summary.
    #[serde(default)]
    pub active_jobs: BTreeMap<String, JobSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActiveJobs {
    /// Number of active jobs (size of the `active_jobs` mapping).
    pub fn count(&self) -> usize {
        self.active_jobs.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.active_jobs.keys().map(String::as_str)
    }
}

/// Jobs that depend on an adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDependents")]
pub struct DependentJobs {
    pub jobs: Vec<Value>,
}

impl DependentJobs {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Accept both `{"jobs": [...]}` / `{"dependent_jobs": [...]}` and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependents {
    Wrapped {
        #[serde(alias = "dependent_jobs")]
        jobs: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl From<RawDependents> for DependentJobs {
    fn from(raw: RawDependents) -> Self {
        match raw {
            RawDependents::Wrapped { jobs } | RawDependents::Bare(jobs) => Self { jobs },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_jobs_count_is_mapping_size() {
        let active: ActiveJobs = serde_json::from_value(json!({
            "active_jobs": {
                "j1": {"status": "running", "adapter": "epic", "progress": 0.5},
                "j2": {"status": "waiting_login", "portal": "mychart"}
            },
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(active.count(), 2);
        assert_eq!(active.ids().collect::<Vec<_>>(), vec!["j1", "j2"]);
        assert_eq!(active.active_jobs["j1"].progress, Some(0.5));
        assert_eq!(active.active_jobs["j2"].extra["portal"], "mychart");
        assert!(active.extra.contains_key("updated_at"));
    }

    #[test]
    fn active_jobs_missing_mapping_is_empty() {
        let active: ActiveJobs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(active.count(), 0);
    }

    #[test]
    fn dependent_jobs_accepts_wrapped_and_bare() {
        let wrapped: DependentJobs =
            serde_json::from_value(json!({"jobs": [{"id": "j1"}]})).unwrap();
        assert_eq!(wrapped.len(), 1);

        let aliased: DependentJobs =
            serde_json::from_value(json!({"dependent_jobs": [{"id": "j1"}, {"id": "j2"}]}))
                .unwrap();
        assert_eq!(aliased.len(), 2);

        let bare: DependentJobs = serde_json::from_value(json!([])).unwrap();
        assert!(bare.is_empty());
    }
}
