use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use xmlseed_core::QName;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Occurrence count used wherever a particle allows more than this many
    /// repetitions (including `unbounded`).
    pub repetition_cap: u64,
    /// Item count for list-typed values without length facets.
    pub list_length: usize,
    /// Explicit document root; defaults to the first non-abstract global element.
    pub root_element: Option<QName>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            repetition_cap: 5,
            list_length: 3,
            root_element: None,
        }
    }
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

impl GenerationIssue {
    pub fn warning(code: &str, message: impl Into<String>, element: Option<&QName>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            element: element.map(ToString::to_string),
        }
    }
}

/// Counters collected while the instance tree is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitStats {
    pub elements: u64,
    pub attributes: u64,
    pub nil_elements: u64,
    pub comments: u64,
    pub skipped_reentrant: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub root: Option<QName>,
    pub instance_nodes: usize,
    pub emitted: EmitStats,
    pub generator_usage: BTreeMap<String, u64>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            root: None,
            instance_nodes: 0,
            emitted: EmitStats::default(),
            generator_usage: BTreeMap::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
