use clap::Args;
use scrollchor_core::{CoordinatorState, SnapDecision};
use serde::Serialize;

use crate::config::{PageArgs, PreparedPage, fraction};
use crate::error::{DoctorError, Result};

#[derive(Debug, Clone, Args)]
pub struct SnapArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Candidate scroll fractions, comma separated.
    #[arg(long = "at", value_delimiter = ',', required = true)]
    pub at: Vec<f64>,

    /// Fail when the page has nothing to snap to.
    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub json: bool,
}

/// One decision. `candidate` and `target` are absent when the extent was
/// unknown; `offset_px` is present only then.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl From<SnapDecision> for SnapRow {
    fn from(decision: SnapDecision) -> Self {
        match decision {
            SnapDecision::Free { position } => Self {
                candidate: Some(position),
                target: Some(position),
                offset_px: None,
                range: None,
                duration_ms: None,
            },
            SnapDecision::Unmeasured { offset_px } => Self {
                candidate: None,
                target: None,
                offset_px: Some(offset_px),
                range: None,
                duration_ms: None,
            },
            SnapDecision::Snap {
                from,
                target,
                range,
                duration,
                ..
            } => Self {
                candidate: Some(from),
                target: Some(target),
                offset_px: None,
                range: Some(range.to_string()),
                duration_ms: Some(duration.as_millis()),
            },
        }
    }
}

impl SnapRow {
    /// One-line text rendering shared by `snap` and `simulate`.
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.candidate, self.target, &self.range, self.duration_ms) {
            (Some(from), Some(to), Some(range), Some(ms)) => {
                format!("{from:.4} -> {to:.4}  snap to {range} over {ms}ms")
            }
            (Some(from), Some(to), _, _) => format!("{from:.4} -> {to:.4}  free"),
            _ => format!(
                "{:.0}px  unmeasured (scroll extent unknown)",
                self.offset_px.unwrap_or_default()
            ),
        }
    }
}

pub fn decide_all(prepared: &PreparedPage, candidates: &[f64]) -> Result<Vec<SnapRow>> {
    let coordinator = prepared.choreographer.coordinator();
    candidates
        .iter()
        .map(|&v| Ok(SnapRow::from(coordinator.decide(fraction("--at", v)?))))
        .collect()
}

pub fn run_snap(args: SnapArgs) -> Result<()> {
    let prepared = args.page.prepare()?;
    if args.strict && prepared.choreographer.coordinator().state() != CoordinatorState::Active {
        return Err(DoctorError::exit(
            1,
            format!("{}: no pinned sections to snap to", prepared.source),
        ));
    }

    let rows = decide_all(&prepared, &args.at)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in &rows {
        println!("{}", row.describe());
    }
    Ok(())
}
