use clap::Args;
use scrollchor_core::{CoordinatorState, Ease, SnapPolicy};
use serde::Serialize;

use crate::config::{PageArgs, PreparedPage};
use crate::error::Result;

#[derive(Debug, Clone, Default, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub start: f64,
    pub end: f64,
    pub center: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub id: String,
    pub pinned: bool,
    pub top: f64,
    pub height: f64,
    pub pin_spacing: f64,
    /// Trigger range in scroll pixels.
    pub range: RangeReport,
    /// Normalized snap range; only for pinned sections with a known extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap: Option<RangeReport>,
    pub elements: usize,
    pub tweens: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyReport {
    pub margin: f64,
    pub min_duration_ms: u128,
    pub max_duration_ms: u128,
    pub delay_ms: u128,
    pub ease: Ease,
}

impl From<&SnapPolicy> for PolicyReport {
    fn from(policy: &SnapPolicy) -> Self {
        Self {
            margin: policy.margin,
            min_duration_ms: policy.duration.min().as_millis(),
            max_duration_ms: policy.duration.max().as_millis(),
            delay_ms: policy.delay.as_millis(),
            ease: policy.ease,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub source: String,
    pub viewport: [f64; 2],
    pub document_height: f64,
    pub scrollable_extent: f64,
    pub snapping: &'static str,
    pub policy: PolicyReport,
    pub sections: Vec<SectionReport>,
}

pub fn inspect(prepared: &PreparedPage) -> InspectReport {
    let page = &prepared.choreographer;
    let coordinator = page.coordinator();
    let normalized = coordinator.rule().map(|rule| rule.ranges()).unwrap_or_default();

    let sections = page
        .sections()
        .iter()
        .zip(prepared.layout.placements())
        .map(|(section, placement)| {
            let range = section.range().unwrap_or(placement.range);
            SectionReport {
                id: section.id().to_string(),
                pinned: section.is_pinned(),
                top: placement.geometry.top,
                height: placement.geometry.height,
                pin_spacing: placement.pin_spacing,
                range: RangeReport {
                    start: range.start(),
                    end: range.end(),
                    center: range.center(),
                },
                snap: normalized
                    .iter()
                    .find(|r| &r.id == section.id())
                    .map(|r| RangeReport {
                        start: r.start,
                        end: r.end,
                        center: r.center,
                    }),
                elements: section.timeline().elements().count(),
                tweens: section.timeline().spec_count(),
            }
        })
        .collect();

    let viewport = prepared.layout.viewport();
    InspectReport {
        source: prepared.source.clone(),
        viewport: [viewport.width, viewport.height],
        document_height: prepared.layout.document_height(),
        scrollable_extent: prepared.layout.total_scrollable_extent(),
        snapping: match coordinator.state() {
            CoordinatorState::Active => "active",
            CoordinatorState::Inert => "inert",
            CoordinatorState::Idle => "idle",
        },
        policy: PolicyReport::from(coordinator.policy()),
        sections,
    }
}

fn render_text(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "page {} @ {}x{}: document {:.0}px, scrollable {:.0}px, snapping {}\n",
        report.source,
        report.viewport[0],
        report.viewport[1],
        report.document_height,
        report.scrollable_extent,
        report.snapping,
    ));
    for s in &report.sections {
        let mode = if s.pinned { "pinned " } else { "flowing" };
        out.push_str(&format!(
            "  {mode} {:<16} px {:>8.1} .. {:>8.1}",
            s.id, s.range.start, s.range.end
        ));
        if let Some(snap) = &s.snap {
            out.push_str(&format!(
                "  snap {:.4} .. {:.4} -> {:.4}",
                snap.start, snap.end, snap.center
            ));
        }
        out.push_str(&format!("  ({} elements, {} tweens)\n", s.elements, s.tweens));
    }
    out
}

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let prepared = args.page.prepare()?;
    let report = inspect(&prepared);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
