//! Scripted scroll through a page on the simulated driver.
//!
//! The scroll position moves from `--from` to `--to` in `--steps` equal
//! increments. Every step reports the section frames that changed; at the
//! end the scroll settles and the snap decision is reported.

use clap::Args;
use scrollchor_core::{Phase, Property, SectionFrame, Value};
use serde::Serialize;

use crate::config::{PageArgs, PreparedPage, fraction};
use crate::error::{DoctorError, Result};
use crate::snap::SnapRow;

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Starting scroll fraction.
    #[arg(long, default_value_t = 0.0)]
    pub from: f64,

    /// Final scroll fraction.
    #[arg(long, default_value_t = 1.0)]
    pub to: f64,

    #[arg(long, default_value_t = 20)]
    pub steps: u32,

    /// Skip the settle at the end.
    #[arg(long)]
    pub no_settle: bool,

    /// Emit one JSON object per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub element: String,
    pub property: Property,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub section: String,
    pub progress: f64,
    pub phase: Phase,
    pub values: Vec<PropertyReport>,
}

impl From<SectionFrame> for FrameReport {
    fn from(frame: SectionFrame) -> Self {
        Self {
            section: frame.section.to_string(),
            progress: frame.progress,
            phase: frame.phase,
            values: frame
                .frame
                .iter()
                .map(|(element, property, value)| PropertyReport {
                    element: element.to_string(),
                    property,
                    value,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: u32,
    pub fraction: f64,
    pub offset_px: f64,
    pub frames: Vec<FrameReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<SnapRow>,
}

pub fn simulate(prepared: &mut PreparedPage, args: &SimulateArgs) -> Result<SimulationReport> {
    let from = fraction("--from", args.from)?;
    let to = fraction("--to", args.to)?;
    if args.steps == 0 {
        return Err(DoctorError::invalid("--steps must be at least 1"));
    }

    let page = &mut prepared.choreographer;
    let mut steps = Vec::with_capacity(args.steps as usize + 1);
    for step in 0..=args.steps {
        let fraction = from + (to - from) * f64::from(step) / f64::from(args.steps);
        let offset_px = page.driver_mut().scroll_to_fraction(fraction);
        let frames = page.on_scroll().into_iter().map(FrameReport::from).collect();
        steps.push(StepReport {
            step,
            fraction,
            offset_px,
            frames,
        });
    }

    let settle = (!args.no_settle).then(|| SnapRow::from(page.on_scroll_settle()));
    Ok(SimulationReport { steps, settle })
}

fn render_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        out.push_str(&format!(
            "step {:>3} @ {:.4} ({:.0}px)",
            step.step, step.fraction, step.offset_px
        ));
        let moving: Vec<String> = step
            .frames
            .iter()
            .map(|f| format!("{}={:.2}/{:?}", f.section, f.progress, f.phase))
            .collect();
        if !moving.is_empty() {
            out.push_str(&format!("  {}", moving.join(" ")));
        }
        out.push('\n');
    }
    if let Some(settle) = &report.settle {
        out.push_str(&format!("settle {}\n", settle.describe()));
    }
    out
}

pub fn run_simulate(args: SimulateArgs) -> Result<()> {
    let mut prepared = args.page.prepare()?;
    let report = simulate(&mut prepared, &args)?;
    if args.json {
        for step in &report.steps {
            println!("{}", serde_json::to_string(step)?);
        }
        if let Some(settle) = &report.settle {
            println!("{}", serde_json::to_string(settle)?);
        }
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
