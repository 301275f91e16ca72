use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use scrollchor_core::presets::showcase_page;
use scrollchor_core::{Choreographer, PageDefinition, SimulatedDriver, StackLayout, Viewport};
use tracing::debug;

use crate::error::{DoctorError, Result};

pub const DEFAULT_VIEWPORT: &str = "1280x800";

/// Page selection shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page definition JSON. Defaults to the built-in showcase page.
    #[arg(long)]
    pub page: Option<PathBuf>,

    /// Viewport as WIDTHxHEIGHT in CSS pixels.
    #[arg(long, default_value = DEFAULT_VIEWPORT, value_parser = parse_viewport)]
    pub viewport: Viewport,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page: None,
            viewport: Viewport::new(1280.0, 800.0),
        }
    }
}

/// A page laid out and mounted on a simulated driver.
#[derive(Debug)]
pub struct PreparedPage {
    pub source: String,
    pub layout: StackLayout,
    pub choreographer: Choreographer<SimulatedDriver>,
}

impl PageArgs {
    pub fn prepare(&self) -> Result<PreparedPage> {
        let definition = load_definition(self.page.as_deref())?;
        let page = definition.build()?;
        let layout = page.layout(self.viewport);
        let driver =
            SimulatedDriver::new(self.viewport).with_extent(layout.total_scrollable_extent());
        let source = self
            .page
            .as_ref()
            .map_or_else(|| "builtin:showcase".to_string(), |p| p.display().to_string());
        debug!(
            %source,
            sections = page.sections.len(),
            extent = layout.total_scrollable_extent(),
            "page prepared"
        );
        Ok(PreparedPage {
            source,
            layout,
            choreographer: page.mount(driver),
        })
    }
}

/// Read a definition from disk, or the showcase page when no path is given.
pub fn load_definition(path: Option<&Path>) -> Result<PageDefinition> {
    let Some(path) = path else {
        return Ok(showcase_page());
    };
    if !path.exists() {
        return Err(DoctorError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| DoctorError::PageJson {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_viewport(raw: &str) -> Result<Viewport> {
    let invalid = || DoctorError::invalid(format!("viewport must be WIDTHxHEIGHT, got {raw:?}"));
    let (width, height) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = width.trim().parse().map_err(|_| invalid())?;
    let height: f64 = height.trim().parse().map_err(|_| invalid())?;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(invalid());
    }
    Ok(Viewport::new(width, height))
}

/// Validate a scroll fraction argument.
pub fn fraction(name: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DoctorError::invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
