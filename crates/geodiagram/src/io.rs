//! JSON configuration and report helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use geodiagram_core::DiagramSegment;
use geodiagram_graph::GraphParams;
use geodiagram_primitives::{CoverageParams, PrimitiveParams};
use geodiagram_resolve::ResolveParams;
use serde::{Deserialize, Serialize};

use crate::pipeline::{DiagramParams, DiagramParse, ParseError};

#[derive(thiserror::Error, Debug)]
pub enum DiagramIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Parser configuration file. Every section is optional and falls back to
/// the stage defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default)]
    pub output_path: Option<String>,
    /// Keep every detected primitive instead of running coverage selection.
    #[serde(default)]
    pub pass_through: bool,
    #[serde(default)]
    pub primitives: Option<PrimitiveParams>,
    #[serde(default)]
    pub selection: Option<CoverageParams>,
    #[serde(default)]
    pub resolve: Option<ResolveParams>,
    #[serde(default)]
    pub graph: Option<GraphParams>,
}

impl DiagramConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DiagramIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DiagramIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("geodiagram_report.json"))
    }

    /// Pipeline parameters with the configured overrides applied.
    pub fn build_params(&self) -> DiagramParams {
        let mut params = DiagramParams::default();
        if let Some(primitives) = self.primitives.clone() {
            params.primitives = primitives;
        }
        if let Some(selection) = self.selection.clone() {
            params.selection = selection;
        }
        if let Some(resolve) = self.resolve.clone() {
            params.resolve = resolve;
        }
        if let Some(graph) = self.graph.clone() {
            params.graph = graph;
        }
        params
    }
}

/// Summary of one parser run, written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramReport {
    pub image_path: String,
    #[serde(default)]
    pub config_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub num_ink_pixels: usize,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub parse: Option<DiagramParse>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DiagramReport {
    /// Base report describing the input.
    pub fn new(image_path: &Path, config_path: Option<&Path>, segment: &DiagramSegment) -> Self {
        Self {
            image_path: image_path.to_string_lossy().into_owned(),
            config_path: config_path.map(|p| p.to_string_lossy().into_owned()),
            width: segment.width(),
            height: segment.height(),
            num_ink_pixels: segment.pixels().len(),
            formulas: Vec::new(),
            parse: None,
            error: None,
        }
    }

    pub fn set_parse(&mut self, parse: DiagramParse) {
        self.formulas = parse.formula_strings();
        self.parse = Some(parse);
        self.error = None;
    }

    pub fn set_error(&mut self, err: &ParseError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DiagramIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DiagramIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
