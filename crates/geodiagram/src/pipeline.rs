//! End-to-end diagram parsing: detection, selection, core resolution,
//! graph construction and formula extraction.

use geodiagram_core::{DiagramSegment, Formula};
use geodiagram_graph::{confident_formulas, GraphBuilder, GraphParams, GraphParse};
use geodiagram_primitives::{
    CoverageParams, CoverageSelector, PrimitiveDetector, PrimitiveParams, PrimitiveSelector,
    PrimitiveSet, SelectError,
};
use geodiagram_resolve::{CoreParse, CoreResolver, ResolveParams};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors surfaced by [`DiagramParser`].
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Parameters of every pipeline stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramParams {
    pub primitives: PrimitiveParams,
    /// Used by [`DiagramParser::parse`]; ignored with a custom selector.
    pub selection: CoverageParams,
    pub resolve: ResolveParams,
    pub graph: GraphParams,
}

/// Output of one parser run, keyed by canonical point keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramParse {
    /// Primitives kept by the selector.
    pub primitives: PrimitiveSet,
    pub core: CoreParse,
    pub graph: GraphParse,
    pub formulas: Vec<Formula>,
}

impl DiagramParse {
    /// Rendered formulas, e.g. `PointLiesOnLine(point_2, Line(point_0, point_1))`.
    pub fn formula_strings(&self) -> Vec<String> {
        self.formulas.iter().map(|f| f.to_string()).collect()
    }
}

/// Runs the whole parsing pipeline on one diagram segment.
#[derive(Clone, Debug, Default)]
pub struct DiagramParser {
    params: DiagramParams,
    detector: PrimitiveDetector,
    resolver: CoreResolver,
    builder: GraphBuilder,
}

impl DiagramParser {
    pub fn new(params: DiagramParams) -> Self {
        Self {
            detector: PrimitiveDetector::new(params.primitives.clone()),
            resolver: CoreResolver::new(params.resolve.clone()),
            builder: GraphBuilder::new(params.graph.clone()),
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &DiagramParams {
        &self.params
    }

    /// Parse with the pixel-coverage selector.
    pub fn parse(&self, segment: &DiagramSegment) -> Result<DiagramParse, ParseError> {
        let selector = CoverageSelector::new(self.params.selection.clone());
        self.parse_with(segment, &selector)
    }

    /// Parse with a caller-provided selector. Selector failures abort the run.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, segment, selector),
            fields(width = segment.width(), height = segment.height())
        )
    )]
    pub fn parse_with<S>(&self, segment: &DiagramSegment, selector: &S) -> Result<DiagramParse, ParseError>
    where
        S: PrimitiveSelector + ?Sized,
    {
        let detected = self.detector.detect(segment);
        let detected_count = detected.len();
        let selected = selector.select(segment, detected)?;
        log::info!(
            "selected {} of {} primitives ({} lines, {} circles)",
            selected.len(),
            detected_count,
            selected.lines.len(),
            selected.circles.len()
        );
        Ok(self.parse_selected(segment, selected))
    }

    /// Resolve and build graphs for primitives that were already selected,
    /// e.g. by an external detector.
    pub fn parse_selected(&self, segment: &DiagramSegment, primitives: PrimitiveSet) -> DiagramParse {
        let core = self.resolver.resolve(&primitives, Some(segment.bounds()));
        let graph = self.builder.build(&core, segment.pixels());
        let formulas = confident_formulas(&graph);
        log::info!(
            "{} canonical points, {} line edges, {} circles, {} formulas",
            core.points.len(),
            graph.line_graph.len(),
            graph.circles.len(),
            formulas.len()
        );
        if primitives.is_empty() && !segment.pixels().is_empty() {
            log::warn!("segment has ink but no primitives were kept");
        }
        DiagramParse {
            primitives,
            core,
            graph,
            formulas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::raster::draw_line;
    use geodiagram_core::{GrayImage, Line, Point};
    use geodiagram_primitives::PassThroughSelector;

    struct Rejecting;

    impl PrimitiveSelector for Rejecting {
        fn select(&self, _segment: &DiagramSegment, _primitives: PrimitiveSet) -> Result<PrimitiveSet, SelectError> {
            Err(SelectError::Failed("no model".to_string()))
        }
    }

    #[test]
    fn blank_segment_parses_to_nothing() {
        let segment = DiagramSegment::from_binary(GrayImage::new(80, 60));
        let parse = DiagramParser::default()
            .parse(&segment)
            .expect("coverage selection on an empty set");
        assert_eq!(parse, DiagramParse::default());
    }

    #[test]
    fn selector_failure_surfaces() {
        let segment = DiagramSegment::from_binary(GrayImage::new(80, 60));
        let err = DiagramParser::default()
            .parse_with(&segment, &Rejecting)
            .expect_err("selector rejects");
        assert!(matches!(err, ParseError::Select(SelectError::Failed(_))));
        assert_eq!(err.to_string(), "selection failed: no model");
    }

    #[test]
    fn selected_segment_yields_its_endpoints() {
        let line = Line::new(Point::new(20.0, 30.0), Point::new(140.0, 30.0));
        let mut binary = GrayImage::new(160, 60);
        draw_line(&mut binary, &line, 2.0, 255);
        let segment = DiagramSegment::from_binary(binary);

        let parse = DiagramParser::default().parse_selected(&segment, PrimitiveSet::new(vec![line], vec![]));
        assert_eq!(parse.core.points, vec![line.a, line.b]);
        assert!(parse.graph.line_graph.has_edge(0, 1));
        assert!(parse.formulas.is_empty());
    }

    #[test]
    fn params_fill_missing_fields_from_defaults() {
        let params: DiagramParams =
            serde_json::from_str(r#"{ "resolve": { "radius_threshold": 9.0 } }"#).expect("valid json");
        assert_eq!(params.resolve.radius_threshold, 9.0);
        assert_eq!(params.resolve.endpoint_tolerance, ResolveParams::default().endpoint_tolerance);
        assert_eq!(params.graph, GraphParams::default());
        let _ = DiagramParser::new(params).parse_with(
            &DiagramSegment::from_binary(GrayImage::new(10, 10)),
            &PassThroughSelector,
        );
    }
}
