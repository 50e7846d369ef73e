//! Selection of the primitives that explain the foreground.
//!
//! Detection over-generates on purpose; a selector reduces the candidate set
//! before core resolution. Selectors are pluggable through
//! [`PrimitiveSelector`].

use geodiagram_core::DiagramSegment;
use serde::{Deserialize, Serialize};

use crate::set::{Primitive, PrimitiveSet};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors reported by a primitive selector.
#[derive(thiserror::Error, Debug)]
pub enum SelectError {
    /// Index into the set's `iter()` order.
    #[error("primitive {index} is not usable for selection")]
    InvalidPrimitive { index: usize },
    /// Any other reason a selector gives up. The built-in selectors never
    /// return it; it is the catch-all for custom implementations.
    #[error("selection failed: {0}")]
    Failed(String),
}

/// Chooses a subset of detected primitives.
///
/// Custom selectors report their own failures through
/// [`SelectError::Failed`]:
///
/// ```
/// use geodiagram_core::{DiagramSegment, GrayImage, Line, Point};
/// use geodiagram_primitives::{PrimitiveSelector, PrimitiveSet, SelectError};
///
/// /// Refuses sets with more lines than it accepts.
/// struct LineBudget(usize);
///
/// impl PrimitiveSelector for LineBudget {
///     fn select(&self, _segment: &DiagramSegment, primitives: PrimitiveSet) -> Result<PrimitiveSet, SelectError> {
///         if primitives.lines.len() > self.0 {
///             return Err(SelectError::Failed(format!("{} lines over budget", primitives.lines.len())));
///         }
///         Ok(primitives)
///     }
/// }
///
/// let segment = DiagramSegment::from_gray(GrayImage::filled(8, 8, 255));
/// let line = Line::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0));
/// let set = PrimitiveSet::new(vec![line; 3], vec![]);
/// let err = LineBudget(2).select(&segment, set).unwrap_err();
/// assert!(matches!(err, SelectError::Failed(_)));
/// ```
pub trait PrimitiveSelector {
    fn select(&self, segment: &DiagramSegment, primitives: PrimitiveSet) -> Result<PrimitiveSet, SelectError>;
}

/// Keeps every detected primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughSelector;

impl PrimitiveSelector for PassThroughSelector {
    fn select(&self, _segment: &DiagramSegment, primitives: PrimitiveSet) -> Result<PrimitiveSet, SelectError> {
        Ok(primitives)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageParams {
    /// Pixels within this distance of a segment are covered by it.
    pub line_eps: f64,
    /// Pixels within this distance of a circumference are covered by it.
    pub circle_eps: f64,
    /// Selection stops once the best remaining gain is at most this.
    pub min_gain: usize,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            line_eps: 3.0,
            circle_eps: 6.0,
            min_gain: 0,
        }
    }
}

/// Greedy set cover over foreground pixels.
///
/// Each round picks the primitive covering the most still-uncovered pixels
/// (lowest index on ties). Selected primitives keep their relative order.
#[derive(Clone, Debug, Default)]
pub struct CoverageSelector {
    params: CoverageParams,
}

impl CoverageSelector {
    pub fn new(params: CoverageParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CoverageParams {
        &self.params
    }

    fn covered_by(&self, segment: &DiagramSegment, primitive: &Primitive) -> Vec<usize> {
        let pixels = segment.pixels();
        match primitive {
            Primitive::Line(line) => pixels
                .iter()
                .enumerate()
                .filter(|(_, p)| line.distance_to(p) <= self.params.line_eps)
                .map(|(i, _)| i)
                .collect(),
            Primitive::Circle(c) => pixels
                .iter()
                .enumerate()
                .filter(|(_, p)| c.circle.distance_to(p) <= self.params.circle_eps)
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

impl PrimitiveSelector for CoverageSelector {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, segment, primitives), fields(candidates = primitives.len()))
    )]
    fn select(&self, segment: &DiagramSegment, primitives: PrimitiveSet) -> Result<PrimitiveSet, SelectError> {
        for (index, primitive) in primitives.iter() {
            let valid = match primitive {
                Primitive::Line(l) => {
                    !l.is_degenerate() && l.a.coords.iter().chain(l.b.coords.iter()).all(|v| v.is_finite())
                }
                Primitive::Circle(c) => c.circle.radius.is_finite() && c.circle.radius > 0.0,
            };
            if !valid {
                return Err(SelectError::InvalidPrimitive { index });
            }
        }

        let coverage: Vec<(usize, Vec<usize>)> = primitives
            .iter()
            .map(|(i, p)| (i, self.covered_by(segment, &p)))
            .collect();
        let mut covered = vec![false; segment.pixels().len()];
        let mut chosen = vec![false; primitives.len()];

        loop {
            let mut best: Option<(usize, usize)> = None;
            for (i, pix) in &coverage {
                if chosen[*i] {
                    continue;
                }
                let gain = pix.iter().filter(|&&k| !covered[k]).count();
                if best.is_none_or(|(_, g)| gain > g) {
                    best = Some((*i, gain));
                }
            }
            let Some((index, gain)) = best else {
                break;
            };
            if gain <= self.params.min_gain {
                break;
            }
            log::trace!("selected primitive {index} (gain {gain})");
            chosen[index] = true;
            for &k in &coverage[index].1 {
                covered[k] = true;
            }
        }

        let n_lines = primitives.lines.len();
        let lines = primitives
            .lines
            .into_iter()
            .enumerate()
            .filter(|(i, _)| chosen[*i])
            .map(|(_, l)| l)
            .collect();
        let circles = primitives
            .circles
            .into_iter()
            .enumerate()
            .filter(|(i, _)| chosen[n_lines + *i])
            .map(|(_, c)| c)
            .collect();
        let selected = PrimitiveSet::new(lines, circles);
        log::debug!(
            "coverage selection kept {} of {} primitives",
            selected.len(),
            chosen.len()
        );
        Ok(selected)
    }
}
