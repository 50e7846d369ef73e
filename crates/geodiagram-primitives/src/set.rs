use geodiagram_core::{DetectedCircle, Line};
use serde::{Deserialize, Serialize};

/// One detected primitive, by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Line(Line),
    Circle(DetectedCircle),
}

/// Detected lines and circles.
///
/// Primitive indices are unique across both collections: lines take
/// `0..lines.len()`, circles follow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSet {
    pub lines: Vec<Line>,
    pub circles: Vec<DetectedCircle>,
}

impl PrimitiveSet {
    pub fn new(lines: Vec<Line>, circles: Vec<DetectedCircle>) -> Self {
        Self { lines, circles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len() + self.circles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Global index of the `i`-th circle.
    #[inline]
    pub fn circle_index(&self, i: usize) -> usize {
        self.lines.len() + i
    }

    pub fn get(&self, index: usize) -> Option<Primitive> {
        if index < self.lines.len() {
            Some(Primitive::Line(self.lines[index]))
        } else {
            self.circles
                .get(index - self.lines.len())
                .copied()
                .map(Primitive::Circle)
        }
    }

    /// `(index, primitive)` pairs, lines first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Primitive)> + '_ {
        let n = self.lines.len();
        self.lines
            .iter()
            .enumerate()
            .map(|(i, l)| (i, Primitive::Line(*l)))
            .chain(
                self.circles
                    .iter()
                    .enumerate()
                    .map(move |(i, c)| (n + i, Primitive::Circle(*c))),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::{ArcType, Circle, DetectionMethod, Point};

    #[test]
    fn indices_are_unique_across_kinds() {
        let set = PrimitiveSet::new(
            vec![
                Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
                Line::new(Point::new(0.0, 1.0), Point::new(1.0, 1.0)),
            ],
            vec![DetectedCircle::new(
                Circle::new(Point::new(5.0, 5.0), 2.0),
                ArcType::FullCircle,
                DetectionMethod::Hough,
                1.0,
            )],
        );
        let indices: Vec<usize> = set.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(set.circle_index(0), 2);
        assert!(matches!(set.get(2), Some(Primitive::Circle(_))));
        assert!(matches!(set.get(1), Some(Primitive::Line(_))));
        assert!(set.get(3).is_none());
    }
}
