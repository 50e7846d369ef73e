//! Symbolic handles for canonical points, radii and the relations between them.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Point,
    Number,
}

/// Named variable standing for a concrete value in the assignment table.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub kind: VariableKind,
}

impl Variable {
    /// `point_{key}`.
    pub fn point(key: usize) -> Self {
        Self {
            id: format!("point_{key}"),
            kind: VariableKind::Point,
        }
    }

    /// `radius_{center}_{index}`.
    pub fn radius(center_key: usize, radius_key: usize) -> Self {
        Self {
            id: format!("radius_{center_key}_{radius_key}"),
            kind: VariableKind::Number,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Line,
    Circle,
    Arc,
    PointLiesOnLine,
    PointLiesOnCircle,
}

impl FunctionKind {
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::Line => "Line",
            FunctionKind::Circle => "Circle",
            FunctionKind::Arc => "Arc",
            FunctionKind::PointLiesOnLine => "PointLiesOnLine",
            FunctionKind::PointLiesOnCircle => "PointLiesOnCircle",
        }
    }
}

/// Formula tree: a variable leaf or a function applied to sub-formulas.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Variable(Variable),
    Apply {
        function: FunctionKind,
        args: Vec<Formula>,
    },
}

impl Formula {
    fn apply(function: FunctionKind, args: Vec<Formula>) -> Self {
        Formula::Apply { function, args }
    }

    pub fn line(a: Variable, b: Variable) -> Self {
        Self::apply(
            FunctionKind::Line,
            vec![Formula::Variable(a), Formula::Variable(b)],
        )
    }

    pub fn circle(center: Variable, radius: Variable) -> Self {
        Self::apply(
            FunctionKind::Circle,
            vec![Formula::Variable(center), Formula::Variable(radius)],
        )
    }

    /// Directed arc of `circle` from `a` to `b`.
    pub fn arc(circle: Formula, a: Variable, b: Variable) -> Self {
        Self::apply(
            FunctionKind::Arc,
            vec![circle, Formula::Variable(a), Formula::Variable(b)],
        )
    }

    pub fn point_lies_on_line(point: Variable, line: Formula) -> Self {
        Self::apply(
            FunctionKind::PointLiesOnLine,
            vec![Formula::Variable(point), line],
        )
    }

    pub fn point_lies_on_circle(point: Variable, circle: Formula) -> Self {
        Self::apply(
            FunctionKind::PointLiesOnCircle,
            vec![Formula::Variable(point), circle],
        )
    }

    /// Outermost function, `None` for leaves.
    pub fn function(&self) -> Option<FunctionKind> {
        match self {
            Formula::Variable(_) => None,
            Formula::Apply { function, .. } => Some(*function),
        }
    }

    pub fn args(&self) -> &[Formula] {
        match self {
            Formula::Variable(_) => &[],
            Formula::Apply { args, .. } => args,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Variable(v) => f.write_str(&v.id),
            Formula::Apply { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Concrete value bound to a variable id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedValue {
    Point(Point),
    Number(f64),
}

impl AssignedValue {
    pub fn as_point(&self) -> Option<Point> {
        match self {
            AssignedValue::Point(p) => Some(*p),
            AssignedValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AssignedValue::Number(v) => Some(*v),
            AssignedValue::Point(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_renders_nested() {
        let line = Formula::line(Variable::point(0), Variable::point(1));
        let f = Formula::point_lies_on_line(Variable::point(2), line);
        assert_eq!(f.to_string(), "PointLiesOnLine(point_2, Line(point_0, point_1))");
        assert_eq!(f.function(), Some(FunctionKind::PointLiesOnLine));
        assert_eq!(f.args().len(), 2);
    }

    #[test]
    fn circle_uses_number_variable() {
        let radius = Variable::radius(3, 1);
        assert_eq!(radius.kind, VariableKind::Number);
        let circle = Formula::circle(Variable::point(3), radius);
        let arc = Formula::arc(circle, Variable::point(4), Variable::point(5));
        assert_eq!(
            arc.to_string(),
            "Arc(Circle(point_3, radius_3_1), point_4, point_5)"
        );
    }

    #[test]
    fn assigned_value_accessors() {
        let p = AssignedValue::Point(Point::new(1.0, 2.0));
        assert_eq!(p.as_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(p.as_number(), None);
        assert_eq!(AssignedValue::Number(4.5).as_number(), Some(4.5));
    }
}
