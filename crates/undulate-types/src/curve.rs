use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, FromRepr};

pub const MAX_CURVE_NODES: usize = 16;
pub const MIN_CURVE_NODES: usize = 2;
pub const STRAIGHT_CURVATURE: f32 = 1.0;

/// A control point of the user-drawn waveform. `position` runs over one
/// period in [0, 1], `value` is bipolar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveNode {
    pub position: f32,
    pub value: f32,
    pub curvature: f32,
}

impl CurveNode {
    pub const fn new(position: f32, value: f32, curvature: f32) -> Self {
        Self {
            position,
            value,
            curvature,
        }
    }

    pub const fn straight(position: f32, value: f32) -> Self {
        Self::new(position, value, STRAIGHT_CURVATURE)
    }
}

impl Default for CurveNode {
    fn default() -> Self {
        Self::straight(0.0, 0.0)
    }
}

/// How the span between two nodes is shaped. Linear ignores node curvature.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter, EnumString, FromRepr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum CurveShape {
    #[default]
    Linear,
    Exponent,
    Superellipse,
}

impl CurveShape {
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Curve {
    nodes: [CurveNode; MAX_CURVE_NODES],
    node_count: usize,
    pub shape: CurveShape,
}

impl Curve {
    /// Copies at most `MAX_CURVE_NODES` nodes; extra nodes are dropped.
    pub fn from_nodes(nodes: &[CurveNode], shape: CurveShape) -> Self {
        let mut curve = Self {
            nodes: [CurveNode::default(); MAX_CURVE_NODES],
            node_count: 0,
            shape,
        };
        for node in nodes.iter().take(MAX_CURVE_NODES) {
            curve.nodes[curve.node_count] = *node;
            curve.node_count += 1;
        }
        curve
    }

    pub fn nodes(&self) -> &[CurveNode] {
        &self.nodes[..self.node_count]
    }

    pub fn len(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.nodes() == other.nodes()
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::from_nodes(
            &[CurveNode::straight(0.0, 1.0), CurveNode::straight(1.0, -1.0)],
            CurveShape::Linear,
        )
    }
}
