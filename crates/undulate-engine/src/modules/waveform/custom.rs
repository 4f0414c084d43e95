use undulate_types::curve::{Curve, CurveNode, CurveShape, STRAIGHT_CURVATURE};

const MIN_CURVINESS: f32 = 0.01;
const MIN_SEGMENT_WIDTH: f32 = 1e-6;

/// Value of the user-drawn curve at `position` (0..1 over the period).
/// Malformed node lists never fault: no nodes gives 0, one node is flat.
pub fn custom(position: f32, curve: &Curve) -> f32 {
    let nodes = curve.nodes();
    let (previous, next) = bounding_nodes(position, nodes);

    let value = match (previous, next) {
        (None, None) => 0.0,
        (Some(node), None) | (None, Some(node)) => node.value,
        (Some(previous), Some(next)) => interpolate(position, previous, next, curve.shape),
    };

    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// The last node at or before `position` and the first node after it.
fn bounding_nodes(position: f32, nodes: &[CurveNode]) -> (Option<&CurveNode>, Option<&CurveNode>) {
    let previous = nodes.iter().rev().find(|node| node.position <= position);
    let next = nodes.iter().find(|node| node.position > position);
    (previous, next)
}

fn interpolate(position: f32, previous: &CurveNode, next: &CurveNode, shape: CurveShape) -> f32 {
    let width = next.position - previous.position;
    if width <= MIN_SEGMENT_WIDTH {
        return previous.value;
    }

    let progress = ((position - previous.position) / width).clamp(0.0, 1.0);
    let shaped = shape_progress(progress, previous.curvature, shape);
    previous.value + (next.value - previous.value) * shaped
}

/// Bends the 0..1 progress through a segment. A curvature of 1 is a straight line.
pub fn shape_progress(progress: f32, curvature: f32, shape: CurveShape) -> f32 {
    let curviness = if curvature.is_finite() {
        curvature.clamp(MIN_CURVINESS, STRAIGHT_CURVATURE)
    } else {
        STRAIGHT_CURVATURE
    };

    match shape {
        CurveShape::Linear => progress,
        CurveShape::Exponent => progress.powf(curviness),
        CurveShape::Superellipse => {
            1.0 - (1.0 - progress.powf(curviness)).max(0.0).powf(1.0 / curviness)
        }
    }
}
