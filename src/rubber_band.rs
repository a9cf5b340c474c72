//! Rubber-band resistance for the row content offset
//!
//! Only the content (the row being dragged) is resisted; panel items are laid
//! out from the resulting content position.

/// Resisted magnitude of `magnitude` beyond `threshold`.
///
/// Below the threshold the value passes through unchanged. Beyond it the
/// excess grows as `(1 + excess)^factor - 1`, which is continuous at the
/// threshold, strictly increasing, and strictly below the raw excess for any
/// factor in (0, 1).
pub fn resist(magnitude: f32, threshold: f32, factor: f32) -> f32 {
    if magnitude <= threshold {
        return magnitude;
    }
    let excess = magnitude - threshold;
    threshold + (1.0 + excess).powf(factor) - 1.0
}

/// Signed content offset after resistance.
///
/// `threshold` is the preferred panel width plus the expansion trigger offset
/// for the edge the offset points at.
pub fn resisted_offset(offset: f32, threshold: f32, factor: f32) -> f32 {
    offset.signum() * resist(offset.abs(), threshold, factor)
}

/// Attenuated raw offset for a drag toward an edge without actions.
///
/// Large drags shrink to `|x|^exponent`; drags under one point pass through
/// so the curve never pushes the row further than the finger.
pub fn attenuate(offset: f32, exponent: f32) -> f32 {
    let damped = offset.abs().powf(exponent);
    if offset >= 0.0 {
        damped.min(offset)
    } else {
        (-damped).max(offset)
    }
}
