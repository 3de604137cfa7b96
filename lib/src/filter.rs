use crate::params::DepthRange;

/// Returns true when a depth sample is usable.
///
/// The range is exclusive at both ends. A sample of 0 is the sensor's
/// "no measurement" marker and is rejected whatever the range.
#[must_use]
#[inline]
pub const fn is_valid(depth: u16, range: DepthRange) -> bool {
    depth != 0 && range.min < depth && depth < range.max
}
