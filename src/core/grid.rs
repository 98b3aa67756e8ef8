use std::collections::HashSet;

use crate::core::GridPoint;

/// Hard cap on points generated for one axis.
pub const MAX_GRID_POINTS: usize = 1_000;

/// Points up to this far past the axis end are still emitted.
pub const GRID_END_TOLERANCE_PX: f64 = 1.0;

/// Floor/ceil pixel buckets of main grid positions.
#[derive(Debug, Default)]
pub(crate) struct PositionBuckets {
    buckets: HashSet<i64>,
}

impl PositionBuckets {
    pub(crate) fn from_points(points: &[GridPoint]) -> Self {
        let mut buckets = HashSet::with_capacity(points.len() * 2);
        for point in points {
            buckets.insert(point.position.floor() as i64);
            buckets.insert(point.position.ceil() as i64);
        }
        Self { buckets }
    }

    /// True when `position` would land on an existing main tick.
    pub(crate) fn collides(&self, position: f64) -> bool {
        self.buckets.contains(&(position.floor() as i64))
            || self.buckets.contains(&(position.ceil() as i64))
    }
}
