//! Waypoint path with an advancing cursor
//!
//! No planning happens here; the path is authored up front and walked in order.

use glam::Vec3;

/// Ordered waypoints and the index of the one currently targeted
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vec3>,
    cursor: usize,
    /// Distance at which the current waypoint counts as reached
    pub arrival_threshold: f32,
    /// Wrap to the first waypoint after the last
    pub looping: bool,
}

impl WaypointPath {
    /// Create a path starting at the first waypoint
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, arrival_threshold: f32, looping: bool) -> Self {
        Self {
            waypoints,
            cursor: 0,
            arrival_threshold,
            looping,
        }
    }

    /// Path with no waypoints
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.5, true)
    }

    /// Index of the targeted waypoint
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All waypoints
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Number of waypoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the path has no waypoints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Targeted waypoint without advancing
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Waypoint to steer toward from `position`.
    ///
    /// Advances first if `position` is within the arrival threshold of the
    /// current waypoint. Non-looping paths stay on their last waypoint.
    pub fn next_point(&mut self, position: Vec3) -> Option<Vec3> {
        let current = self.current()?;

        if position.distance(current) < self.arrival_threshold {
            let last = self.waypoints.len() - 1;
            let next = if self.looping {
                (self.cursor + 1) % self.waypoints.len()
            } else {
                (self.cursor + 1).min(last)
            };

            if next != self.cursor {
                log::debug!("Waypoint {} reached, heading to {next}", self.cursor);
                self.cursor = next;
            }
        }

        self.current()
    }

    /// Go back to the first waypoint
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl Default for WaypointPath {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const B: Vec3 = Vec3::new(10.0, 0.0, 0.0);
    const C: Vec3 = Vec3::new(10.0, 0.0, 10.0);

    #[test]
    fn test_empty_path() {
        let mut path = WaypointPath::empty();
        assert_eq!(path.next_point(Vec3::ZERO), None);
        assert_eq!(path.cursor(), 0);
    }

    #[test]
    fn test_holds_until_arrival() {
        let mut path = WaypointPath::new(vec![A, B, C], 0.5, true);
        assert_eq!(path.next_point(Vec3::new(5.0, 0.0, 5.0)), Some(A));
        assert_eq!(path.cursor(), 0);
    }

    #[test]
    fn test_looping_path_wraps() {
        let mut path = WaypointPath::new(vec![A, B, C], 0.5, true);

        assert_eq!(path.next_point(A + Vec3::splat(0.1)), Some(B));
        assert_eq!(path.cursor(), 1);
        assert_eq!(path.next_point(B), Some(C));
        assert_eq!(path.next_point(C), Some(A));
        assert_eq!(path.cursor(), 0);
    }

    #[test]
    fn test_open_path_clamps_at_end() {
        let mut path = WaypointPath::new(vec![A, B, C], 0.5, false);

        path.next_point(A);
        path.next_point(B);
        assert_eq!(path.cursor(), 2);

        for _ in 0..3 {
            assert_eq!(path.next_point(C), Some(C));
            assert_eq!(path.cursor(), 2);
        }
    }

    #[test]
    fn test_single_waypoint_loop() {
        let mut path = WaypointPath::new(vec![B], 1.0, true);
        assert_eq!(path.next_point(B), Some(B));
        assert_eq!(path.cursor(), 0);
    }

    #[test]
    fn test_reset() {
        let mut path = WaypointPath::new(vec![A, B], 0.5, false);
        path.next_point(A);
        assert_eq!(path.cursor(), 1);
        path.reset();
        assert_eq!(path.current(), Some(A));
    }
}
