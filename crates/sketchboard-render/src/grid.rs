//! Background grid geometry.
//!
//! Spacing adapts to the zoom level so the grid never collapses into a solid
//! fill when zoomed out or becomes sparse when zoomed in.

use kurbo::Rect;

/// Cell size in world units at scale 1.
pub const BASE_SPACING: f64 = 20.0;

/// Every n-th line is drawn as a major line.
pub const MAJOR_EVERY: i64 = 4;

/// Below this scale cells are merged.
const MERGE_BELOW: f64 = 0.3;
/// Above this scale cells are subdivided.
const SPLIT_ABOVE: f64 = 3.0;

/// Grid cell size in world units for the given zoom level.
pub fn grid_spacing(scale: f64) -> f64 {
    if scale < MERGE_BELOW {
        BASE_SPACING * (1.0 / scale).ceil()
    } else if scale > SPLIT_ABOVE {
        BASE_SPACING / scale.floor()
    } else {
        BASE_SPACING
    }
}

/// Whether the line with the given index is a major line.
pub fn is_major(index: i64) -> bool {
    index.rem_euclid(MAJOR_EVERY) == 0
}

/// One grid line (or one column/row of dots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    /// Multiple of the spacing this line sits on.
    pub index: i64,
    /// World coordinate along the line's axis.
    pub position: f64,
    pub major: bool,
}

/// Range of grid lines covering a world rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub spacing: f64,
    pub start_x: i64,
    pub end_x: i64,
    pub start_y: i64,
    pub end_y: i64,
}

impl GridBounds {
    /// Lines needed to cover `visible`, extended outward to whole cells.
    pub fn new(visible: Rect, spacing: f64) -> Self {
        let visible = visible.abs();
        Self {
            spacing,
            start_x: (visible.x0 / spacing).floor() as i64,
            end_x: (visible.x1 / spacing).ceil() as i64,
            start_y: (visible.y0 / spacing).floor() as i64,
            end_y: (visible.y1 / spacing).ceil() as i64,
        }
    }

    /// Vertical lines, left to right.
    pub fn columns(&self) -> impl Iterator<Item = GridLine> {
        let spacing = self.spacing;
        (self.start_x..=self.end_x).map(move |index| line(index, spacing))
    }

    /// Horizontal lines, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = GridLine> {
        let spacing = self.spacing;
        (self.start_y..=self.end_y).map(move |index| line(index, spacing))
    }
}

fn line(index: i64, spacing: f64) -> GridLine {
    GridLine {
        index,
        position: index as f64 * spacing,
        major: is_major(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_by_scale() {
        assert!((grid_spacing(1.0) - 20.0).abs() < f64::EPSILON);
        assert!((grid_spacing(0.3) - 20.0).abs() < f64::EPSILON);
        assert!((grid_spacing(3.0) - 20.0).abs() < f64::EPSILON);
        // ceil(1 / 0.25) = 4
        assert!((grid_spacing(0.25) - 80.0).abs() < f64::EPSILON);
        // ceil(1 / 0.1) = 10
        assert!((grid_spacing(0.1) - 200.0).abs() < 1e-9);
        assert!((grid_spacing(4.5) - 5.0).abs() < f64::EPSILON);
        assert!((grid_spacing(5.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_major_lines_every_fourth() {
        assert!(is_major(0));
        assert!(is_major(4));
        assert!(is_major(-8));
        assert!(!is_major(1));
        assert!(!is_major(-3));
    }

    #[test]
    fn test_bounds_cover_visible_rect() {
        let bounds = GridBounds::new(Rect::new(-30.0, 5.0, 50.0, 40.0), 20.0);
        assert_eq!((bounds.start_x, bounds.end_x), (-2, 3));
        assert_eq!((bounds.start_y, bounds.end_y), (0, 2));

        let columns: Vec<f64> = bounds.columns().map(|l| l.position).collect();
        assert_eq!(columns, vec![-40.0, -20.0, 0.0, 20.0, 40.0, 60.0]);
        let majors: Vec<i64> = bounds.columns().filter(|l| l.major).map(|l| l.index).collect();
        assert_eq!(majors, vec![0]);
        assert_eq!(bounds.rows().count(), 3);
    }
}
