//! Plain geometry types used by the layout.
//!
//! Everything is measured in logical pixels with f64 coordinates. The layout
//! never rounds; hosts are expected to snap to physical pixels themselves.

use std::fmt;

/// Tolerance when testing whether two edges coincide.
///
/// Pane rects are computed by repeated ratio multiplication, so exact
/// comparison would spuriously fail after a few splits.
pub(crate) const EDGE_EPSILON: f64 = 0.5;

pub(crate) fn edges_touch(a: f64, b: f64) -> bool {
    (a - b).abs() <= EDGE_EPSILON
}

/// Axis along which a split arranges its two children.
///
/// `Horizontal` places them side by side, `Vertical` stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "horizontal" => Some(Orientation::Horizontal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.0},{:.0}", self.x, self.y)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.0}x{:.0}", self.w, self.h)
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub loc: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            loc: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    pub fn from_loc_and_size(loc: Point, size: Size) -> Self {
        Self { loc, size }
    }

    pub fn right(&self) -> f64 {
        self.loc.x + self.size.w
    }

    pub fn bottom(&self) -> f64 {
        self.loc.y + self.size.h
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.loc.x + self.size.w / 2.,
            self.loc.y + self.size.h / 2.,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.loc.x
            && point.y >= self.loc.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.size.w <= 0. || self.size.h <= 0.
    }

    /// Clamps this rect so it lies within `bounds`, shrinking if necessary.
    pub fn clamp_within(&self, bounds: Rect) -> Rect {
        let w = self.size.w.min(bounds.size.w);
        let h = self.size.h.min(bounds.size.h);
        let x = self.loc.x.clamp(bounds.loc.x, bounds.right() - w);
        let y = self.loc.y.clamp(bounds.loc.y, bounds.bottom() - h);
        Rect::new(x, y, w, h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {})", self.loc, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges() {
        let rect = Rect::new(10., 10., 100., 50.);
        assert!(rect.contains(Point::new(10., 10.)));
        assert!(rect.contains(Point::new(109., 59.)));
        assert!(!rect.contains(Point::new(110., 30.)));
        assert!(!rect.contains(Point::new(50., 60.)));
    }

    #[test]
    fn clamp_within_moves_and_shrinks() {
        let bounds = Rect::new(0., 0., 800., 600.);
        let moved = Rect::new(790., -20., 100., 50.).clamp_within(bounds);
        assert_eq!(moved, Rect::new(700., 0., 100., 50.));

        let shrunk = Rect::new(0., 0., 900., 700.).clamp_within(bounds);
        assert_eq!(shrunk, Rect::new(0., 0., 800., 600.));
    }
}
