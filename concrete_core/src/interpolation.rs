//! # Table Interpolation
//!
//! Lookup helpers shared by the correction tables:
//!
//! - [`linear_interpolate`] - straight-line interpolation between two points
//! - [`table_lookup_1d`] - breakpoint table lookup, clamped at both ends
//! - [`bilinear_lookup`] - 2-D grid lookup built from two 1-D passes
//! - [`nearest_standard_value`] - snap a measurement to a nominal size
//!
//! Inputs outside a table's range are clamped to the nearest edge. Nothing
//! here extrapolates.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::interpolation::table_lookup_1d;
//!
//! let table = [(15.0, 0.96), (20.0, 1.00), (25.0, 1.02)];
//! assert_eq!(table_lookup_1d(20.0, &table), 1.00);
//! assert!((table_lookup_1d(17.5, &table) - 0.98).abs() < 1e-12);
//! assert_eq!(table_lookup_1d(99.0, &table), 1.02);
//! ```

use tracing::trace;

/// Linear interpolation `y1 + (x - x1)(y2 - y1)/(x2 - x1)`.
///
/// A degenerate interval (`x1 == x2`) returns `y1`.
pub fn linear_interpolate(x: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    if x2 == x1 {
        return y1;
    }
    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Look up `x` in an ordered `(breakpoint, factor)` table.
///
/// At or below the first breakpoint the first factor is returned unchanged;
/// at or above the last breakpoint, the last factor. In between, the
/// bracketing pair is interpolated linearly. An empty table yields `NaN`.
pub fn table_lookup_1d(x: f64, table: &[(f64, f64)]) -> f64 {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (table.first(), table.last()) else {
        return f64::NAN;
    };

    if x <= x_first {
        if x < x_first {
            trace!(x, clamped_to = x_first, "table lookup clamped at lower edge");
        }
        return y_first;
    }
    if x >= x_last {
        if x > x_last {
            trace!(x, clamped_to = x_last, "table lookup clamped at upper edge");
        }
        return y_last;
    }

    table
        .windows(2)
        .find(|pair| x < pair[1].0)
        .map(|pair| {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            linear_interpolate(x, x1, x2, y1, y2)
        })
        .unwrap_or(y_last)
}

/// Bracketing interval of `v` on an ascending axis.
///
/// Returns `(lower index, upper index, clamped value)`. At or beyond the top
/// edge both indices point at the last entry so the node value comes back
/// untouched.
fn bracket(points: &[f64], v: f64) -> (usize, usize, f64) {
    let last = points.len() - 1;
    let lo_edge = points[0];
    let hi_edge = points[last];
    let clamped = v.clamp(lo_edge, hi_edge);

    if clamped >= hi_edge {
        return (last, last, hi_edge);
    }
    let lower = points
        .windows(2)
        .position(|pair| clamped < pair[1])
        .unwrap_or(last);
    (lower, (lower + 1).min(last), clamped)
}

/// Bilinear interpolation over `grid[x_index][y_index]`.
///
/// `x` and `y` are clamped into the ranges of `x_points` and `y_points`.
/// The `y` axis is interpolated first at both bracketing `x` rows, then the
/// two results are interpolated along `x`; bilinear interpolation gives the
/// same value in either axis order.
///
/// Empty axes yield `NaN`. Axes must be ascending and `grid` must be
/// `x_points.len()` rows of `y_points.len()` values.
pub fn bilinear_lookup(x: f64, y: f64, x_points: &[f64], y_points: &[f64], grid: &[Vec<f64>]) -> f64 {
    if x_points.is_empty() || y_points.is_empty() {
        return f64::NAN;
    }
    if x < x_points[0] || x > x_points[x_points.len() - 1] || y < y_points[0] || y > y_points[y_points.len() - 1] {
        trace!(x, y, "grid lookup clamped to table edge");
    }

    let (i0, i1, xc) = bracket(x_points, x);
    let (j0, j1, yc) = bracket(y_points, y);

    let along_y = |row: &[f64]| linear_interpolate(yc, y_points[j0], y_points[j1], row[j0], row[j1]);
    let at_x0 = along_y(&grid[i0]);
    let at_x1 = along_y(&grid[i1]);

    linear_interpolate(xc, x_points[i0], x_points[i1], at_x0, at_x1)
}

/// Candidate closest to `x`.
///
/// Ties go to the smaller candidate, which is the one met first when
/// scanning in ascending order. Input order does not matter. With no
/// candidates, `x` is returned unchanged.
pub fn nearest_standard_value(x: f64, candidates: &[f64]) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for &candidate in candidates {
        let distance = (x - candidate).abs();
        let closer = match best {
            Some((best_candidate, best_distance)) => {
                distance < best_distance || (distance == best_distance && candidate < best_candidate)
            }
            None => true,
        };
        if closer {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate).unwrap_or(x)
}
