//! Donut chart geometry.
//!
//! Angles are in degrees, start at -90 (straight up) and grow clockwise in
//! screen coordinates. All coordinates are relative to the chart center.

use crate::models::{Category, DonutChart, Point, SectorPath};
use std::fmt::Write;

pub const INNER_RADIUS_RATIO: f64 = 0.6;
pub const START_ANGLE_DEG: f64 = -90.0;
pub const FALLBACK_RING_COLOR: &str = "#e0e0e0";
pub const FALLBACK_SECTOR_COLOR: &str = "#ccc";
const FULL_TURN_EPSILON: f64 = 1e-9;

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// A blank color counts as no color at all.
fn color_of(category: &Category) -> Option<&str> {
    category.color.as_deref().filter(|c| !c.trim().is_empty())
}

fn polar(radius: f64, angle_deg: f64) -> Point {
    let theta = angle_deg.to_radians();
    Point {
        x: radius * theta.cos(),
        y: radius * theta.sin(),
    }
}

pub fn render(categories: &[Category], size: f64) -> DonutChart {
    let size = sanitize(size);
    let outer = size / 2.0;
    let inner = outer * INNER_RADIUS_RATIO;
    let total: f64 = categories.iter().map(|c| sanitize(c.value)).sum();

    if total == 0.0 {
        let first = categories.first();
        let color = first
            .and_then(color_of)
            .unwrap_or(FALLBACK_RING_COLOR)
            .to_string();
        return DonutChart::Ring {
            size,
            ring: full_ring(
                first.map(|c| c.label.clone()).unwrap_or_default(),
                color,
                outer,
                inner,
            ),
        };
    }

    let mut cumulative = START_ANGLE_DEG;
    let sectors = categories
        .iter()
        .map(|category| {
            let value = sanitize(category.value);
            let sweep = value / total * 360.0;
            let slice = sector(category, value, outer, inner, cumulative, sweep);
            cumulative += sweep;
            slice
        })
        .collect();

    DonutChart::Sectors { size, sectors }
}

fn sector(
    category: &Category,
    value: f64,
    outer: f64,
    inner: f64,
    start: f64,
    sweep: f64,
) -> SectorPath {
    let end = start + sweep;
    let large_arc = sweep > 180.0;
    let points = vec![
        polar(outer, start),
        polar(outer, end),
        polar(inner, end),
        polar(inner, start),
    ];
    let path = if sweep >= 360.0 - FULL_TURN_EPSILON {
        // An arc whose endpoints coincide draws nothing, so a slice that
        // owns the whole chart is emitted as a ring.
        ring_path(outer, inner)
    } else {
        wedge_path(&points, outer, inner, large_arc)
    };

    SectorPath {
        label: category.label.clone(),
        color: color_of(category)
            .unwrap_or(FALLBACK_SECTOR_COLOR)
            .to_string(),
        value,
        outer_radius: outer,
        inner_radius: inner,
        start_angle_deg: start,
        sweep_deg: sweep,
        large_arc,
        geometry_points: points,
        path,
    }
}

fn wedge_path(points: &[Point], outer: f64, inner: f64, large_arc: bool) -> String {
    let flag = u8::from(large_arc);
    let mut path = String::new();
    let _ = write!(
        path,
        "M {} {} A {outer} {outer} 0 {flag} 1 {} {} L {} {} A {inner} {inner} 0 {flag} 0 {} {} Z",
        points[0].x,
        points[0].y,
        points[1].x,
        points[1].y,
        points[2].x,
        points[2].y,
        points[3].x,
        points[3].y
    );
    path
}

/// Outer circle drawn clockwise as two half arcs from the top, inner circle
/// counter-clockwise, so even-odd and nonzero fill both leave the hole empty.
fn ring_path(outer: f64, inner: f64) -> String {
    format!(
        "M 0 {top} A {outer} {outer} 0 1 1 0 {outer} A {outer} {outer} 0 1 1 0 {top} \
         M 0 {itop} A {inner} {inner} 0 1 0 0 {inner} A {inner} {inner} 0 1 0 0 {itop} Z",
        top = -outer,
        itop = -inner,
    )
}

fn full_ring(label: String, color: String, outer: f64, inner: f64) -> SectorPath {
    let points = vec![
        Point { x: 0.0, y: -outer },
        Point { x: 0.0, y: outer },
        Point { x: 0.0, y: inner },
        Point { x: 0.0, y: -inner },
    ];
    let path = ring_path(outer, inner);

    SectorPath {
        label,
        color,
        value: 0.0,
        outer_radius: outer,
        inner_radius: inner,
        start_angle_deg: START_ANGLE_DEG,
        sweep_deg: 360.0,
        large_arc: true,
        geometry_points: points,
        path,
    }
}
