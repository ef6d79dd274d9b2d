use serde::Serialize;

use crate::locator::resolver::{ResolvedSpan, ResolvedStation};
use crate::network::Coord;

/// The single renderable output of the core: one estimated coordinate per
/// vehicle, tagged with the line it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPosition {
    pub line: String,
    pub coord: Coord,
}

/// Position a vehicle reported between two stations.
///
/// The feed carries no progress or timing, so the baseline is the midpoint
/// of the two station coordinates, snapped onto the owning segment so the
/// point always lies on the drawn route rather than cutting a curve.
pub fn project_between(span: &ResolvedSpan<'_>) -> ResolvedPosition {
    let midpoint = Coord::new(
        (span.from.lon + span.to.lon) / 2.0,
        (span.from.lat + span.to.lat) / 2.0,
    );

    let coord = span
        .line
        .segments
        .get(span.segment)
        .map(|segment| snap_to_polyline(&segment.points, midpoint))
        .unwrap_or(midpoint);

    ResolvedPosition {
        line: span.line.id.clone(),
        coord,
    }
}

/// Position a vehicle whose descriptor names a single station: the station
/// coordinate is already the answer.
pub fn project_station(station: &ResolvedStation<'_>) -> ResolvedPosition {
    ResolvedPosition {
        line: station.line.id.clone(),
        coord: station.coord,
    }
}

/// Nearest point to `target` on the polyline, by planar projection onto
/// each edge with the parameter clamped to the edge's endpoints. Planar
/// treatment of lon/lat is fine at tube-network extents.
fn snap_to_polyline(points: &[Coord], target: Coord) -> Coord {
    if points.is_empty() {
        return target;
    }

    let mut best = points[0];
    let mut best_dist = dist_sq(best, target);

    for edge in points.windows(2) {
        let candidate = project_onto_edge(edge[0], edge[1], target);
        let dist = dist_sq(candidate, target);
        if dist < best_dist {
            best = candidate;
            best_dist = dist;
        }
    }

    best
}

fn project_onto_edge(a: Coord, b: Coord, p: Coord) -> Coord {
    let (dx, dy) = (b.lon - a.lon, b.lat - a.lat);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }

    let t = ((p.lon - a.lon) * dx + (p.lat - a.lat) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    Coord::new(a.lon + t * dx, a.lat + t * dy)
}

fn dist_sq(a: Coord, b: Coord) -> f64 {
    let (dx, dy) = (a.lon - b.lon, a.lat - b.lat);
    dx * dx + dy * dy
}
