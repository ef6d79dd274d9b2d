use serde::Serialize;
use tracing::{debug, warn};

/// A (longitude, latitude) pair. Equality is exact float equality: station
/// membership is a join between station records and segment points that
/// share coordinates byte-for-byte, so no tolerance is applied anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

impl Coord {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// One continuous polyline of a line's route, in traversal order as
/// received. Points are never reordered or deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub points: Vec<Coord>,
}

/// A tube line with its geometry and the member stations derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub id: String,
    pub colour: &'static str,
    pub segments: Vec<Segment>,
    pub stations: Vec<crate::network::catalog::MemberStation>,
}

/// TfL's roundel colour per tube line id, as rendered on the map.
pub fn line_colour(line_id: &str) -> &'static str {
    match line_id {
        "bakerloo" => "#B36305",
        "central" => "#E32017",
        "circle" => "#FFD300",
        "district" => "#00782A",
        "hammersmith-city" => "#F3A9BB",
        "jubilee" => "#A0A5A9",
        "metropolitan" => "#9B0056",
        "northern" => "#000000",
        "piccadilly" => "#003688",
        "victoria" => "#00A0E2",
        "waterloo-city" => "#95CDBA",
        _ => "#888888",
    }
}

/// Parse the `lineStrings` groups of a route sequence into segments.
///
/// Each group is a JSON string encoding `number[][][]`: a list of point
/// lists. Point lists are flattened within their group, never across
/// groups, so a branching line keeps one segment per group. Groups that
/// fail to parse or parse to zero points yield no segment.
pub fn parse_line_strings(line_id: &str, groups: &[String]) -> Vec<Segment> {
    let mut segments = Vec::new();

    for group in groups {
        let lists: Vec<Vec<[f64; 2]>> = match serde_json::from_str(group) {
            Ok(lists) => lists,
            Err(e) => {
                warn!(line = line_id, error = %e, "unparseable geometry group, skipping");
                continue;
            }
        };

        let points: Vec<Coord> = lists
            .into_iter()
            .flatten()
            .map(|[lon, lat]| Coord::new(lon, lat))
            .collect();

        if points.is_empty() {
            debug!(line = line_id, "empty geometry group, skipping");
            continue;
        }

        segments.push(Segment { points });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_segment_per_group_flattened_within() {
        let groups = vec![
            "[[[0.0,0.0],[1.0,0.0]],[[1.0,0.0],[2.0,0.0]]]".to_string(),
            "[[[5.0,5.0],[6.0,5.0]]]".to_string(),
        ];

        let segments = parse_line_strings("central", &groups);

        assert_eq!(segments.len(), 2);
        // First group's two point lists are flattened into one segment.
        assert_eq!(segments[0].points.len(), 4);
        assert_eq!(segments[0].points[0], Coord::new(0.0, 0.0));
        assert_eq!(segments[0].points[3], Coord::new(2.0, 0.0));
        // Second group stays its own segment.
        assert_eq!(segments[1].points.len(), 2);
    }

    #[test]
    fn empty_group_yields_no_segment() {
        let groups = vec!["[]".to_string(), "[[[1.0,1.0]]]".to_string()];

        let segments = parse_line_strings("circle", &groups);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points, vec![Coord::new(1.0, 1.0)]);
    }

    #[test]
    fn malformed_group_is_skipped_not_fatal() {
        let groups = vec!["not json".to_string(), "[[[1.0,2.0]]]".to_string()];

        let segments = parse_line_strings("victoria", &groups);

        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn point_order_is_preserved_verbatim() {
        // Duplicate and out-of-order points must survive untouched.
        let groups = vec!["[[[2.0,0.0],[0.0,0.0],[0.0,0.0],[1.0,0.0]]]".to_string()];

        let segments = parse_line_strings("northern", &groups);

        assert_eq!(
            segments[0].points,
            vec![
                Coord::new(2.0, 0.0),
                Coord::new(0.0, 0.0),
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 0.0),
            ]
        );
    }

    #[test]
    fn known_lines_have_their_roundel_colour() {
        assert_eq!(line_colour("central"), "#E32017");
        assert_eq!(line_colour("waterloo-city"), "#95CDBA");
        assert_eq!(line_colour("elizabeth"), "#888888");
    }
}
