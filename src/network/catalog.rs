use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::network::geometry::{self, Coord, Line};
use crate::tfl::types::RouteSequence;

/// A station that belongs to a line: one of the line's segment points
/// coincides exactly with the station's catalogued coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStation {
    pub name: String,
    pub coord: Coord,
    /// Index of the owning segment within the line.
    pub segment: usize,
}

/// The assembled per-cycle view of the tube network: every line with its
/// geometry and derived station membership, plus the canonical station
/// name -> coordinate catalog. Built once per refresh cycle, then read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Network {
    /// Lines in the order the line list returned them. The resolver's
    /// first-match scan depends on this order being deterministic.
    pub lines: Vec<Line>,
    pub stations: HashMap<String, Coord>,
}

impl Network {
    /// Assemble the network from each line's route sequence, in input order.
    ///
    /// The station catalog is completed first (last write wins on duplicate
    /// names; upstream repeats stations per direction) and only then joined
    /// against segment points, so interchange stations gain membership on
    /// every line whose geometry passes through their exact coordinate.
    ///
    /// Membership is an exact-equality join by policy: a station whose
    /// record is rounded differently from the polyline never becomes a
    /// member and silently resolves to no line. Switching this to proximity
    /// matching would change resolution results.
    pub fn build(inputs: impl IntoIterator<Item = (String, RouteSequence)>) -> Self {
        let inputs: Vec<(String, RouteSequence)> = inputs.into_iter().collect();

        let mut stations: HashMap<String, Coord> = HashMap::new();
        for (_, sequence) in &inputs {
            for record in &sequence.stations {
                stations.insert(record.name.clone(), Coord::new(record.lon, record.lat));
            }
        }

        // Fixed scan order so member lists (and with them resolver results)
        // do not depend on hash iteration order.
        let mut catalog: Vec<(String, Coord)> = stations
            .iter()
            .map(|(name, coord)| (name.clone(), *coord))
            .collect();
        catalog.sort_by(|a, b| a.0.cmp(&b.0));

        let mut lines = Vec::with_capacity(inputs.len());
        for (line_id, sequence) in &inputs {
            let segments = geometry::parse_line_strings(line_id, &sequence.line_strings);

            let mut members: Vec<MemberStation> = Vec::new();
            for (segment_idx, segment) in segments.iter().enumerate() {
                for point in &segment.points {
                    for (name, coord) in &catalog {
                        if coord == point
                            && !members
                                .iter()
                                .any(|m| m.segment == segment_idx && &m.name == name)
                        {
                            members.push(MemberStation {
                                name: name.clone(),
                                coord: *coord,
                                segment: segment_idx,
                            });
                        }
                    }
                }
            }

            debug!(
                line = %line_id,
                segments = segments.len(),
                members = members.len(),
                "assembled line"
            );

            lines.push(Line {
                colour: geometry::line_colour(line_id),
                id: line_id.clone(),
                segments,
                stations: members,
            });
        }

        Self { lines, stations }
    }

    pub fn line(&self, line_id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == line_id)
    }
}
