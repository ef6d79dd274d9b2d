use crate::network::{Coord, Line, Network};

/// A `Between` pair resolved to canonical stations on one line's segment.
#[derive(Debug, Clone)]
pub struct ResolvedSpan<'a> {
    pub line: &'a Line,
    pub segment: usize,
    pub from: Coord,
    pub to: Coord,
}

/// A single station reference resolved against a line's membership.
#[derive(Debug, Clone)]
pub struct ResolvedStation<'a> {
    pub line: &'a Line,
    pub coord: Coord,
}

fn matches(member_name: &str, reference: &str) -> bool {
    member_name
        .to_lowercase()
        .contains(&reference.to_lowercase())
}

/// Resolve a `Between` pair to the first line whose member stations
/// substring-match both references.
///
/// This is deliberately a first-match scan, not a best-match search: lines
/// are walked in catalog order and the first line containing hits for both
/// references wins, even when an interchange or an ambiguous substring
/// would match "better" on a later line. The segment reported is the one
/// owning the first reference's station.
pub fn resolve_between<'a>(
    network: &'a Network,
    reference_a: &str,
    reference_b: &str,
) -> Option<ResolvedSpan<'a>> {
    for line in &network.lines {
        let Some(from) = line
            .stations
            .iter()
            .find(|m| matches(&m.name, reference_a))
        else {
            continue;
        };

        if let Some(to) = line.stations.iter().find(|m| matches(&m.name, reference_b)) {
            return Some(ResolvedSpan {
                line,
                segment: from.segment,
                from: from.coord,
                to: to.coord,
            });
        }
    }
    None
}

/// Resolve a single station reference with the same scan order and matching
/// rule as `resolve_between`, so all descriptor variants share one policy.
pub fn resolve_station<'a>(network: &'a Network, reference: &str) -> Option<ResolvedStation<'a>> {
    for line in &network.lines {
        if let Some(member) = line.stations.iter().find(|m| matches(&m.name, reference)) {
            return Some(ResolvedStation {
                line,
                coord: member.coord,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use crate::tfl::types::{RouteSequence, StationRecord};

    fn station(name: &str, lon: f64, lat: f64) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    /// Two lines whose member names both substring-match the queries
    /// "Stratford" and "Mile End". Names are distinct so the shared catalog
    /// keeps one coordinate per station.
    fn two_line_network() -> Network {
        let central = RouteSequence {
            stations: vec![
                station("Stratford Underground Station", 0.0, 0.0),
                station("Mile End Underground Station", 1.0, 0.0),
            ],
            line_strings: vec!["[[[0.0,0.0],[1.0,0.0]]]".to_string()],
        };
        let jubilee = RouteSequence {
            stations: vec![
                station("Stratford High Street Underground Station", 0.0, 5.0),
                station("Mile End East Underground Station", 1.0, 5.0),
            ],
            line_strings: vec!["[[[0.0,5.0],[1.0,5.0]]]".to_string()],
        };
        Network::build(vec![
            ("central".to_string(), central),
            ("jubilee".to_string(), jubilee),
        ])
    }

    #[test]
    fn first_line_in_catalog_order_wins() {
        let network = two_line_network();

        let span = resolve_between(&network, "Stratford", "Mile End").unwrap();
        assert_eq!(span.line.id, "central");

        let single = resolve_station(&network, "Stratford").unwrap();
        assert_eq!(single.line.id, "central");
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let network = two_line_network();

        let first = resolve_between(&network, "Stratford", "Mile End").unwrap();
        let second = resolve_between(&network, "Stratford", "Mile End").unwrap();

        assert_eq!(first.line.id, second.line.id);
        assert_eq!(first.segment, second.segment);
        assert_eq!(first.from, second.from);
        assert_eq!(first.to, second.to);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let network = two_line_network();

        let span = resolve_between(&network, "stratford", "MILE END").unwrap();
        assert_eq!(span.from, Coord::new(0.0, 0.0));
        assert_eq!(span.to, Coord::new(1.0, 0.0));
    }

    #[test]
    fn both_references_must_hit_the_same_line() {
        let network = two_line_network();
        assert!(resolve_between(&network, "Stratford", "Holborn").is_none());
    }

    #[test]
    fn absent_station_fails_resolution() {
        let network = two_line_network();
        assert!(resolve_station(&network, "Bank").is_none());
    }
}
