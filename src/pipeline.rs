use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::locator::parser::{DescriptorParser, LocationDescriptor};
use crate::locator::{projector, resolver, ResolvedPosition};
use crate::network::Network;
use crate::tfl::types::{ArrivalPrediction, ArrivalRecord, RouteSequence};
use crate::tfl::TflClient;

/// Everything one refresh cycle publishes: the vehicle positions plus the
/// network they were computed against, for the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub positions: Vec<ResolvedPosition>,
    pub network: Network,
}

pub type SharedSnapshot = Arc<RwLock<Option<Snapshot>>>;

/// Run one full refresh cycle.
///
/// Only a failed line-list fetch is fatal. Per-line geometry or arrival
/// failures leave that line's contribution empty and the cycle proceeds.
/// All fan-out fetches are joined before any arrival is resolved, so the
/// resolver never sees a partially built network.
pub async fn refresh_cycle(
    client: &TflClient,
    parser: &DescriptorParser,
) -> Result<Snapshot, FetchError> {
    let lines = client.tube_lines().await?;
    let line_ids: Vec<String> = lines.into_iter().map(|l| l.id).collect();
    debug!(lines = line_ids.len(), "fetched line list");

    // Fan out one geometry fetch per line, join all before building.
    let mut sequence_handles = Vec::with_capacity(line_ids.len());
    for id in &line_ids {
        let client = client.clone();
        let id = id.clone();
        sequence_handles.push(tokio::spawn(async move {
            let result = client.route_sequence(&id).await;
            (id, result)
        }));
    }
    let mut sequence_results = Vec::with_capacity(sequence_handles.len());
    for handle in sequence_handles {
        if let Ok(joined) = handle.await {
            sequence_results.push(joined);
        }
    }

    let network = Network::build(merge_sequence_results(sequence_results));

    // Same fan-out for arrivals, against the now-immutable network.
    let mut arrival_handles = Vec::with_capacity(line_ids.len());
    for id in &line_ids {
        let client = client.clone();
        let id = id.clone();
        arrival_handles.push(tokio::spawn(async move {
            let result = client.arrivals(&id).await;
            (id, result)
        }));
    }
    let mut arrival_results = Vec::with_capacity(arrival_handles.len());
    for handle in arrival_handles {
        if let Ok(joined) = handle.await {
            arrival_results.push(joined);
        }
    }

    let arrivals = merge_arrival_results(arrival_results);
    let positions = position_arrivals(&network, parser, &arrivals);

    Ok(Snapshot {
        generated_at: Utc::now(),
        positions,
        network,
    })
}

/// Keep successfully fetched route sequences in line-list order; a failed
/// line contributes no geometry this cycle.
fn merge_sequence_results(
    results: Vec<(String, Result<RouteSequence, FetchError>)>,
) -> Vec<(String, RouteSequence)> {
    let mut inputs = Vec::with_capacity(results.len());
    for (line_id, result) in results {
        match result {
            Ok(sequence) => inputs.push((line_id, sequence)),
            Err(e) => {
                warn!(line = %line_id, error = %e, "route sequence fetch failed, line excluded this cycle");
            }
        }
    }
    inputs
}

/// Flatten per-line arrival fetches; a failed line contributes no arrivals.
fn merge_arrival_results(
    results: Vec<(String, Result<Vec<ArrivalRecord>, FetchError>)>,
) -> Vec<ArrivalPrediction> {
    let mut arrivals = Vec::new();
    for (line_id, result) in results {
        match result {
            Ok(records) => {
                arrivals.extend(
                    records
                        .into_iter()
                        .map(|r| ArrivalPrediction::from_record(&line_id, r)),
                );
            }
            Err(e) => {
                warn!(line = %line_id, error = %e, "arrivals fetch failed, line excluded this cycle");
            }
        }
    }
    arrivals
}

/// The synchronous core: parse each arrival's status text, resolve the
/// named stations against the network, project a coordinate. Arrivals that
/// fail any stage are dropped individually, never the batch.
pub fn position_arrivals(
    network: &Network,
    parser: &DescriptorParser,
    arrivals: &[ArrivalPrediction],
) -> Vec<ResolvedPosition> {
    let mut positions = Vec::new();

    for arrival in arrivals {
        let descriptor = parser.parse(&arrival.current_location, &arrival.station_name);

        let position = match &descriptor {
            LocationDescriptor::Between(from, to) => {
                resolver::resolve_between(network, from, to)
                    .map(|span| projector::project_between(&span))
            }
            LocationDescriptor::At(name)
            | LocationDescriptor::AtPlatform(name)
            | LocationDescriptor::Approaching(name)
            | LocationDescriptor::Leaving(name)
            | LocationDescriptor::Left(name)
            | LocationDescriptor::Departed(name) => {
                resolver::resolve_station(network, name).map(|s| projector::project_station(&s))
            }
            LocationDescriptor::Unrecognized(raw) => {
                warn!(line = %arrival.line_id, status = %raw, "unrecognized location text, arrival excluded");
                None
            }
        };

        match position {
            Some(position) => positions.push(position),
            None => {
                if !matches!(descriptor, LocationDescriptor::Unrecognized(_)) {
                    debug!(
                        line = %arrival.line_id,
                        status = %arrival.current_location,
                        "station reference did not resolve, arrival excluded"
                    );
                }
            }
        }
    }

    positions
}

/// Poll loop: recompute the snapshot on an interval and replace the shared
/// one wholesale. A failed cycle keeps the previous snapshot in place.
pub async fn run_refresher(
    client: TflClient,
    parser: DescriptorParser,
    shared: SharedSnapshot,
    interval: Duration,
) {
    info!(interval_secs = interval.as_secs(), "starting refresh loop");

    loop {
        match refresh_cycle(&client, &parser).await {
            Ok(snapshot) => {
                info!(
                    positions = snapshot.positions.len(),
                    lines = snapshot.network.lines.len(),
                    "refresh cycle complete"
                );
                let mut lock = shared.write().await;
                *lock = Some(snapshot);
            }
            Err(e) => {
                warn!(error = %e, "refresh cycle failed, keeping previous snapshot");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Coord;
    use crate::tfl::types::StationRecord;

    fn station(name: &str, lon: f64, lat: f64) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    fn central_sequence() -> RouteSequence {
        RouteSequence {
            stations: vec![
                station("Oxford Circus", 0.0, 0.0),
                station("Holborn", 2.0, 0.0),
            ],
            line_strings: vec!["[[[0.0,0.0],[1.0,0.0],[2.0,0.0]]]".to_string()],
        }
    }

    fn arrival(line_id: &str, location: &str, station_name: &str) -> ArrivalPrediction {
        ArrivalPrediction {
            line_id: line_id.to_string(),
            current_location: location.to_string(),
            station_name: station_name.to_string(),
            towards: "Epping".to_string(),
        }
    }

    fn http_error() -> FetchError {
        // A decode failure stands in for any per-line upstream failure.
        FetchError::Decode(serde_json::from_str::<Vec<u8>>("nope").unwrap_err())
    }

    #[test]
    fn between_arrival_positions_at_the_segment_midpoint() {
        let network = Network::build(vec![("central".to_string(), central_sequence())]);
        let parser = DescriptorParser::new();
        let arrivals = vec![arrival("central", "Between Oxford Circus and Holborn", "")];

        let positions = position_arrivals(&network, &parser, &arrivals);

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].line, "central");
        assert_eq!(positions[0].coord, Coord::new(1.0, 0.0));
    }

    #[test]
    fn unresolvable_station_drops_the_arrival_without_error() {
        let network = Network::build(vec![("central".to_string(), central_sequence())]);
        let parser = DescriptorParser::new();
        let arrivals = vec![
            arrival("central", "Approaching Bank", ""),
            arrival("central", "At Platform", "Holborn"),
        ];

        let positions = position_arrivals(&network, &parser, &arrivals);

        // "Bank" is not in the catalog; only the At Platform arrival lands.
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].coord, Coord::new(2.0, 0.0));
    }

    #[test]
    fn unrecognized_status_text_is_excluded() {
        let network = Network::build(vec![("central".to_string(), central_sequence())]);
        let parser = DescriptorParser::new();
        let arrivals = vec![arrival("central", "Non Passenger", "Holborn")];

        assert!(position_arrivals(&network, &parser, &arrivals).is_empty());
    }

    #[test]
    fn failed_arrival_fetch_leaves_only_the_healthy_lines() {
        let network = Network::build(vec![("central".to_string(), central_sequence())]);
        let parser = DescriptorParser::new();

        let merged = merge_arrival_results(vec![
            (
                "central".to_string(),
                Ok(vec![ArrivalRecord {
                    current_location: "Between Oxford Circus and Holborn".to_string(),
                    station_name: String::new(),
                    towards: String::new(),
                }]),
            ),
            ("jubilee".to_string(), Err(http_error())),
        ]);

        let positions = position_arrivals(&network, &parser, &merged);

        assert_eq!(positions.len(), 1);
        assert!(positions.iter().all(|p| p.line == "central"));
    }

    #[test]
    fn failed_sequence_fetch_excludes_the_line_from_the_network() {
        let inputs = merge_sequence_results(vec![
            ("central".to_string(), Ok(central_sequence())),
            ("jubilee".to_string(), Err(http_error())),
        ]);

        let network = Network::build(inputs);

        assert_eq!(network.lines.len(), 1);
        assert_eq!(network.lines[0].id, "central");
    }
}
