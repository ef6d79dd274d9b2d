use serde::Deserialize;

/// One entry of `/Line/Mode/tube`. The endpoint returns much more per line;
/// only the id drives the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    pub id: String,
}

/// `/Line/{id}/Route/Sequence/outbound`: the stations on the line plus the
/// route geometry. Each entry of `lineStrings` is itself a JSON document
/// encoding a group of coordinate lists (`number[][][]`), serialized as a
/// string inside the outer response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteSequence {
    pub stations: Vec<StationRecord>,
    pub line_strings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One entry of `/Line/{id}/Arrivals`. `current_location` is the free-text
/// status ("Between X and Y", "At Platform", ...); `station_name` is the
/// stop the prediction is for, used only as the fallback station when the
/// status carries no name of its own; `towards` is carried through for the
/// rendering collaborator and never interpreted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrivalRecord {
    pub current_location: String,
    pub station_name: String,
    pub towards: String,
}

/// An arrival record tied to the line it was fetched for.
#[derive(Debug, Clone)]
pub struct ArrivalPrediction {
    pub line_id: String,
    pub current_location: String,
    pub station_name: String,
    pub towards: String,
}

impl ArrivalPrediction {
    pub fn from_record(line_id: &str, record: ArrivalRecord) -> Self {
        Self {
            line_id: line_id.to_string(),
            current_location: record.current_location,
            station_name: record.station_name,
            towards: record.towards,
        }
    }
}
