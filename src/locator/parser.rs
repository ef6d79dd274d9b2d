use regex::Regex;

/// Structured interpretation of an arrival's free-text `currentLocation`.
/// Exactly one variant per input; `Unrecognized` keeps the raw text for
/// diagnostics and excludes the arrival from positioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationDescriptor {
    At(String),
    /// "At Platform" carries no station name of its own; the prediction's
    /// reported station is substituted.
    AtPlatform(String),
    Between(String, String),
    Approaching(String),
    Leaving(String),
    Left(String),
    Departed(String),
    Unrecognized(String),
}

/// Ordered pattern rules over the feed's status vocabulary. Keywords are
/// matched case-sensitively (the vocabulary is stable) and station-name
/// captures are taken verbatim, trailing punctuation included.
#[derive(Debug)]
pub struct DescriptorParser {
    between: Regex,
    at: Regex,
    approaching: Regex,
    leaving: Regex,
    left: Regex,
    departed: Regex,
}

impl DescriptorParser {
    pub fn new() -> Self {
        // The patterns are fixed literals; compilation cannot fail.
        let compile = |pattern: &str| Regex::new(pattern).expect("static pattern");
        Self {
            between: compile(r"^Between (.+) and (.+)$"),
            at: compile(r"^At (.+)$"),
            approaching: compile(r"^Approaching (.+)$"),
            leaving: compile(r"^Leaving (.+)$"),
            left: compile(r"^Left (.+)$"),
            departed: compile(r"^Departed (.+)$"),
        }
    }

    /// First matching rule wins; rule order is part of the contract.
    pub fn parse(&self, text: &str, fallback_station: &str) -> LocationDescriptor {
        if let Some(caps) = self.between.captures(text) {
            return LocationDescriptor::Between(caps[1].to_string(), caps[2].to_string());
        }
        if text == "At Platform" {
            return LocationDescriptor::AtPlatform(fallback_station.to_string());
        }
        if let Some(caps) = self.at.captures(text) {
            return LocationDescriptor::At(caps[1].to_string());
        }
        if let Some(caps) = self.approaching.captures(text) {
            return LocationDescriptor::Approaching(caps[1].to_string());
        }
        if let Some(caps) = self.leaving.captures(text) {
            return LocationDescriptor::Leaving(caps[1].to_string());
        }
        if let Some(caps) = self.left.captures(text) {
            return LocationDescriptor::Left(caps[1].to_string());
        }
        if let Some(caps) = self.departed.captures(text) {
            return LocationDescriptor::Departed(caps[1].to_string());
        }
        LocationDescriptor::Unrecognized(text.to_string())
    }
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self::new()
    }
}
