//! Serde models for the two API payload shapes: the season-wide reference
//! metadata ("bootstrap-static") and the per-gameweek live payload entries.
//!
//! Live entries are deliberately loose. The same logical field has shipped in
//! several shapes over the years, so everything is optional here and the
//! reconciler resolves the ambiguity in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Season-wide reference metadata, fetched once per run and read-only after.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub element_types: Vec<ElementType>,
    /// Self-reported current season label. The field name has varied, so
    /// both observed spellings are captured and resolved by `season_label`.
    #[serde(default)]
    pub season_name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

impl Bootstrap {
    /// The API's self-reported season label, preferring the newer field name.
    pub fn season_label(&self) -> Option<&str> {
        self.season_name.as_deref().or(self.season.as_deref())
    }
}

/// One gameweek descriptor in the metadata's ordered event list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Event {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deadline_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
}

/// Team (group) record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

/// Position (category) record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ElementType {
    pub id: i64,
    #[serde(default)]
    pub singular_name_short: Option<String>,
    #[serde(default)]
    pub singular_name: Option<String>,
}

/// Player (entity) record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Element {
    pub id: i64,
    #[serde(default)]
    pub web_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub second_name: Option<String>,
    #[serde(default)]
    pub team: Option<i64>,
    #[serde(default)]
    pub element_type: Option<i64>,
    #[serde(default)]
    pub now_cost: Option<i64>,
    #[serde(default)]
    pub total_points: Option<i64>,
    #[serde(default)]
    pub selected_by_percent: Option<String>,
}

/// One loosely-typed entry of a gameweek payload.
///
/// The player id arrives either as a direct `id` field or as a secondary
/// `element` field; entries exposing neither are non-player records and get
/// dropped by the reconciler. Unrecognized top-level keys are retained in
/// `extra` because some payloads flatten stats to the top level instead of
/// nesting them under `stats`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub element: Option<i64>,
    #[serde(default)]
    pub stats: Option<StatsBlock>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawEntry {
    /// Resolve the entity identifier, direct field first.
    pub fn entity_id(&self) -> Option<i64> {
        self.id.or(self.element)
    }
}

/// The two observed shapes of a per-gameweek statistics sub-structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatsBlock {
    /// Flat mapping of stat name to value
    Flat(BTreeMap<String, Value>),
    /// Sequence of `{identifier|name, value}` pairs
    Pairs(Vec<StatPair>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatPair {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl StatsBlock {
    /// Normalize either shape into one flat name-to-value mapping.
    /// Pairs carrying neither an identifier nor a name are skipped.
    pub fn into_flat(self) -> BTreeMap<String, Value> {
        match self {
            StatsBlock::Flat(map) => map,
            StatsBlock::Pairs(pairs) => pairs
                .into_iter()
                .filter_map(|pair| {
                    let key = pair.identifier.or(pair.name)?;
                    Some((key, pair.value))
                })
                .collect(),
        }
    }
}
