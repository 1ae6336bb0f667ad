//! Schema reconciliation: flatten one gameweek's raw payload into canonical
//! rows using the reference metadata lookups.
//!
//! Policy in one line: an entry with no resolvable player id is dropped,
//! everything else degrades to defaults. Missing metadata leaves the
//! entity-derived columns empty, missing stats become zero. Only a payload
//! that is not iterable as entries at all is an error.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::error::AppError;
use crate::fetcher::models::{Bootstrap, Element, ElementType, RawEntry, Team};

/// Per-gameweek statistic fields of the canonical schema, in column order.
/// Used when stats arrive flattened to an entry's top level instead of
/// nested under `stats`.
pub const GW_STAT_FIELDS: [&str; 18] = [
    "minutes",
    "goals_scored",
    "assists",
    "clean_sheets",
    "goals_conceded",
    "own_goals",
    "penalties_saved",
    "penalties_missed",
    "yellow_cards",
    "red_cards",
    "saves",
    "bonus",
    "bps",
    "influence",
    "creativity",
    "threat",
    "ict_index",
    "total_points",
];

/// Read-only lookup tables over the reference metadata, built once per run.
pub struct MetadataIndex<'a> {
    players: HashMap<i64, &'a Element>,
    teams: HashMap<i64, &'a Team>,
    positions: HashMap<i64, &'a ElementType>,
}

impl<'a> MetadataIndex<'a> {
    pub fn new(bootstrap: &'a Bootstrap) -> Self {
        Self {
            players: bootstrap.elements.iter().map(|p| (p.id, p)).collect(),
            teams: bootstrap.teams.iter().map(|t| (t.id, t)).collect(),
            positions: bootstrap.element_types.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn player(&self, id: i64) -> Option<&'a Element> {
        self.players.get(&id).copied()
    }

    pub fn team_name(&self, id: i64) -> Option<String> {
        self.teams.get(&id).and_then(|t| t.name.clone())
    }

    pub fn position_name(&self, id: i64) -> Option<String> {
        self.positions
            .get(&id)
            .and_then(|p| p.singular_name_short.clone())
    }
}

/// One canonical output row per (gameweek, player). Field order here is the
/// CSV column order; every field is always present, with zeroes and empty
/// strings standing in for data the raw payload or metadata lacked.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CanonicalRow {
    pub gw: i64,
    pub player_id: i64,
    pub player_name: String,
    pub team_id: Option<i64>,
    pub team: Option<String>,
    pub position_id: Option<i64>,
    pub position: Option<String>,
    pub now_cost: Option<i64>,
    pub total_points_season: Option<i64>,
    pub selected_by_percent: Option<String>,
    pub minutes: i64,
    pub goals_scored: i64,
    pub assists: i64,
    pub clean_sheets: i64,
    pub goals_conceded: i64,
    pub own_goals: i64,
    pub penalties_saved: i64,
    pub penalties_missed: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub saves: i64,
    pub bonus: i64,
    pub bps: i64,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,
    pub total_points: i64,
    pub fetched_at: String,
}

/// Flatten one gameweek payload into canonical rows.
///
/// Entries resolve their player id through `id` then `element`; entries with
/// neither are dropped silently since live payloads legitimately carry
/// non-player records. Row order follows payload order. The only error is a
/// payload whose `elements` is not an array of entries.
pub fn reconcile(
    payload: &Value,
    index: &MetadataIndex<'_>,
    requested_gameweek: u32,
    fetched_at: &str,
) -> Result<Vec<CanonicalRow>, AppError> {
    let entries = payload_entries(payload)?;

    // The payload may carry its own gameweek id under either historical name
    let gw = payload
        .get("event")
        .and_then(Value::as_i64)
        .or_else(|| payload.get("gameweek").and_then(Value::as_i64))
        .unwrap_or(i64::from(requested_gameweek));

    let mut rows = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;

    for value in entries {
        let Ok(entry) = serde_json::from_value::<RawEntry>(value.clone()) else {
            dropped += 1;
            continue;
        };
        let Some(player_id) = entry.entity_id() else {
            dropped += 1;
            continue;
        };

        rows.push(build_row(gw, player_id, &entry, index, fetched_at));
    }

    if dropped > 0 {
        debug!("Dropped {dropped} entries without a resolvable player id (gw {gw})");
    }

    Ok(rows)
}

/// The payload's entry sequence: either the payload is itself an array, or
/// it carries an `elements` array. Anything else is a schema error.
fn payload_entries(payload: &Value) -> Result<&Vec<Value>, AppError> {
    if let Some(entries) = payload.as_array() {
        return Ok(entries);
    }
    match payload.get("elements") {
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => Err(AppError::schema_error(format!(
            "'elements' is not an array (got {})",
            value_kind(other)
        ))),
        None => Err(AppError::schema_error(
            "payload carries no 'elements' array",
        )),
    }
}

fn build_row(
    gw: i64,
    player_id: i64,
    entry: &RawEntry,
    index: &MetadataIndex<'_>,
    fetched_at: &str,
) -> CanonicalRow {
    let meta = index.player(player_id);

    let team_id = meta.and_then(|m| m.team);
    let team = team_id.and_then(|id| index.team_name(id));
    let position_id = meta.and_then(|m| m.element_type);
    let position = position_id.and_then(|id| index.position_name(id));

    let stats = resolve_stats(entry);

    CanonicalRow {
        gw,
        player_id,
        player_name: meta.map(display_name).unwrap_or_default(),
        team_id,
        team,
        position_id,
        position,
        now_cost: meta.and_then(|m| m.now_cost),
        total_points_season: meta.and_then(|m| m.total_points),
        selected_by_percent: meta.and_then(|m| m.selected_by_percent.clone()),
        minutes: stat_i64(&stats, "minutes"),
        goals_scored: stat_i64(&stats, "goals_scored"),
        assists: stat_i64(&stats, "assists"),
        clean_sheets: stat_i64(&stats, "clean_sheets"),
        goals_conceded: stat_i64(&stats, "goals_conceded"),
        own_goals: stat_i64(&stats, "own_goals"),
        penalties_saved: stat_i64(&stats, "penalties_saved"),
        penalties_missed: stat_i64(&stats, "penalties_missed"),
        yellow_cards: stat_i64(&stats, "yellow_cards"),
        red_cards: stat_i64(&stats, "red_cards"),
        saves: stat_i64(&stats, "saves"),
        bonus: stat_i64(&stats, "bonus"),
        bps: stat_i64(&stats, "bps"),
        influence: stat_f64(&stats, "influence"),
        creativity: stat_f64(&stats, "creativity"),
        threat: stat_f64(&stats, "threat"),
        ict_index: stat_f64(&stats, "ict_index"),
        total_points: stat_i64(&stats, "total_points"),
        fetched_at: fetched_at.to_string(),
    }
}

/// The entry's stats as a flat mapping. Entries without a `stats`
/// sub-structure fall back to harvesting known stat fields from their
/// top level, which some payload variants use.
fn resolve_stats(entry: &RawEntry) -> std::collections::BTreeMap<String, Value> {
    match &entry.stats {
        Some(block) => block.clone().into_flat(),
        None => GW_STAT_FIELDS
            .iter()
            .filter_map(|&field| {
                entry
                    .extra
                    .get(field)
                    .map(|v| (field.to_string(), v.clone()))
            })
            .collect(),
    }
}

/// Display name resolution: the canonical short name wins; otherwise first
/// and second names joined by a space, a missing second name reading as
/// empty. This order is load-bearing and mirrors the upstream data.
fn display_name(meta: &Element) -> String {
    match &meta.web_name {
        Some(web_name) if !web_name.is_empty() => web_name.clone(),
        _ => format!(
            "{} {}",
            meta.first_name.as_deref().unwrap_or(""),
            meta.second_name.as_deref().unwrap_or("")
        ),
    }
}

fn stat_i64(stats: &std::collections::BTreeMap<String, Value>, key: &str) -> i64 {
    stats.get(key).map(value_as_i64).unwrap_or(0)
}

fn stat_f64(stats: &std::collections::BTreeMap<String, Value>, key: &str) -> f64 {
    stats.get(key).map(value_as_f64).unwrap_or(0.0)
}

/// Coerce a stat value to an integer. The API serializes some numerics as
/// strings, so those parse through; anything unusable defaults to zero.
fn value_as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn value_as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
