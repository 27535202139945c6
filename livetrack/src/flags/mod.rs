//! Flag state resolution from race-control messages.
//!
//! Race control emits an append-only message stream; arrival order is not
//! chronological order, and yellow/clear events for the same sector may
//! interleave. [`affected_sectors`] reduces the whole history to the set of
//! sector numbers currently under caution.
//!
//! The result is recomputed from scratch on every call. Message volume is
//! low, so a full O(n log n) pass per evaluation buys correctness with no
//! incremental state to invalidate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Upper bound used when a track-wide caution is in effect.
///
/// The resolver does not know the real sector count of the current circuit,
/// so a track-scoped flag marks sectors `0..TRACK_WIDE_SECTOR_SPAN` as
/// affected. This is a deliberate approximation: membership tests only ever
/// probe real sector numbers, and no circuit has anywhere near this many
/// marshal sectors.
pub const TRACK_WIDE_SECTOR_SPAN: u32 = 100;

/// Flags the resolver cares about; anything else is [`Flag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yellow,
    DoubleYellow,
    Clear,
    Other,
}

impl Flag {
    /// Parses the feed's flag string; unknown flags become [`Flag::Other`].
    pub fn from_wire(s: &str) -> Self {
        match s {
            "YELLOW" => Flag::Yellow,
            "DOUBLE YELLOW" => Flag::DoubleYellow,
            "CLEAR" => Flag::Clear,
            _ => Flag::Other,
        }
    }
}

impl<'de> serde::Deserialize<'de> for Flag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Flag::from_wire(&s))
    }
}

/// Scope of a race-control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    Track,
    Sector,
    Other,
}

impl MessageScope {
    /// Parses the feed's scope string; unknown scopes become
    /// [`MessageScope::Other`].
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Track" => MessageScope::Track,
            "Sector" => MessageScope::Sector,
            _ => MessageScope::Other,
        }
    }
}

impl<'de> serde::Deserialize<'de> for MessageScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(MessageScope::from_wire(&s))
    }
}

/// A single race-control message as delivered on the live feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RaceControlMessage {
    pub utc: DateTime<Utc>,
    #[serde(default)]
    pub flag: Option<Flag>,
    #[serde(default)]
    pub scope: Option<MessageScope>,
    #[serde(default)]
    pub sector: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RaceControlMessage {
    fn relevant_flag(&self) -> Option<Flag> {
        match self.flag {
            Some(f @ (Flag::Yellow | Flag::DoubleYellow | Flag::Clear)) => Some(f),
            _ => None,
        }
    }
}

/// Resolves the set of sector numbers currently under caution.
///
/// Messages are stably sorted by `utc` (equal timestamps keep arrival
/// order), filtered to yellow/double-yellow/clear flags, then scanned once:
///
/// * A `Track`-scoped non-clear flag wins outright: the full
///   `0..TRACK_WIDE_SECTOR_SPAN` span is returned immediately, regardless of
///   any earlier per-sector clears.
/// * A `Sector`-scoped clear retracts any earlier yellow for that sector
///   and makes the sector deaf for the rest of the scan; a later yellow in
///   the same pass is not re-applied.
/// * A `Sector`-scoped yellow on a not-yet-cleared sector marks it affected.
///
/// An empty or irrelevant message history resolves to the empty set; absence
/// of caution data means a clear track, never an error.
pub fn affected_sectors(messages: &[RaceControlMessage]) -> BTreeSet<u32> {
    let mut relevant: Vec<(&RaceControlMessage, Flag)> = messages
        .iter()
        .filter_map(|m| m.relevant_flag().map(|f| (m, f)))
        .collect();
    // Vec::sort_by_key is stable; ties on utc keep arrival order.
    relevant.sort_by_key(|(m, _)| m.utc);

    let mut cleared: BTreeSet<u32> = BTreeSet::new();
    let mut affected: BTreeSet<u32> = BTreeSet::new();

    for (msg, flag) in relevant {
        match msg.scope {
            Some(MessageScope::Track) if flag != Flag::Clear => {
                debug!(utc = %msg.utc, ?flag, "Track-wide caution, flagging all sectors");
                return (0..TRACK_WIDE_SECTOR_SPAN).collect();
            }
            Some(MessageScope::Sector) => {
                let Some(sector) = msg.sector else { continue };
                if cleared.contains(&sector) {
                    continue;
                }
                if flag == Flag::Clear {
                    // Retract any earlier yellow and make the sector deaf
                    // for the rest of the pass.
                    cleared.insert(sector);
                    affected.remove(&sector);
                } else {
                    affected.insert(sector);
                }
            }
            _ => {}
        }
    }

    debug!(affected = affected.len(), "Resolved flag state");
    affected
}
