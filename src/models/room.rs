//! Room and section-capacity models.
//!
//! Every room is split into four named sections A–D for seating. Section
//! capacities come from an optional per-room profile table; rooms without
//! a profile split their catalog capacity evenly across the four sections,
//! with any remainder going to A, B, C in that order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An exam room as supplied by the room catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Catalog identifier.
    pub id: String,
    /// Room name (e.g., "H-101").
    pub name: String,
    /// Total seat count from the catalog.
    pub capacity: u32,
    /// Building block (e.g., "H").
    pub block: String,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        let name = name.into();
        let block = name.split_whitespace().next().unwrap_or("Unknown").to_string();
        Self {
            id: id.into(),
            name,
            capacity,
            block,
        }
    }

    /// Overrides the building block.
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = block.into();
        self
    }
}

/// One of the four named sections within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionId {
    A,
    B,
    C,
    D,
}

impl SectionId {
    /// All sections in seating priority order.
    pub const ALL: [SectionId; 4] = [SectionId::A, SectionId::B, SectionId::C, SectionId::D];

    /// Sections eligible in the first seating pass.
    pub const FIRST_PASS: [SectionId; 3] = [SectionId::A, SectionId::B, SectionId::C];

    /// Index into a `[_; 4]` array of per-section data.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            SectionId::A => 'A',
            SectionId::B => 'B',
            SectionId::C => 'C',
            SectionId::D => 'D',
        };
        write!(f, "{c}")
    }
}

/// Per-room seating profile: section capacities and a preference rank.
///
/// Lower `preference_order` means the room fills earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomProfile {
    /// Section capacities indexed A, B, C, D.
    pub section_capacities: [u32; 4],
    /// Preference rank; lower fills first.
    pub preference_order: u32,
    /// Total seat count for utilization reporting.
    pub total_capacity: u32,
}

impl RoomProfile {
    /// Creates a profile with explicit section capacities.
    pub fn new(sections: [u32; 4], preference_order: u32) -> Self {
        Self {
            section_capacities: sections,
            preference_order,
            total_capacity: sections.iter().sum(),
        }
    }

    /// Fallback split of a catalog capacity into four sections.
    ///
    /// The remainder after dividing by four goes to A, B, C in order,
    /// never to the backup section D.
    pub fn split_evenly(capacity: u32) -> [u32; 4] {
        let base = capacity / 4;
        let rem = capacity % 4;
        [
            base + u32::from(rem > 0),
            base + u32::from(rem > 1),
            base + u32::from(rem > 2),
            base,
        ]
    }
}

/// Room profiles keyed by room name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomProfileTable {
    profiles: HashMap<String, RoomProfile>,
}

impl RoomProfileTable {
    /// Creates an empty table (all rooms use the even-split fallback).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile for a room name.
    pub fn with_profile(mut self, room_name: impl Into<String>, profile: RoomProfile) -> Self {
        self.profiles.insert(room_name.into(), profile);
        self
    }

    /// The profile for a room, if registered.
    pub fn profile(&self, room_name: &str) -> Option<&RoomProfile> {
        self.profiles.get(room_name)
    }

    /// Section capacity for a room, falling back to the even split of the
    /// catalog capacity.
    pub fn section_capacity(&self, room_name: &str, section: SectionId, catalog_capacity: u32) -> u32 {
        match self.profiles.get(room_name) {
            Some(p) => p.section_capacities[section.index()],
            None => RoomProfile::split_evenly(catalog_capacity)[section.index()],
        }
    }

    /// All four section capacities for a room.
    pub fn section_capacities(&self, room_name: &str, catalog_capacity: u32) -> [u32; 4] {
        match self.profiles.get(room_name) {
            Some(p) => p.section_capacities,
            None => RoomProfile::split_evenly(catalog_capacity),
        }
    }

    /// Total capacity for a room: profile total when known, else catalog.
    pub fn total_capacity(&self, room_name: &str, catalog_capacity: u32) -> u32 {
        match self.profiles.get(room_name) {
            Some(p) => p.total_capacity,
            None => catalog_capacity,
        }
    }

    /// Preference rank for a room; `None` means unranked (fills last).
    pub fn preference_rank(&self, room_name: &str) -> Option<u32> {
        self.profiles.get(room_name).map(|p| p.preference_order)
    }
}
