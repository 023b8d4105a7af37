//! Invigilator duty rostering.
//!
//! Walks a seating plan slot by slot and staffs every occupied room with
//! two invigilators, ideally one faculty plus one staff. Room order is
//! shuffled per slot and the pool is reshuffled per room so duties
//! spread fairly across runs; a person never covers two rooms in the
//! same slot.
//!
//! Duty totals are capped at [`MAX_DUTIES`] per person. When a slot
//! cannot be staffed under that cap, it is relaxed to
//! [`MAX_DUTIES_RELAXED`] and the relaxation is recorded as a warning.
//! Rooms that still end up short-handed or without faculty are also
//! flagged, never silently under-staffed.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

use crate::error::PipelineError;
use crate::models::{
    DutyRoster, DutySummary, Invigilator, InvigilatorCategory, RoomDuty, SeatingPlan, SlotDuty,
};
use crate::validation::validate_roster_input;

/// Preferred duty cap per invigilator across the whole roster.
pub const MAX_DUTIES: u32 = 2;

/// Hard duty cap, used only when a slot cannot be staffed otherwise.
pub const MAX_DUTIES_RELAXED: u32 = 3;

/// Invigilators wanted per occupied room.
const CREW_SIZE: usize = 2;

/// Tracks duty totals and warnings across the run.
struct DutyLedger {
    duty_count: BTreeMap<String, u32>,
    warnings: Vec<String>,
}

impl DutyLedger {
    fn new() -> Self {
        Self {
            duty_count: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    fn duties(&self, name: &str) -> u32 {
        self.duty_count.get(name).copied().unwrap_or(0)
    }

    /// Picks the first pool member matching `category` (any when `None`)
    /// that is free this slot, trying the preferred cap before the
    /// relaxed one.
    fn pick(
        &mut self,
        pool: &[&Invigilator],
        assigned: &HashSet<String>,
        category: Option<InvigilatorCategory>,
        context: &str,
    ) -> Option<Invigilator> {
        for cap in [MAX_DUTIES, MAX_DUTIES_RELAXED] {
            let found = pool
                .iter()
                .find(|person| {
                    category.map_or(true, |c| person.category == c)
                        && !assigned.contains(&person.name)
                        && self.duties(&person.name) < cap
                })
                .copied();
            if let Some(person) = found {
                if cap == MAX_DUTIES_RELAXED {
                    self.warnings
                        .push(format!("duty cap relaxed for {} ({context})", person.name));
                }
                return Some(person.clone());
            }
        }
        None
    }

    fn record(&mut self, person: &Invigilator) {
        *self.duty_count.entry(person.name.clone()).or_insert(0) += 1;
    }
}

/// Rosters invigilators over every occupied room of a seating plan.
pub fn roster_duties<R: Rng>(
    plan: &SeatingPlan,
    invigilators: &[Invigilator],
    rng: &mut R,
) -> Result<DutyRoster, PipelineError> {
    validate_roster_input(invigilators).map_err(PipelineError::invalid_input)?;

    let mut ledger = DutyLedger::new();
    let mut days: BTreeMap<NaiveDate, Vec<SlotDuty>> = BTreeMap::new();

    for (date, slots) in &plan.days {
        let mut slot_duties = Vec::new();
        for result in slots {
            if result.arrangements.is_empty() {
                continue;
            }

            let mut rooms: Vec<(&str, &str)> = result
                .arrangements
                .iter()
                .map(|room| (room.room_id.as_str(), room.room_name.as_str()))
                .collect();
            rooms.shuffle(rng);
            let mut pool: Vec<&Invigilator> = invigilators.iter().collect();

            // One duty per person per slot, whichever room.
            let mut assigned: HashSet<String> = HashSet::new();
            let mut room_duties = BTreeMap::new();

            for (room_id, room_name) in rooms {
                // Fresh pool order per room, not per slot, so duties
                // within a slot spread across the whole pool.
                pool.shuffle(rng);
                let context = format!("{date} slot {} room {room_name}", result.slot_label);
                let mut crew = Vec::with_capacity(CREW_SIZE);

                if let Some(person) =
                    ledger.pick(&pool, &assigned, Some(InvigilatorCategory::Faculty), &context)
                {
                    assigned.insert(person.name.clone());
                    crew.push(person);
                }
                if let Some(person) =
                    ledger.pick(&pool, &assigned, Some(InvigilatorCategory::Staff), &context)
                {
                    assigned.insert(person.name.clone());
                    crew.push(person);
                }
                while crew.len() < CREW_SIZE {
                    match ledger.pick(&pool, &assigned, None, &context) {
                        Some(person) => {
                            assigned.insert(person.name.clone());
                            crew.push(person);
                        }
                        None => break,
                    }
                }

                if crew.len() < CREW_SIZE {
                    ledger.warnings.push(format!(
                        "only {} invigilator(s) for {context}",
                        crew.len()
                    ));
                }
                if !crew.iter().any(Invigilator::is_faculty) {
                    ledger
                        .warnings
                        .push(format!("no faculty available for {context}"));
                }

                for person in &crew {
                    ledger.record(person);
                }
                room_duties.insert(
                    room_id.to_string(),
                    RoomDuty {
                        room_name: room_name.to_string(),
                        invigilators: crew,
                    },
                );
            }

            slot_duties.push(SlotDuty {
                slot_label: result.slot_label.clone(),
                rooms: room_duties,
            });
        }
        if !slot_duties.is_empty() {
            days.insert(*date, slot_duties);
        }
    }

    let mut summary = DutySummary::default();
    for person in invigilators {
        let count = ledger.duties(&person.name);
        match person.category {
            InvigilatorCategory::Faculty => summary.faculty.insert(person.name.clone(), count),
            InvigilatorCategory::Staff => summary.staff.insert(person.name.clone(), count),
        };
    }

    if !ledger.warnings.is_empty() {
        tracing::warn!(warnings = ledger.warnings.len(), "roster has warnings");
    }

    Ok(DutyRoster {
        days,
        duty_count: ledger.duty_count,
        duty_summary: summary,
        warnings: ledger.warnings,
    })
}
