//! Candidate solutions and variation operators.
//!
//! A candidate is one slot assignment per course, `None` for unplaced.
//! The operators are free functions over an injected `Rng`, so runs are
//! reproducible from a seed.

use rand::Rng;

use crate::models::ExamSlot;

/// One member of the search population.
#[derive(Debug, Clone)]
pub struct CandidateSolution {
    /// Placement per course, indexed like the input course list.
    pub slots: Vec<Option<ExamSlot>>,
    /// Cached conflict score; `INFINITY` until evaluated.
    pub fitness: f64,
}

impl CandidateSolution {
    /// A fully random candidate: every course placed somewhere.
    pub fn random<R: Rng>(num_courses: usize, num_days: usize, num_slots: usize, rng: &mut R) -> Self {
        let slots = (0..num_courses)
            .map(|_| {
                Some(ExamSlot::new(
                    rng.random_range(0..num_days),
                    rng.random_range(0..num_slots),
                ))
            })
            .collect();
        Self {
            slots,
            fitness: f64::INFINITY,
        }
    }

    /// Compact key for fitness caching. Unplaced genes encode as (-1, -1).
    pub fn cache_key(&self) -> Vec<(i16, i16)> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(s) => (s.day as i16, s.slot as i16),
                None => (-1, -1),
            })
            .collect()
    }

    /// Courses this candidate leaves unplaced.
    pub fn unscheduled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }
}

/// Gene-wise crossover.
///
/// A placed gene always beats an unplaced one; when both parents agree on
/// placement status, the first parent wins with probability 0.55.
pub fn crossover<R: Rng>(
    parent1: &CandidateSolution,
    parent2: &CandidateSolution,
    rng: &mut R,
) -> CandidateSolution {
    let slots = parent1
        .slots
        .iter()
        .zip(&parent2.slots)
        .map(|(g1, g2)| match (g1, g2) {
            (Some(_), None) => *g1,
            (None, Some(_)) => *g2,
            _ => {
                if rng.random_bool(0.55) {
                    *g1
                } else {
                    *g2
                }
            }
        })
        .collect();
    CandidateSolution {
        slots,
        fitness: f64::INFINITY,
    }
}

/// Mutates one to three genes in place and invalidates the fitness.
///
/// An unplaced gene is rescheduled with probability 0.8. A placed gene
/// moves with probability 0.95 — jumping anywhere with probability
/// `strength`, otherwise nudging one day or one slot with wraparound —
/// and is dropped to unplaced the remaining 5% of the time. Nudges that
/// land on a weekend day are usually shoved to the following Monday.
pub fn mutate<R: Rng>(
    candidate: &mut CandidateSolution,
    strength: f64,
    num_days: usize,
    num_slots: usize,
    rng: &mut R,
) {
    let genes = rng.random_range(1..=3);
    for _ in 0..genes {
        let idx = rng.random_range(0..candidate.slots.len());
        candidate.slots[idx] = match candidate.slots[idx] {
            None => {
                if rng.random_bool(0.8) {
                    Some(random_slot(num_days, num_slots, rng))
                } else {
                    None
                }
            }
            Some(current) => {
                if rng.random_bool(0.95) {
                    if rng.random_bool(strength.clamp(0.0, 1.0)) {
                        Some(random_slot(num_days, num_slots, rng))
                    } else {
                        Some(nudge(current, num_days, num_slots, rng))
                    }
                } else {
                    None
                }
            }
        };
    }
    candidate.fitness = f64::INFINITY;
}

fn random_slot<R: Rng>(num_days: usize, num_slots: usize, rng: &mut R) -> ExamSlot {
    ExamSlot::new(rng.random_range(0..num_days), rng.random_range(0..num_slots))
}

/// Local move: step one day or one slot with wraparound. A day step onto
/// Saturday or Sunday (day index mod 7 of 5 or 6) is shoved two days
/// forward with probability 0.7.
fn nudge<R: Rng>(slot: ExamSlot, num_days: usize, num_slots: usize, rng: &mut R) -> ExamSlot {
    if rng.random_bool(0.5) {
        let step: isize = if rng.random_bool(0.5) { 1 } else { -1 };
        let mut day = (slot.day as isize + step).rem_euclid(num_days as isize) as usize;
        if day % 7 >= 5 && rng.random_bool(0.7) {
            day = (day + 2) % num_days;
        }
        ExamSlot::new(day, slot.slot)
    } else {
        let step: isize = if rng.random_bool(0.5) { 1 } else { -1 };
        let s = (slot.slot as isize + step).rem_euclid(num_slots as isize) as usize;
        ExamSlot::new(slot.day, s)
    }
}

/// Population diversity in 0..=1: mean fraction of differing genes over
/// up to ten randomly sampled pairs.
pub fn population_diversity<R: Rng>(population: &[CandidateSolution], rng: &mut R) -> f64 {
    if population.len() < 2 {
        return 0.0;
    }
    let genes = population[0].slots.len();
    if genes == 0 {
        return 0.0;
    }

    let samples = 10;
    let mut total = 0.0;
    for _ in 0..samples {
        let a = rng.random_range(0..population.len());
        let mut b = rng.random_range(0..population.len());
        while b == a {
            b = rng.random_range(0..population.len());
        }
        let differing = population[a]
            .slots
            .iter()
            .zip(&population[b].slots)
            .filter(|(x, y)| x != y)
            .count();
        total += differing as f64 / genes as f64;
    }
    total / samples as f64
}
