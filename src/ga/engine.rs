//! Generational search loop.
//!
//! Evolves a population of course→slot assignments against the conflict
//! model: elitism, tournament selection, gene-wise crossover, and a
//! diversity-adaptive mutation rate. Fitness evaluation fans out over a
//! dedicated worker pool in batches, backed by the shared fitness cache.
//!
//! Runs are reproducible: with a fixed seed, the outcome is independent
//! of the worker count, because evaluation only fills in scores and all
//! randomness flows through one main-thread generator.
//!
//! # Reference
//!
//! - Burke & Newall (1999), "A Multistage Evolutionary Algorithm for the
//!   Timetable Problem"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::ga::cache::FitnessCache;
use crate::ga::conflict::{conflict_penalty, CourseRosters};
use crate::ga::solution::{crossover, mutate, population_diversity, CandidateSolution};
use crate::models::{Course, DayUtilization, ExamCalendar, ScheduledExam, Timetable, TimetableStats};
use crate::validation::validate_synthesis_input;

/// Tuning knobs for the synthesizer.
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// Population size.
    pub population_size: usize,
    /// Generation cap; values below 1 are treated as 1.
    pub max_generations: usize,
    /// Candidates carried over unchanged each generation.
    pub elite_count: usize,
    /// Starting mutation rate; adapted from population diversity.
    pub base_mutation_rate: f64,
    /// Fitness cache capacity in assignments.
    pub cache_capacity: usize,
    /// Best fitness below this stops the search early.
    pub solved_threshold: f64,
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Worker threads for fitness evaluation; `None` sizes from the host.
    pub workers: Option<usize>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            elite_count: 10,
            base_mutation_rate: 0.5,
            cache_capacity: 5000,
            solved_threshold: 1000.0,
            seed: None,
            workers: None,
        }
    }
}

impl SynthesizerConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the early-stop threshold.
    pub fn with_solved_threshold(mut self, threshold: f64) -> Self {
        self.solved_threshold = threshold;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fixes the worker thread count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}

/// Result of one synthesis run.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// The best timetable found.
    pub timetable: Timetable,
    /// Conflict score of that timetable.
    pub best_fitness: f64,
    /// Generations actually run.
    pub generations: usize,
}

/// Runs the genetic search and shapes the best candidate into a timetable.
pub fn synthesize_timetable(
    courses: &[Course],
    calendar: &ExamCalendar,
    config: &SynthesizerConfig,
) -> Result<SynthesisOutcome, PipelineError> {
    validate_synthesis_input(courses, calendar).map_err(PipelineError::invalid_input)?;

    let rosters = CourseRosters::from_courses(courses);
    let num_days = calendar.num_days();
    let num_slots = calendar.slots_per_day;

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let workers = config.workers.unwrap_or_else(default_workers).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let cache = FitnessCache::new(config.cache_capacity);

    let pop_size = config.population_size.max(2);
    let max_generations = config.max_generations.max(1);
    let elite_count = config.elite_count.min(pop_size);
    let batch = (pop_size / (workers * 2)).max(5);
    let tournament = (pop_size / 5).max(2);
    let mut mutation_rate = config.base_mutation_rate.clamp(0.1, 0.9);

    let mut population: Vec<CandidateSolution> = (0..pop_size)
        .map(|_| CandidateSolution::random(courses.len(), num_days, num_slots, &mut rng))
        .collect();
    let mut best: Option<CandidateSolution> = None;
    let mut generations_run = 0;

    for generation in 0..max_generations {
        evaluate(&pool, &mut population, &rosters, num_days, num_slots, &cache, batch);
        population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        generations_run = generation + 1;

        if best
            .as_ref()
            .map(|b| population[0].fitness < b.fitness)
            .unwrap_or(true)
        {
            best = Some(population[0].clone());
        }
        let best_fitness = best.as_ref().map(|b| b.fitness).unwrap_or(f64::INFINITY);

        if generation % 10 == 0 {
            tracing::debug!(
                generation,
                best_fitness,
                mutation_rate,
                cached = cache.len(),
                "generation complete"
            );
        }

        if best_fitness < config.solved_threshold {
            tracing::debug!(generation, best_fitness, "solved threshold reached");
            break;
        }
        if generation + 1 == max_generations {
            break;
        }

        let diversity = population_diversity(&population, &mut rng);
        mutation_rate = adjust_mutation_rate(mutation_rate, diversity);

        let mut next = population[..elite_count].to_vec();
        while next.len() < pop_size {
            let p1 = tournament_select(&population, tournament, &mut rng);
            let p2 = tournament_select(&population, tournament, &mut rng);
            let mut child = crossover(&population[p1], &population[p2], &mut rng);
            if rng.random_bool(mutation_rate) {
                mutate(&mut child, mutation_rate, num_days, num_slots, &mut rng);
            }
            next.push(child);
        }
        population = next;
    }

    let best = best.unwrap_or_else(|| population[0].clone());
    tracing::info!(
        best_fitness = best.fitness,
        generations = generations_run,
        unscheduled = best.unscheduled_count(),
        "synthesis finished"
    );

    Ok(SynthesisOutcome {
        timetable: build_timetable(&best, courses, calendar),
        best_fitness: best.fitness,
        generations: generations_run,
    })
}

/// Worker count when unconfigured: one less than the host parallelism,
/// clamped to 1..=4.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .clamp(1, 4)
}

/// Scores every unevaluated candidate, in batches over the pool.
///
/// Non-finite scores are coerced to `INFINITY` so sorting stays total.
fn evaluate(
    pool: &rayon::ThreadPool,
    population: &mut [CandidateSolution],
    rosters: &CourseRosters,
    num_days: usize,
    num_slots: usize,
    cache: &FitnessCache,
    batch: usize,
) {
    pool.install(|| {
        population.par_chunks_mut(batch).for_each(|chunk| {
            for candidate in chunk {
                if candidate.fitness.is_finite() {
                    continue;
                }
                let key = candidate.cache_key();
                if let Some(score) = cache.get(&key) {
                    candidate.fitness = score;
                    continue;
                }
                let mut score = conflict_penalty(&candidate.slots, rosters, num_days, num_slots);
                if !score.is_finite() {
                    score = f64::INFINITY;
                }
                candidate.fitness = score;
                if score.is_finite() {
                    cache.insert(key, score);
                }
            }
        });
    });
}

/// Picks the fittest of `size` uniformly sampled candidates.
fn tournament_select<R: Rng>(population: &[CandidateSolution], size: usize, rng: &mut R) -> usize {
    let mut winner = rng.random_range(0..population.len());
    for _ in 1..size {
        let contender = rng.random_range(0..population.len());
        if population[contender].fitness < population[winner].fitness {
            winner = contender;
        }
    }
    winner
}

/// Diversity feedback: low diversity heats the mutation rate up, high
/// diversity cools it down.
fn adjust_mutation_rate(rate: f64, diversity: f64) -> f64 {
    if diversity < 0.2 {
        (rate * 1.5).min(0.9)
    } else if diversity > 0.8 {
        (rate * 0.8).max(0.1)
    } else {
        rate
    }
}

/// Shapes the winning candidate into the timetable artifact. Every
/// calendar date appears, even when no exam landed on it.
fn build_timetable(
    best: &CandidateSolution,
    courses: &[Course],
    calendar: &ExamCalendar,
) -> Timetable {
    let mut days: BTreeMap<_, Vec<Vec<ScheduledExam>>> = calendar
        .dates
        .iter()
        .map(|date| (*date, vec![Vec::new(); calendar.slots_per_day]))
        .collect();

    let mut scheduled = 0;
    for (course, slot) in courses.iter().zip(&best.slots) {
        if let Some(s) = slot {
            if let Some(slots) = calendar.date(s.day).and_then(|date| days.get_mut(&date)) {
                slots[s.slot].push(ScheduledExam {
                    code: course.code.clone(),
                    name: course.name.clone(),
                    students: course.students.clone(),
                });
                scheduled += 1;
            }
        }
    }

    let slot_utilization = days
        .iter()
        .map(|(date, slots)| DayUtilization {
            date: *date,
            counts: slots.iter().map(Vec::len).collect(),
        })
        .collect();

    Timetable {
        days,
        stats: TimetableStats {
            total_courses: courses.len(),
            scheduled_courses: scheduled,
            unscheduled_courses: courses.len() - scheduled,
            num_days: calendar.num_days(),
            num_slots: calendar.slots_per_day,
            slot_utilization,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn calendar(days: usize, slots: usize) -> ExamCalendar {
        let dates = (0..days)
            .map(|i| NaiveDate::from_ymd_opt(2025, 4, 1 + i as u32).unwrap())
            .collect();
        ExamCalendar::new(dates, slots)
    }

    fn disjoint_courses(n: usize) -> Vec<Course> {
        (0..n)
            .map(|i| {
                Course::new(format!("C{i:02}"), format!("Course {i}"))
                    .with_students([format!("s{i}a"), format!("s{i}b")])
            })
            .collect()
    }

    fn small_config() -> SynthesizerConfig {
        SynthesizerConfig::new()
            .with_population_size(30)
            .with_max_generations(60)
            .with_elite_count(4)
            .with_seed(42)
            .with_workers(2)
    }

    #[test]
    fn test_rejects_invalid_input() {
        let err = synthesize_timetable(&[], &calendar(3, 2), &small_config()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }

    #[test]
    fn test_schedules_disjoint_courses() {
        // No shared students, ample slots: the search should place
        // everything and stop under the solved threshold.
        let courses = disjoint_courses(6);
        let outcome = synthesize_timetable(&courses, &calendar(4, 3), &small_config()).unwrap();

        assert_eq!(outcome.timetable.stats.total_courses, 6);
        assert_eq!(outcome.timetable.stats.unscheduled_courses, 0);
        assert!(outcome.best_fitness < 75_000.0);
        for course in &courses {
            assert!(outcome.timetable.placement_of(&course.code).is_some());
        }
    }

    #[test]
    fn test_every_calendar_date_present() {
        let courses = disjoint_courses(2);
        let outcome = synthesize_timetable(&courses, &calendar(5, 2), &small_config()).unwrap();

        assert_eq!(outcome.timetable.days.len(), 5);
        for slots in outcome.timetable.days.values() {
            assert_eq!(slots.len(), 2);
        }
        assert_eq!(outcome.timetable.stats.slot_utilization.len(), 5);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let courses = disjoint_courses(5);
        let cal = calendar(3, 2);

        let a = synthesize_timetable(&courses, &cal, &small_config()).unwrap();
        let b = synthesize_timetable(&courses, &cal, &small_config()).unwrap();

        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.generations, b.generations);
        for course in &courses {
            assert_eq!(
                a.timetable.placement_of(&course.code),
                b.timetable.placement_of(&course.code)
            );
        }
    }

    #[test]
    fn test_worker_count_does_not_change_outcome() {
        let courses = disjoint_courses(5);
        let cal = calendar(3, 2);

        let a = synthesize_timetable(&courses, &cal, &small_config().with_workers(1)).unwrap();
        let b = synthesize_timetable(&courses, &cal, &small_config().with_workers(4)).unwrap();

        assert_eq!(a.best_fitness, b.best_fitness);
        for course in &courses {
            assert_eq!(
                a.timetable.placement_of(&course.code),
                b.timetable.placement_of(&course.code)
            );
        }
    }

    #[test]
    fn test_adjust_mutation_rate_bounds() {
        assert_eq!(adjust_mutation_rate(0.5, 0.1), 0.75);
        assert_eq!(adjust_mutation_rate(0.8, 0.1), 0.9);
        assert_eq!(adjust_mutation_rate(0.5, 0.9), 0.4);
        assert_eq!(adjust_mutation_rate(0.1, 0.9), 0.1);
        assert_eq!(adjust_mutation_rate(0.5, 0.5), 0.5);
    }

    #[test]
    fn test_stats_utilization_sums_to_scheduled() {
        let courses = disjoint_courses(6);
        let outcome = synthesize_timetable(&courses, &calendar(4, 3), &small_config()).unwrap();

        let placed: usize = outcome
            .timetable
            .stats
            .slot_utilization
            .iter()
            .flat_map(|d| d.counts.iter())
            .sum();
        assert_eq!(placed, outcome.timetable.stats.scheduled_courses);
    }
}
