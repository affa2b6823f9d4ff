//! Data collection for statistics.
//!
//! Fetches a consistent snapshot of an owner's habits and all of their
//! completions, then runs the engine over every habit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::engine::compute_stats;
use crate::core::{DayBoundary, HabitStore};
use crate::error::HabitError;
use crate::habits::{Habit, HabitId, HabitWithStats};

/// A snapshot of one owner's habits and completions.
#[derive(Debug, Clone, Default)]
pub struct CollectedData {
    /// Habits, newest first
    pub habits: Vec<Habit>,
    /// Completion instants per habit
    pub completions: HashMap<HabitId, Vec<DateTime<Utc>>>,
}

impl CollectedData {
    /// Completion instants for one habit.
    #[must_use]
    pub fn completions_for(&self, id: &HabitId) -> &[DateTime<Utc>] {
        self.completions.get(id).map_or(&[], Vec::as_slice)
    }

    /// Every completion instant across all habits.
    pub fn all_completions(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.completions.values().flatten().copied()
    }

    /// Run the statistics engine over every habit.
    #[must_use]
    pub fn habits_with_stats(&self, now: DateTime<Utc>, boundary: &DayBoundary) -> Vec<HabitWithStats> {
        self.habits
            .iter()
            .map(|habit| {
                let stats = compute_stats(habit, self.completions_for(&habit.id), now, boundary);
                HabitWithStats::new(habit.clone(), stats)
            })
            .collect()
    }
}

/// Collects habit data from a store.
pub struct StatsCollector<'a, S: HabitStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: HabitStore + ?Sized> StatsCollector<'a, S> {
    /// Create a new stats collector.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch habits and then all their completions in one request.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged; nothing partial is returned.
    pub fn collect(&self, owner: &str) -> Result<CollectedData, HabitError> {
        let habits = self.store.list_habits(owner)?;
        let ids: Vec<HabitId> = habits.iter().map(|h| h.id.clone()).collect();

        let mut completions: HashMap<HabitId, Vec<DateTime<Utc>>> = HashMap::new();
        if !ids.is_empty() {
            for completion in self.store.list_completions(&ids)? {
                completions
                    .entry(completion.habit_id)
                    .or_default()
                    .push(completion.completed_at);
            }
        }

        debug!(
            owner,
            habits = habits.len(),
            completions = completions.values().map(Vec::len).sum::<usize>(),
            "collected habit snapshot"
        );

        Ok(CollectedData { habits, completions })
    }

    /// Collect and compute statistics in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn habits_with_stats(
        &self,
        owner: &str,
        now: DateTime<Utc>,
        boundary: &DayBoundary,
    ) -> Result<Vec<HabitWithStats>, HabitError> {
        Ok(self.collect(owner)?.habits_with_stats(now, boundary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHabitStore;
    use crate::habits::{Completion, Frequency, DEFAULT_HABIT_COLOR, DEFAULT_REMINDER_TIME};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn habit(id: &str, frequency: Frequency) -> Habit {
        Habit {
            id: HabitId::new(id),
            owner: "alice".to_string(),
            name: format!("Habit {id}"),
            description: None,
            target_frequency: frequency,
            color: DEFAULT_HABIT_COLOR.to_string(),
            reminder_enabled: false,
            reminder_time: DEFAULT_REMINDER_TIME.to_string(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn completion(id: &str, habit_id: &str, at: DateTime<Utc>) -> Completion {
        Completion {
            id: id.to_string(),
            habit_id: HabitId::new(habit_id),
            completed_at: at,
        }
    }

    #[test]
    fn test_collect_groups_completions_per_habit() {
        let mut store = MockHabitStore::new();
        store
            .expect_list_habits()
            .withf(|owner| owner == "alice")
            .returning(|_| Ok(vec![habit("1", Frequency::Daily), habit("2", Frequency::Weekly)]));
        store
            .expect_list_completions()
            .times(1)
            .withf(|ids| ids.len() == 2)
            .returning(|_| {
                Ok(vec![
                    completion("c1", "1", now()),
                    completion("c2", "1", now() - Duration::days(1)),
                    completion("c3", "2", now() - Duration::days(3)),
                ])
            });

        let collector = StatsCollector::new(&store);
        let data = collector.collect("alice").unwrap();

        assert_eq!(data.habits.len(), 2);
        assert_eq!(data.completions_for(&HabitId::new("1")).len(), 2);
        assert_eq!(data.completions_for(&HabitId::new("2")).len(), 1);
        assert_eq!(data.all_completions().count(), 3);

        let with_stats = data.habits_with_stats(now(), &DayBoundary::utc());
        assert_eq!(with_stats[0].stats.current_streak, 2);
        assert!(with_stats[0].stats.is_completed_today);
        assert_eq!(with_stats[1].stats.current_streak, 0);
        assert_eq!(with_stats[1].stats.completion_rate, 25.0);
    }

    #[test]
    fn test_no_habits_skips_completion_fetch() {
        let mut store = MockHabitStore::new();
        store.expect_list_habits().returning(|_| Ok(vec![]));
        store.expect_list_completions().never();

        let collector = StatsCollector::new(&store);
        let habits = collector
            .habits_with_stats("alice", now(), &DayBoundary::utc())
            .unwrap();
        assert!(habits.is_empty());
    }

    #[test]
    fn test_habit_without_completions_gets_zero_stats() {
        let mut store = MockHabitStore::new();
        store
            .expect_list_habits()
            .returning(|_| Ok(vec![habit("9", Frequency::Daily)]));
        store.expect_list_completions().returning(|_| Ok(vec![]));

        let collector = StatsCollector::new(&store);
        let habits = collector
            .habits_with_stats("alice", now(), &DayBoundary::utc())
            .unwrap();
        assert_eq!(habits[0].stats.total_completions, 0);
        assert_eq!(habits[0].stats.longest_streak, 0);
    }

    #[test]
    fn test_store_failure_is_propagated() {
        let mut store = MockHabitStore::new();
        store
            .expect_list_habits()
            .returning(|_| Ok(vec![habit("1", Frequency::Daily)]));
        store
            .expect_list_completions()
            .returning(|_| Err(HabitError::Database("connection lost".to_string())));

        let collector = StatsCollector::new(&store);
        let result = collector.habits_with_stats("alice", now(), &DayBoundary::utc());
        assert!(matches!(result, Err(HabitError::Database(_))));
    }
}
