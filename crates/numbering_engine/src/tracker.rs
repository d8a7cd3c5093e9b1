//! Per-instance sequence tracking
//!
//! One `SequenceTracker` exists per concrete numbering instance for the
//! duration of a single resolution. It holds the counter of each level and a
//! logical clock used to decide lazy restarts: a level restarting "after level
//! L" resets only if some level at or above L was counted since its own last
//! reset.

use numbering_model::{
    DefinitionStore, LevelDefinition, LevelRestart, NumId, ParagraphId, TrackerSnapshot, MAX_LEVELS,
};

/// Mutable counters of one numbering instance
#[derive(Debug, Clone)]
pub struct SequenceTracker {
    num_id: NumId,
    counters: [u32; MAX_LEVELS],
    /// Incremented on every counted paragraph
    clock: u64,
    /// Clock value at which each level was last counted
    last_increment: [u64; MAX_LEVELS],
    /// Clock value at which each level was last reset
    last_reset: [u64; MAX_LEVELS],
    last_paragraph: Option<ParagraphId>,
}

impl SequenceTracker {
    /// Fresh tracker with every counter at zero
    pub fn new(num_id: NumId) -> Self {
        Self {
            num_id,
            counters: [0; MAX_LEVELS],
            clock: 0,
            last_increment: [0; MAX_LEVELS],
            last_reset: [0; MAX_LEVELS],
            last_paragraph: None,
        }
    }

    pub fn num_id(&self) -> NumId {
        self.num_id
    }

    /// Current counter of a level (0 = not counted since the last reset)
    pub fn counter(&self, level: u8) -> u32 {
        self.counters.get(level as usize).copied().unwrap_or(0)
    }

    /// The last paragraph this tracker counted
    pub fn last_paragraph(&self) -> Option<ParagraphId> {
        self.last_paragraph
    }

    /// Count one paragraph at `level_def.level` and return the actual number.
    ///
    /// Applies the level's own restart rule first, increments its counter,
    /// then resets deeper levels that restart on any shallower level. Deeper
    /// levels with an explicit restart level are reset lazily when they are
    /// next counted.
    pub fn count(
        &mut self,
        paragraph: ParagraphId,
        level_def: &LevelDefinition,
        store: &DefinitionStore,
    ) -> u32 {
        let level = level_def.level as usize;

        if self.should_restart(level_def) {
            self.reset(level);
        }

        self.clock += 1;
        self.counters[level] += 1;
        self.last_increment[level] = self.clock;
        self.last_paragraph = Some(paragraph);

        for deeper in (level + 1)..MAX_LEVELS {
            let rule = store
                .level_for(self.num_id, deeper as u8)
                .map(|l| l.restart)
                .unwrap_or_default();
            if rule == LevelRestart::AnyShallower {
                self.reset(deeper);
            }
        }

        let actual = level_def.start.saturating_add(self.counters[level] - 1);
        tracing::trace!(
            num_id = %self.num_id,
            level = level,
            counter = self.counters[level],
            actual = actual,
            "Counted {}",
            paragraph
        );
        actual
    }

    fn should_restart(&self, level_def: &LevelDefinition) -> bool {
        let level = level_def.level as usize;

        if let Some(period) = level_def.restart_period {
            if self.counters[level] >= period {
                return true;
            }
        }

        match level_def.restart {
            LevelRestart::AfterLevel(after) if level > 0 => {
                let bound = (after as usize).min(level - 1);
                (0..=bound).any(|l| self.last_increment[l] > self.last_reset[level])
            }
            LevelRestart::AfterLevel(_) | LevelRestart::AnyShallower | LevelRestart::Never => false,
        }
    }

    fn reset(&mut self, level: usize) {
        self.counters[level] = 0;
        self.last_reset[level] = self.clock;
    }

    /// Values of the levels above and at `level`, for composition.
    ///
    /// A shallower level that has not been counted reports its start value.
    pub fn snapshot(&self, level: u8, store: &DefinitionStore) -> TrackerSnapshot {
        let mut snapshot = TrackerSnapshot::new();

        for l in 0..=level.min(MAX_LEVELS as u8 - 1) {
            if let Some(def) = store.level_for(self.num_id, l) {
                let counter = self.counters[l as usize];
                let value = if counter == 0 {
                    def.start
                } else {
                    def.start.saturating_add(counter - 1)
                };
                snapshot.set(l, value, def.format);
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbering_model::{AbstractNumId, AbstractNumberingDefinition, ConcreteNumberingInstance, NumberFormat};

    fn store_with(levels: Vec<LevelDefinition>) -> DefinitionStore {
        let definition = levels
            .into_iter()
            .fold(AbstractNumberingDefinition::new(AbstractNumId::new(0)), |d, l| d.with_level(l));
        DefinitionStore::from_definitions(
            vec![definition],
            vec![ConcreteNumberingInstance::new(NumId::new(1), AbstractNumId::new(0))],
        )
        .unwrap()
    }

    fn count_levels(store: &DefinitionStore, levels: &[u8]) -> (SequenceTracker, Vec<u32>) {
        let mut tracker = SequenceTracker::new(NumId::new(1));
        let values = levels
            .iter()
            .enumerate()
            .map(|(i, &l)| {
                let def = store.level_for(NumId::new(1), l).unwrap().clone();
                tracker.count(ParagraphId::new(i), &def, store)
            })
            .collect();
        (tracker, values)
    }

    #[test]
    fn test_shallower_level_resets_deeper() {
        let store = store_with((0..3).map(LevelDefinition::new).collect());
        let (tracker, values) = count_levels(&store, &[0, 1, 1, 2, 0]);

        assert_eq!(values, vec![1, 1, 2, 1, 2]);
        assert_eq!(tracker.counter(2), 0);
        assert_eq!(tracker.counter(1), 0);
        assert_eq!(tracker.counter(0), 2);
        assert_eq!(tracker.last_paragraph(), Some(ParagraphId::new(4)));
    }

    #[test]
    fn test_never_restart_keeps_counting() {
        let store = store_with(vec![
            LevelDefinition::new(0),
            LevelDefinition::new(1).with_restart(LevelRestart::Never),
        ]);
        let (_, values) = count_levels(&store, &[0, 1, 1, 0, 1]);
        assert_eq!(values, vec![1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_restart_after_specific_level() {
        // Level 2 restarts only when level 0 is counted, not level 1
        let store = store_with(vec![
            LevelDefinition::new(0),
            LevelDefinition::new(1),
            LevelDefinition::new(2).with_restart(LevelRestart::AfterLevel(0)),
        ]);
        let (_, values) = count_levels(&store, &[0, 1, 2, 2, 1, 2, 0, 1, 2]);
        assert_eq!(values, vec![1, 1, 1, 2, 2, 3, 2, 1, 1]);
    }

    #[test]
    fn test_restart_period() {
        let mut level = LevelDefinition::new(0);
        level.restart_period = Some(3);
        let store = store_with(vec![level]);
        let (_, values) = count_levels(&store, &[0, 0, 0, 0, 0]);
        assert_eq!(values, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_start_value_offsets_counter() {
        let store = store_with(vec![LevelDefinition::new(0).with_start(5)]);
        let (_, values) = count_levels(&store, &[0, 0]);
        assert_eq!(values, vec![5, 6]);
    }

    #[test]
    fn test_snapshot_uses_start_for_uncounted_levels() {
        let store = store_with(vec![
            LevelDefinition::numbered(0, NumberFormat::UpperRoman).with_start(3),
            LevelDefinition::new(1),
        ]);
        let (tracker, _) = count_levels(&store, &[1]);
        let snapshot = tracker.snapshot(1, &store);

        let parent = snapshot.get(0).unwrap();
        assert_eq!(parent.value, 3);
        assert_eq!(parent.format, NumberFormat::UpperRoman);
        assert_eq!(snapshot.get(1).unwrap().value, 1);
    }
}
