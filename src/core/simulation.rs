/// Seeded synthetic readers, for exercising the learning loop without
/// real telemetry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::schema::content::ContentType;
use crate::schema::pattern::ReadingEvent;

/// How a synthetic reader behaves on one content type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReaderHabit {
    pub wpm: f64,
    pub dwell_seconds: f64,
}

/// A synthetic reader with per-type habits and multiplicative noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedReader {
    pub habits: FxHashMap<ContentType, ReaderHabit>,
    /// Relative jitter, e.g. 0.2 for ±20%.
    pub noise: f64,
}

impl SimulatedReader {
    /// A reader who skims description and lingers on dialogue and plot.
    pub fn skimmer() -> Self {
        let mut habits = FxHashMap::default();
        habits.insert(ContentType::Description, ReaderHabit { wpm: 450.0, dwell_seconds: 2.0 });
        habits.insert(ContentType::Action, ReaderHabit { wpm: 260.0, dwell_seconds: 5.0 });
        habits.insert(ContentType::Dialogue, ReaderHabit { wpm: 180.0, dwell_seconds: 9.0 });
        habits.insert(ContentType::PlotCritical, ReaderHabit { wpm: 120.0, dwell_seconds: 14.0 });
        Self { habits, noise: 0.2 }
    }

    /// A reader who reads everything at the same steady pace.
    pub fn steady(wpm: f64, dwell_seconds: f64) -> Self {
        let habits = ContentType::ALL
            .iter()
            .map(|ct| (*ct, ReaderHabit { wpm, dwell_seconds }))
            .collect();
        Self { habits, noise: 0.0 }
    }
}

/// Generates reading events from a `SimulatedReader`.
pub struct ReadingSimulator {
    reader: SimulatedReader,
    rng: StdRng,
}

impl ReadingSimulator {
    pub fn new(reader: SimulatedReader, seed: u64) -> Self {
        Self {
            reader,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One event for `content_type`, or `None` if the reader has no habit
    /// for it.
    pub fn next_event(&mut self, content_type: ContentType) -> Option<ReadingEvent> {
        let habit = *self.reader.habits.get(&content_type)?;
        let noise = self.reader.noise.abs();
        let (wpm_jitter, dwell_jitter) = if noise > 0.0 {
            (
                self.rng.gen_range(-noise..=noise),
                self.rng.gen_range(-noise..=noise),
            )
        } else {
            (0.0, 0.0)
        };

        Some(ReadingEvent {
            content_type,
            observed_wpm: (habit.wpm * (1.0 + wpm_jitter)).max(0.0),
            dwell_time_seconds: (habit.dwell_seconds * (1.0 + dwell_jitter)).max(0.0),
        })
    }

    /// A session of `count` events cycling through every content type the
    /// reader has a habit for, in `ContentType::ALL` order.
    pub fn session(&mut self, count: usize) -> Vec<ReadingEvent> {
        let types: Vec<ContentType> = ContentType::ALL
            .iter()
            .copied()
            .filter(|ct| self.reader.habits.contains_key(ct))
            .collect();
        if types.is_empty() {
            return Vec::new();
        }
        (0..count)
            .filter_map(|i| self.next_event(types[i % types.len()]))
            .collect()
    }
}
