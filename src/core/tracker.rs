/// Reading-pattern learning: per-user, per-content-type moving averages
/// of speed, preference, and attention.

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::ReaderConfig;
use crate::schema::content::ContentType;
use crate::schema::pattern::{ReadingEvent, ReadingPattern, UserId};

/// Storage for reading patterns, keyed by (user, content type).
///
/// `compare_and_swap` is the only write path the tracker uses, which is
/// what serializes concurrent updates to the same key.
pub trait PatternStore: Send + Sync {
    fn get(&self, user: &UserId, content_type: ContentType) -> Option<ReadingPattern>;

    /// Unconditionally store a pattern.
    fn put(&self, user: &UserId, pattern: ReadingPattern);

    /// Store `new` only if the current value equals `expected` (`None`
    /// meaning absent). On conflict, returns the value actually stored.
    fn compare_and_swap(
        &self,
        user: &UserId,
        expected: Option<&ReadingPattern>,
        new: ReadingPattern,
    ) -> Result<(), Option<ReadingPattern>>;

    /// Snapshot of every pattern a user has.
    fn patterns_for(&self, user: &UserId) -> FxHashMap<ContentType, ReadingPattern>;

    /// Drop all of a user's patterns. Returns how many were removed.
    fn remove_user(&self, user: &UserId) -> usize;
}

/// One slot per content type, each behind its own lock.
#[derive(Debug, Default)]
struct UserPatterns {
    slots: [Mutex<Option<ReadingPattern>>; ContentType::ALL.len()],
}

impl UserPatterns {
    fn slot(&self, content_type: ContentType) -> &Mutex<Option<ReadingPattern>> {
        &self.slots[content_type as usize]
    }
}

/// Process-lifetime pattern store.
///
/// The outer map is only write-locked to add or drop a user; updates lock
/// the single (user, content type) slot they touch.
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    users: RwLock<FxHashMap<UserId, Arc<UserPatterns>>>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    fn user(&self, user: &UserId) -> Option<Arc<UserPatterns>> {
        self.users.read().get(user).cloned()
    }

    fn user_or_insert(&self, user: &UserId) -> Arc<UserPatterns> {
        if let Some(entry) = self.user(user) {
            return entry;
        }
        Arc::clone(self.users.write().entry(user.clone()).or_default())
    }
}

impl PatternStore for InMemoryPatternStore {
    fn get(&self, user: &UserId, content_type: ContentType) -> Option<ReadingPattern> {
        let entry = self.user(user)?;
        let current = *entry.slot(content_type).lock();
        current
    }

    fn put(&self, user: &UserId, pattern: ReadingPattern) {
        let entry = self.user_or_insert(user);
        *entry.slot(pattern.content_type).lock() = Some(pattern);
    }

    fn compare_and_swap(
        &self,
        user: &UserId,
        expected: Option<&ReadingPattern>,
        new: ReadingPattern,
    ) -> Result<(), Option<ReadingPattern>> {
        let entry = self.user_or_insert(user);
        let mut slot = entry.slot(new.content_type).lock();
        let matches = match ((*slot).as_ref(), expected) {
            (None, None) => true,
            (Some(current), Some(expected)) => current.same_bits(expected),
            _ => false,
        };
        if !matches {
            return Err(*slot);
        }
        *slot = Some(new);
        Ok(())
    }

    fn patterns_for(&self, user: &UserId) -> FxHashMap<ContentType, ReadingPattern> {
        let Some(entry) = self.user(user) else {
            return FxHashMap::default();
        };
        ContentType::ALL
            .iter()
            .filter_map(|&ct| {
                let current = *entry.slot(ct).lock();
                current.map(|pattern| (ct, pattern))
            })
            .collect()
    }

    fn remove_user(&self, user: &UserId) -> usize {
        self.users
            .write()
            .remove(user)
            .map(|entry| entry.slots.iter().filter(|slot| slot.lock().is_some()).count())
            .unwrap_or(0)
    }
}

/// Updates stored patterns from observed reading events.
#[derive(Clone)]
pub struct PatternTracker {
    store: Arc<dyn PatternStore>,
    smoothing_weight: f64,
    default_normal_wpm: u32,
    wpm_floor: f64,
    dwell_saturation_seconds: f64,
}

impl std::fmt::Debug for PatternTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternTracker")
            .field("smoothing_weight", &self.smoothing_weight)
            .field("default_normal_wpm", &self.default_normal_wpm)
            .finish_non_exhaustive()
    }
}

impl Default for PatternTracker {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryPatternStore::new()), &ReaderConfig::default())
    }
}

impl PatternTracker {
    pub fn new(store: Arc<dyn PatternStore>, config: &ReaderConfig) -> Self {
        Self {
            store,
            smoothing_weight: config.smoothing_weight,
            default_normal_wpm: config.default_normal_wpm,
            wpm_floor: config.wpm_floor,
            dwell_saturation_seconds: config.dwell_saturation_seconds,
        }
    }

    /// Turn one event into a pattern-shaped observation.
    ///
    /// Attention is the baseline speed over the (floored) observed speed;
    /// preference is dwell time over the saturation point. Both cap at 1.0.
    pub fn observe(&self, event: &ReadingEvent, normal_wpm: Option<u32>) -> ReadingPattern {
        let observed_wpm = non_negative(event.observed_wpm);
        let dwell = non_negative(event.dwell_time_seconds);
        let normal = f64::from(normal_wpm.unwrap_or(self.default_normal_wpm));

        ReadingPattern {
            content_type: event.content_type,
            avg_wpm: observed_wpm,
            preference_score: (dwell / self.dwell_saturation_seconds).min(1.0),
            attention_level: (normal / observed_wpm.max(self.wpm_floor)).min(1.0),
        }
    }

    /// Fold an event into the stored pattern for (user, content type) and
    /// return the result. The first event for a key is stored verbatim.
    pub fn record_event(
        &self,
        user: &UserId,
        event: &ReadingEvent,
        normal_wpm: Option<u32>,
    ) -> ReadingPattern {
        let observed = self.observe(event, normal_wpm);
        let mut current = self.store.get(user, event.content_type);
        let mut attempts = 0u32;

        loop {
            let next = match current {
                Some(ref old) => old.smoothed(&observed, self.smoothing_weight),
                None => observed,
            };

            match self.store.compare_and_swap(user, current.as_ref(), next) {
                Ok(()) => {
                    if current.is_none() {
                        info!(user = %user, content_type = %event.content_type, "created reading pattern");
                    } else {
                        debug!(
                            user = %user,
                            content_type = %event.content_type,
                            avg_wpm = next.avg_wpm,
                            preference = next.preference_score,
                            attention = next.attention_level,
                            "updated reading pattern"
                        );
                    }
                    return next;
                }
                Err(actual) => {
                    attempts += 1;
                    if attempts % 64 == 0 {
                        warn!(user = %user, attempts, "reading pattern update under contention");
                    }
                    current = actual;
                }
            }
        }
    }

    pub fn pattern(&self, user: &UserId, content_type: ContentType) -> Option<ReadingPattern> {
        self.store.get(user, content_type)
    }

    pub fn patterns(&self, user: &UserId) -> FxHashMap<ContentType, ReadingPattern> {
        self.store.patterns_for(user)
    }
}

fn non_negative(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ct: ContentType, wpm: f64, dwell: f64) -> ReadingEvent {
        ReadingEvent {
            content_type: ct,
            observed_wpm: wpm,
            dwell_time_seconds: dwell,
        }
    }

    fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    #[test]
    fn first_event_is_stored_verbatim() {
        let tracker = PatternTracker::default();
        let p = tracker.record_event(&user("ada"), &event(ContentType::Dialogue, 100.0, 20.0), Some(200));
        assert_eq!(p.avg_wpm, 100.0);
        assert_eq!(p.attention_level, 1.0);
        assert_eq!(p.preference_score, 1.0);
        assert_eq!(tracker.pattern(&user("ada"), ContentType::Dialogue), Some(p));
    }

    #[test]
    fn normal_speed_defaults_to_200() {
        let tracker = PatternTracker::default();
        let p = tracker.observe(&event(ContentType::Action, 400.0, 5.0), None);
        assert!((p.attention_level - 0.5).abs() < 1e-12);
        assert!((p.preference_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn slow_speeds_are_floored_for_attention() {
        let tracker = PatternTracker::default();
        let p = tracker.observe(&event(ContentType::Action, 1.0, 0.0), Some(20));
        // 20 / max(1, 50) = 0.4
        assert!((p.attention_level - 0.4).abs() < 1e-12);
        assert_eq!(p.avg_wpm, 1.0);
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        let tracker = PatternTracker::default();
        let p = tracker.observe(&event(ContentType::Action, f64::NAN, -3.0), None);
        assert_eq!(p.avg_wpm, 0.0);
        assert_eq!(p.preference_score, 0.0);
        assert_eq!(p.attention_level, 1.0);
    }

    #[test]
    fn second_event_is_smoothed() {
        let tracker = PatternTracker::default();
        let u = user("ada");
        tracker.record_event(&u, &event(ContentType::Description, 200.0, 0.0), Some(200));
        let p = tracker.record_event(&u, &event(ContentType::Description, 400.0, 10.0), Some(200));
        // wpm: 200*0.7 + 400*0.3; pref: 0*0.7 + 1*0.3; attention: 1*0.7 + 0.5*0.3
        assert!((p.avg_wpm - 260.0).abs() < 1e-9);
        assert!((p.preference_score - 0.3).abs() < 1e-9);
        assert!((p.attention_level - 0.85).abs() < 1e-9);
    }

    #[test]
    fn keys_are_independent() {
        let tracker = PatternTracker::default();
        tracker.record_event(&user("ada"), &event(ContentType::Action, 100.0, 1.0), None);
        tracker.record_event(&user("bob"), &event(ContentType::Action, 300.0, 1.0), None);
        tracker.record_event(&user("ada"), &event(ContentType::Dialogue, 150.0, 1.0), None);

        assert_eq!(tracker.pattern(&user("ada"), ContentType::Action).map(|p| p.avg_wpm), Some(100.0));
        assert_eq!(tracker.pattern(&user("bob"), ContentType::Action).map(|p| p.avg_wpm), Some(300.0));
        assert_eq!(tracker.patterns(&user("ada")).len(), 2);
        assert!(tracker.patterns(&user("carol")).is_empty());
    }

    #[test]
    fn constant_events_converge() {
        let tracker = PatternTracker::default();
        let u = user("ada");
        tracker.record_event(&u, &event(ContentType::Action, 600.0, 0.0), Some(200));
        let target = tracker.observe(&event(ContentType::Action, 120.0, 7.0), Some(200));
        let mut last = None;
        for _ in 0..20 {
            last = Some(tracker.record_event(&u, &event(ContentType::Action, 120.0, 7.0), Some(200)));
        }
        let p = last.unwrap();
        assert!((p.avg_wpm - target.avg_wpm).abs() < 0.5);
        assert!((p.preference_score - target.preference_score).abs() < 1e-3);
        assert!((p.attention_level - target.attention_level).abs() < 1e-3);
    }

    #[test]
    fn compare_and_swap_rejects_stale_expectation() {
        let store = InMemoryPatternStore::new();
        let u = user("ada");
        let a = ReadingPattern {
            content_type: ContentType::Action,
            avg_wpm: 100.0,
            preference_score: 0.5,
            attention_level: 0.5,
        };
        assert!(store.compare_and_swap(&u, None, a).is_ok());
        assert_eq!(store.compare_and_swap(&u, None, a), Err(Some(a)));

        let b = ReadingPattern { avg_wpm: 150.0, ..a };
        assert!(store.compare_and_swap(&u, Some(&a), b).is_ok());
        assert_eq!(store.get(&u, ContentType::Action), Some(b));
    }

    #[test]
    fn remove_user_drops_every_pattern() {
        let store = InMemoryPatternStore::new();
        let u = user("ada");
        for ct in [ContentType::Action, ContentType::Dialogue] {
            store.put(
                &u,
                ReadingPattern {
                    content_type: ct,
                    avg_wpm: 1.0,
                    preference_score: 0.0,
                    attention_level: 0.0,
                },
            );
        }
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.remove_user(&u), 2);
        assert!(store.patterns_for(&u).is_empty());
        assert_eq!(store.remove_user(&u), 0);
    }

    #[test]
    fn concurrent_updates_to_one_key_are_not_lost() {
        let tracker = Arc::new(PatternTracker::default());
        let u = user("ada");
        tracker.record_event(&u, &event(ContentType::Action, 0.0, 0.0), Some(200));

        let threads = 4;
        let per_thread = 10;
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                let u = u.clone();
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        tracker.record_event(&u, &event(ContentType::Action, 100.0, 0.0), Some(200));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut expected = 0.0f64;
        for _ in 0..threads * per_thread {
            expected = expected * (1.0 - 0.3) + 100.0 * 0.3;
        }
        let p = tracker.pattern(&u, ContentType::Action).unwrap();
        assert_eq!(p.avg_wpm, expected);
    }

    #[test]
    fn nan_in_store_does_not_stall_updates() {
        let store = Arc::new(InMemoryPatternStore::new());
        let u = user("ada");
        store.put(
            &u,
            ReadingPattern {
                content_type: ContentType::Action,
                avg_wpm: f64::NAN,
                preference_score: 0.5,
                attention_level: 0.5,
            },
        );
        let tracker = PatternTracker::new(store, &ReaderConfig::default());

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let p = tracker.record_event(&u, &event(ContentType::Action, 100.0, 5.0), Some(200));
            let _ = tx.send(p);
        });
        let p = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("record_event returned");
        assert!(p.avg_wpm.is_nan());
        assert!((p.preference_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn different_keys_use_different_locks() {
        let store = InMemoryPatternStore::new();
        let ada = user("ada");
        let entry = store.user_or_insert(&ada);
        let _held = entry.slot(ContentType::Action).lock();

        // Would deadlock if any of these shared the held lock
        let p = ReadingPattern {
            content_type: ContentType::Dialogue,
            avg_wpm: 150.0,
            preference_score: 0.2,
            attention_level: 0.9,
        };
        let bob_action = ReadingPattern {
            content_type: ContentType::Action,
            ..p
        };
        assert!(store.compare_and_swap(&ada, None, p).is_ok());
        assert!(store.compare_and_swap(&user("bob"), None, bob_action).is_ok());
        assert_eq!(store.get(&ada, ContentType::Dialogue), Some(p));
        assert_eq!(store.user_count(), 2);
    }
}
