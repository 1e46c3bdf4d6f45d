use {
    chrono::{DateTime, Duration, Utc},
    std::{
        collections::HashMap,
        sync::{Mutex, MutexGuard},
    },
};

const PRUNE_INTERVAL_SECONDS: i64 = 60;

struct Slot {
    nonce: String,
    expires: DateTime<Utc>,
}

struct Slots {
    entries: HashMap<String, Slot>,
    last_prune: DateTime<Utc>,
}

/// Per-session slot holding the last issued pay-now nonce. Slots live as
/// long as the nonce they hold; expired ones are dropped on later writes.
pub struct SessionNonces {
    ttl: Duration,
    slots: Mutex<Slots>,
}

impl SessionNonces {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds),
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                last_prune: Utc::now(),
            }),
        }
    }

    /// Park a nonce for the session, replacing any earlier one.
    pub fn put(&self, session_id: &str, nonce: String) {
        self.put_at(session_id, nonce, Utc::now());
    }

    pub fn put_at(&self, session_id: &str, nonce: String, now: DateTime<Utc>) {
        let mut slots = self.lock();

        if now - slots.last_prune >= Duration::seconds(PRUNE_INTERVAL_SECONDS) {
            let before = slots.entries.len();
            slots.entries.retain(|_, slot| slot.expires > now);
            slots.last_prune = now;
            tracing::debug!(
                pruned = before - slots.entries.len(),
                "expired session nonces dropped"
            );
        }

        slots.entries.insert(
            session_id.to_string(),
            Slot {
                nonce,
                expires: now + self.ttl,
            },
        );
    }

    /// Remove and return the session's nonce, if it has not expired.
    pub fn take(&self, session_id: &str) -> Option<String> {
        self.take_at(session_id, Utc::now())
    }

    pub fn take_at(&self, session_id: &str, now: DateTime<Utc>) -> Option<String> {
        self.lock()
            .entries
            .remove(session_id)
            .filter(|slot| slot.expires > now)
            .map(|slot| slot.nonce)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
