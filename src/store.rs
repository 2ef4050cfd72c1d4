// src/store.rs
use crate::error::{StoreError, StoreResult};
use crate::models::{NewPasswordRecord, PasswordRecord};
use crate::storage::RecordStorage;
use log;
use std::collections::HashSet;

/// Callback invoked with the ordered record list after every successful change.
pub type Observer = Box<dyn FnMut(&[PasswordRecord])>;

/// In-memory password history with write-through persistence.
///
/// Every mutating call writes the whole collection through the storage
/// backend before returning. If that write fails the in-memory collection is
/// restored to what it was before the call, so memory and disk never diverge.
/// The id counter is not restored: an id handed to a failed `add` is burned.
pub struct RecordStore<S: RecordStorage> {
    storage: S,
    records: Vec<PasswordRecord>,
    last_id: i64,
    observers: Vec<Observer>,
}

impl<S: RecordStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            records: Vec::new(),
            last_id: 0,
            observers: Vec::new(),
        }
    }

    /// Loads the stored collection and seeds a new store with it.
    pub fn open(storage: S) -> StoreResult<Self> {
        let records = storage.load()?;
        let mut store = Self::new(storage);
        store.initialize(records);
        Ok(store)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces the collection wholesale. Safe to call again; does not persist.
    pub fn initialize(&mut self, records: Vec<PasswordRecord>) {
        let current_count = records.iter().filter(|r| r.is_current).count();
        if current_count > 1 {
            log::warn!("Initializing with {} records flagged current", current_count);
        }
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id) {
                log::warn!("Initializing with duplicate record id {}", record.id);
            }
        }

        self.last_id = records.iter().map(|r| r.id).max().unwrap_or(0).max(0);
        self.records = records;
        log::info!(
            "Record store initialized with {} records (last id {})",
            self.records.len(),
            self.last_id
        );
        self.notify();
    }

    /// Stores a new record under the next id and returns it.
    ///
    /// Duplicate password text is not checked here; see [`Self::contains_password`].
    pub fn add(&mut self, candidate: NewPasswordRecord) -> StoreResult<PasswordRecord> {
        validate_password(&candidate.password)?;
        let id = self.last_id.checked_add(1).ok_or_else(|| {
            log::error!("add: id counter exhausted at {}", self.last_id);
            StoreError::IdExhausted(self.last_id)
        })?;
        self.last_id = id;
        let record = candidate.with_id(id);

        let stored = record.clone();
        self.mutate(move |records| {
            if stored.is_current {
                clear_current(records);
            }
            records.push(stored);
        })?;

        log::info!("Added record {}", record.id);
        Ok(record)
    }

    /// Adds the candidate and makes it the only current record, in one write.
    pub fn add_as_current(&mut self, candidate: NewPasswordRecord) -> StoreResult<PasswordRecord> {
        self.add(candidate.current(true))
    }

    /// Replaces the record with the same id. Returns `false` if there is none,
    /// in which case nothing is written.
    /// An unknown id is reported before the replacement is validated.
    pub fn update(&mut self, record: PasswordRecord) -> StoreResult<bool> {
        let Some(index) = self.records.iter().position(|r| r.id == record.id) else {
            log::warn!("update: no record with id {}", record.id);
            return Ok(false);
        };
        validate_password(&record.password)?;

        let id = record.id;
        self.mutate(move |records| {
            if record.is_current {
                clear_current(records);
            }
            records[index] = record;
        })?;

        log::info!("Updated record {}", id);
        Ok(true)
    }

    /// Removes the record if present. Writes even when nothing was removed.
    pub fn delete(&mut self, id: i64) -> StoreResult<bool> {
        let removed = self.mutate(|records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            records.len() != before
        })?;

        if removed {
            log::info!("Deleted record {}", id);
        } else {
            log::warn!("delete: no record with id {}", id);
        }
        Ok(removed)
    }

    /// Flags `id` as current and clears every other flag. An unknown id
    /// leaves no record current. Returns whether `id` was found.
    pub fn set_current(&mut self, id: i64) -> StoreResult<bool> {
        let found = self.mutate(|records| {
            let mut found = false;
            for record in records.iter_mut() {
                record.is_current = record.id == id;
                found |= record.is_current;
            }
            found
        })?;

        if found {
            log::info!("Record {} is now current", id);
        } else {
            log::warn!("set_current: no record with id {}, all current flags cleared", id);
        }
        Ok(found)
    }

    /// Records newest first; equal timestamps put the higher id first.
    pub fn list(&self) -> Vec<PasswordRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }

    pub fn get(&self, id: i64) -> Option<&PasswordRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn current(&self) -> Option<&PasswordRecord> {
        self.records.iter().find(|r| r.is_current)
    }

    pub fn contains_password(&self, password: &str) -> bool {
        self.records.iter().any(|r| r.password == password)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&[PasswordRecord]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn mutate<T>(&mut self, change: impl FnOnce(&mut Vec<PasswordRecord>) -> T) -> StoreResult<T> {
        let snapshot = self.records.clone();
        let outcome = change(&mut self.records);

        if let Err(e) = self.storage.save(&self.records) {
            log::error!("Persisting records failed, rolling back in-memory change: {}", e);
            self.records = snapshot;
            return Err(e);
        }

        self.notify();
        Ok(outcome)
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.list();
        for observer in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}

fn clear_current(records: &mut [PasswordRecord]) {
    for record in records.iter_mut() {
        record.is_current = false;
    }
}

fn validate_password(password: &str) -> StoreResult<()> {
    if password.is_empty() {
        return Err(StoreError::InvalidRecord("password cannot be empty".to_string()));
    }
    Ok(())
}
