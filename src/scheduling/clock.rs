//! Time sources and the deterministic task queue.
//!
//! The engine never reads the wall clock directly. It asks a [`Clock`], and
//! shift boundary work is parked on a [`TaskQueue`] whose logical time only
//! moves when the caller advances it.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock to an instant.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = now;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Work that fires at a point in logical time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum ScheduledTask {
    /// Shift-start boundary.
    StartShift {
        /// The shift to start.
        shift_id: String,
    },
    /// Shift-end boundary.
    EndShift {
        /// The shift to complete.
        shift_id: String,
    },
}

impl ScheduledTask {
    /// The shift this task acts on.
    pub fn shift_id(&self) -> &str {
        match self {
            ScheduledTask::StartShift { shift_id } | ScheduledTask::EndShift { shift_id } => {
                shift_id
            }
        }
    }
}

/// Handle returned when a task is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// Logical time owned by a [`TaskQueue`]. Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalClock {
    now: DateTime<Utc>,
}

impl LogicalClock {
    /// Starts logical time at an instant.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Current logical time.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn advance_to(&mut self, instant: DateTime<Utc>) {
        if instant > self.now {
            self.now = instant;
        }
    }
}

/// A queue of tasks ordered by due time, then by insertion order.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use shift_engine::scheduling::{ScheduledTask, TaskQueue};
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
/// let mut queue = TaskQueue::new(start);
/// queue.schedule_at(start + Duration::hours(15), ScheduledTask::EndShift { shift_id: "s1".into() });
/// queue.schedule_at(start + Duration::hours(7), ScheduledTask::StartShift { shift_id: "s1".into() });
///
/// let due = queue.advance_to(start + Duration::hours(8));
/// assert_eq!(due.len(), 1);
/// assert_eq!(due[0].1, ScheduledTask::StartShift { shift_id: "s1".into() });
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TaskQueue {
    clock: LogicalClock,
    tasks: BTreeMap<(DateTime<Utc>, TaskId), ScheduledTask>,
    due_at: BTreeMap<TaskId, DateTime<Utc>>,
    next_id: u64,
}

impl TaskQueue {
    /// Creates an empty queue with logical time at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            clock: LogicalClock::starting_at(now),
            tasks: BTreeMap::new(),
            due_at: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Current logical time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Queues a task. Tasks due in the past fire on the next advance.
    pub fn schedule_at(&mut self, at: DateTime<Utc>, task: ScheduledTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert((at, id), task);
        self.due_at.insert(id, at);
        id
    }

    /// Removes a queued task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.due_at.remove(&id) {
            Some(at) => self.tasks.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    /// Removes every queued task acting on a shift. Returns how many were removed.
    pub fn cancel_for_shift(&mut self, shift_id: &str) -> usize {
        let doomed: Vec<(DateTime<Utc>, TaskId)> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.shift_id() == shift_id)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.tasks.remove(key);
            self.due_at.remove(&key.1);
        }
        doomed.len()
    }

    /// Returns true if a task for this shift is already queued.
    pub fn contains(&self, task: &ScheduledTask) -> bool {
        self.tasks.values().any(|t| t == task)
    }

    /// Moves logical time forward and returns every task now due, in order.
    pub fn advance_to(&mut self, instant: DateTime<Utc>) -> Vec<(DateTime<Utc>, ScheduledTask)> {
        self.clock.advance_to(instant);
        let now = self.clock.now();

        let mut due = Vec::new();
        while let Some(entry) = self.tasks.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((at, id), task) = entry.remove_entry();
            self.due_at.remove(&id);
            due.push((at, task));
        }
        due
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Queued tasks in firing order.
    pub fn pending(&self) -> impl Iterator<Item = (DateTime<Utc>, &ScheduledTask)> {
        self.tasks.iter().map(|((at, _), task)| (*at, task))
    }
}
