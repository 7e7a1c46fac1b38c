// Deferred work as explicit scheduled tasks.
// The engine never sleeps: the host advances time and the engine runs whatever fell due.
// Cancelling a handle stops future firings only; other pending one-shots are untouched.
// See DESIGN.md: Timer service

use crate::types::Millis;

/// Opaque handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// Work the engine defers to later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Autoplay step: advance to the next slide as a non-user action.
    AutoplayTick,
    /// A transition to `index` has finished.
    NotifySlide { index: i64 },
    /// Re-issue a move to the current index after the slide set changed.
    Resettle,
}

/// Scheduling service the engine runs its deferred tasks on.
pub trait TimerService {
    /// Current time on this service's clock.
    fn now(&self) -> Millis;

    /// Run `task` once, `delay` from now.
    fn schedule(&mut self, task: Task, delay: Millis) -> TimerHandle;

    /// Run `task` every `interval`, starting one interval from now.
    fn schedule_repeating(&mut self, task: Task, interval: Millis) -> TimerHandle;

    /// Cancel a task. Cancelling an unknown or already-fired handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);

    /// Whether `handle` will still fire.
    fn is_pending(&self, handle: TimerHandle) -> bool;

    /// Take the earliest task due at or before `deadline`, moving the clock to its due time.
    /// Repeating tasks are re-armed one interval later.
    fn pop_due(&mut self, deadline: Millis) -> Option<Task>;

    /// Move the clock forward to `deadline` without firing anything.
    fn advance_to(&mut self, deadline: Millis);
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    due: Millis,
    task: Task,
    repeat: Option<Millis>,
}

/// Deterministic in-process clock. Time only moves when the host says so.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Millis,
    next_id: u64,
    entries: Vec<Entry>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Number of pending entries that carry `task`.
    pub fn pending_of(&self, task: Task) -> usize {
        self.entries.iter().filter(|e| e.task == task).count()
    }

    fn insert(&mut self, task: Task, delay: Millis, repeat: Option<Millis>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now.saturating_add(delay),
            task,
            repeat,
        });
        handle
    }
}

impl TimerService for VirtualClock {
    fn now(&self) -> Millis {
        self.now
    }

    fn schedule(&mut self, task: Task, delay: Millis) -> TimerHandle {
        self.insert(task, delay, None)
    }

    fn schedule_repeating(&mut self, task: Task, interval: Millis) -> TimerHandle {
        // A zero interval would fire forever without the clock moving.
        let interval = Millis::new(interval.as_millis().max(1));
        self.insert(task, interval, Some(interval))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    fn pop_due(&mut self, deadline: Millis) -> Option<Task> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(i, _)| i)?;

        let Entry {
            due, task, repeat, ..
        } = self.entries[pos].clone();
        if due > self.now {
            self.now = due;
        }
        match repeat {
            Some(interval) => self.entries[pos].due = due.saturating_add(interval),
            None => {
                self.entries.swap_remove(pos);
            }
        }
        Some(task)
    }

    fn advance_to(&mut self, deadline: Millis) {
        if deadline > self.now {
            self.now = deadline;
        }
    }
}
