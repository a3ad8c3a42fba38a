// core/schedule.rs
//
// Deterministic replacement for fire-and-forget `setTimeout` style callbacks.
// Tasks are plain values; the owner pops them when the clock says they are due
// and dispatches them itself. Nothing is cancellable individually: a task, once
// scheduled, fires unless the whole scheduler is cleared.
//
// Usage:
//   let mut timers = Scheduler::new();
//   timers.schedule(ctx.now_ms(), 500.0, Task::EnableDrop);
//   while let Some(task) = timers.pop_due(ctx.now_ms()) { self.run(task, ctx); }

/// Handle returned by [`Scheduler::schedule`], mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    due_ms: f64,
    task: T,
}

/// Fire-once deferred tasks ordered by due time.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: now_ms + delay_ms.max(0.0),
            task,
        });
        id
    }

    /// Remove and return the earliest task due at or before `now_ms`.
    /// Tasks due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).task)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Abandon every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_early() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 500.0, "enable");
        assert_eq!(s.pop_due(499.9), None);
        assert_eq!(s.pop_due(500.0), Some("enable"));
        assert!(s.is_empty());
    }

    #[test]
    fn earliest_due_first_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 100.0, "late");
        s.schedule(0.0, 30.0, "first");
        s.schedule(0.0, 30.0, "second");

        assert_eq!(s.pop_due(29.0), None);
        assert_eq!(s.pop_due(1000.0), Some("first"));
        assert_eq!(s.pop_due(1000.0), Some("second"));
        assert_eq!(s.pop_due(1000.0), Some("late"));
        assert_eq!(s.pop_due(1000.0), None);
    }

    #[test]
    fn negative_delay_fires_immediately() {
        let mut s = Scheduler::new();
        s.schedule(200.0, -50.0, 1);
        assert_eq!(s.pop_due(200.0), Some(1));
    }

    #[test]
    fn clear_abandons_everything() {
        let mut s = Scheduler::new();
        let a = s.schedule(0.0, 10.0, 'a');
        let b = s.schedule(0.0, 20.0, 'b');
        assert!(a < b);
        assert_eq!(s.len(), 2);
        s.clear();
        assert_eq!(s.pop_due(f64::MAX), None);
    }
}
