// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Virtual Clock Scheduler

//! Cancelable delayed and repeating tasks on a host-driven clock.
//!
//! Nothing here sleeps. The owning session calls [`TimerQueue::pop_due`] in a
//! loop with the target time and handles each task as it comes out; a task
//! may schedule others or clear the queue while the loop runs, so tasks come
//! back one at a time instead of as a drained batch.

use tracing::debug;

#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    due: u64,
    every: Option<u64>,
    task: T,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { now: 0, next_seq: 0, entries: Vec::new() }
    }
}

impl<T: Clone + std::fmt::Debug> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schedule_once(&mut self, delay_ms: u64, task: T) {
        self.push(delay_ms, None, task);
    }

    /// First run after `first_delay_ms`, then every `interval_ms` (at least 1).
    pub fn schedule_every(&mut self, first_delay_ms: u64, interval_ms: u64, task: T) {
        self.push(first_delay_ms, Some(interval_ms.max(1)), task);
    }

    fn push(&mut self, delay_ms: u64, every: Option<u64>, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { seq, due: self.now.saturating_add(delay_ms), every, task });
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!(cancelled = self.entries.len(), "timer queue cleared");
        }
        self.entries.clear();
    }

    /// Take the earliest task due at or before `until`, moving the clock to
    /// its due time. Ties go to the task scheduled first. Repeating tasks are
    /// re-queued one interval later.
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;

        let due = self.entries[idx].due;
        self.now = self.now.max(due);
        let task = match self.entries[idx].every {
            Some(interval) => {
                let entry = &mut self.entries[idx];
                entry.due = due.saturating_add(interval);
                entry.task.clone()
            }
            None => self.entries.swap_remove(idx).task,
        };
        debug!(at_ms = self.now, ?task, "timer fired");
        Some(task)
    }

    /// Move the clock to `until` once every due task has been popped.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TimerQueue<&'static str>, elapsed: u64) -> Vec<&'static str> {
        let until = q.now() + elapsed;
        let mut fired = Vec::new();
        while let Some(t) = q.pop_due(until) {
            fired.push(t);
        }
        q.settle(until);
        fired
    }

    #[test]
    fn fires_in_due_order_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule_once(200, "late");
        q.schedule_once(100, "a");
        q.schedule_once(100, "b");
        assert_eq!(drain(&mut q, 150), vec!["a", "b"]);
        assert_eq!(q.now(), 150);
        assert_eq!(drain(&mut q, 50), vec!["late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn repeating_task_fires_each_interval() {
        let mut q = TimerQueue::new();
        q.schedule_every(500, 1000, "tick");
        assert_eq!(drain(&mut q, 2600).len(), 3);
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn cleared_tasks_never_fire() {
        let mut q = TimerQueue::new();
        q.schedule_once(10, "gone");
        q.schedule_every(10, 10, "ambient");
        q.clear();
        assert!(q.is_empty());
        assert!(drain(&mut q, 1000).is_empty());
        assert_eq!(q.now(), 1000);
    }

    #[test]
    fn clock_does_not_run_backwards() {
        let mut q: TimerQueue<&'static str> = TimerQueue::new();
        q.settle(100);
        q.settle(50);
        assert_eq!(q.now(), 100);
    }
}
