//! Timer queue
//!
//! The engine never sleeps; the host calls `tick(now)` and every task due
//! by then runs in due order. Ties run in scheduling order.

use alloc::vec::Vec;

/// Deferred engine work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// First apply of a transition, one frame after capture.
    ApplyTheme,
    /// Delayed repeat of the apply step. The final pass ends the
    /// transition.
    CatchUp { final_pass: bool },
    /// Debounced processing of pending mutations.
    FlushMutations,
    /// Recolor a page after navigation once it had time to render.
    NavigationSettle,
    /// Periodic location check.
    PollLocation,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: u64,
    seq: u64,
    task: Task,
}

/// Pending timers.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` at `due` (milliseconds, host clock).
    pub fn schedule(&mut self, due: u64, task: Task) {
        self.timers.push(Timer {
            due,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Cancel any pending `task`, then schedule it at `due`.
    pub fn reschedule(&mut self, due: u64, task: Task) {
        self.cancel(|t| *t == task);
        self.schedule(due, task);
    }

    /// Drop every timer whose task matches. Returns how many were dropped.
    pub fn cancel(&mut self, mut matches: impl FnMut(&Task) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|timer| !matches(&timer.task));
        before - self.timers.len()
    }

    /// Check if a matching task is pending.
    pub fn is_scheduled(&self, mut matches: impl FnMut(&Task) -> bool) -> bool {
        self.timers.iter().any(|timer| matches(&timer.task))
    }

    /// Remove and return the earliest task due at or before `now`, with
    /// the time it was due.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, Task)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        Some((timer.due, timer.task))
    }

    /// When the next task is due.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, Task::CatchUp { final_pass: false });
        scheduler.schedule(16, Task::ApplyTheme);
        scheduler.schedule(300, Task::FlushMutations);

        assert_eq!(scheduler.pop_due(10), None);
        assert_eq!(scheduler.next_due(), Some(16));
        assert_eq!(scheduler.pop_due(1000), Some((16, Task::ApplyTheme)));
        assert_eq!(
            scheduler.pop_due(1000),
            Some((300, Task::CatchUp { final_pass: false }))
        );
        assert_eq!(scheduler.pop_due(1000), Some((300, Task::FlushMutations)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_reschedule_rearms() {
        let mut scheduler = Scheduler::new();
        scheduler.reschedule(150, Task::FlushMutations);
        scheduler.reschedule(250, Task::FlushMutations);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.pop_due(200), None);
        assert_eq!(scheduler.pop_due(250), Some((250, Task::FlushMutations)));
    }

    #[test]
    fn test_cancel_by_kind() {
        let mut scheduler = Scheduler::new();
        for (i, final_pass) in [false, false, true].into_iter().enumerate() {
            scheduler.schedule(100 * i as u64, Task::CatchUp { final_pass });
        }
        scheduler.schedule(500, Task::PollLocation);
        assert_eq!(
            scheduler.cancel(|t| matches!(t, Task::CatchUp { .. })),
            3
        );
        assert!(scheduler.is_scheduled(|t| *t == Task::PollLocation));
    }
}
