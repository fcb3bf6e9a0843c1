//! Cooperative per-frame scheduler
//!
//! Replaces "wait N seconds then continue" routines with an explicit timer
//! queue driven by the single game tick. Nothing blocks: a routine schedules
//! its continuation, the tick hands back whatever came due, and the owner
//! re-arms itself if it repeats. Every task belongs to an owner so that a
//! reset can drop all of an owner's outstanding work at once.

use std::fmt;

/// Identifies one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due during [`Scheduler::advance`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<O, A> {
    pub task: TaskId,
    pub owner: O,
    pub action: A,
}

#[derive(Debug)]
struct Pending<O, A> {
    id: u64,
    owner: O,
    /// Absolute due time (seconds since scheduler start)
    due: f64,
    action: A,
}

/// Per-owner delayed actions on a shared clock
pub struct Scheduler<O, A> {
    now: f64,
    next_id: u64,
    pending: Vec<Pending<O, A>>,
}

impl<O: Copy + Eq + fmt::Debug, A> Default for Scheduler<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Copy + Eq + fmt::Debug, A> Scheduler<O, A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Seconds elapsed on the scheduler clock
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `action` for `owner` once `delay` seconds have elapsed
    pub fn schedule(&mut self, owner: O, delay: f32, action: A) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            owner,
            due: self.now + f64::from(delay.max(0.0)),
            action,
        });
        TaskId(id)
    }

    /// Advance the clock and return the tasks that came due, earliest first.
    ///
    /// Tasks due at the same instant come out in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<Fired<O, A>> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|t| Fired {
                task: TaskId(t.id),
                owner: t.owner,
                action: t.action,
            })
            .collect()
    }

    /// Drop one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, task: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != task.0);
        self.pending.len() != before
    }

    /// Drop every outstanding task of `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: O) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.owner != owner);
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            log::debug!("Cancelled {cancelled} scheduled tasks for {owner:?}");
        }
        cancelled
    }

    /// Number of outstanding tasks for `owner`
    pub fn pending(&self, owner: O) -> usize {
        self.pending.iter().filter(|t| t.owner == owner).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
