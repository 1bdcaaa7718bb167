//! Debounce state machine.
//!
//! `Idle → Pending(deadline)` on the first value, `Pending → Pending(new
//! deadline)` when a newer value supersedes it, and `Pending → Idle` when the
//! deadline elapses (emitting the latest value) or the debouncer is
//! cancelled. Only the newest value inside one quiescence window is ever
//! emitted.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Default quiescence window applied to search input.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Identifies one scheduled value. A ticket stops being current as soon as a
/// newer value is scheduled or the debouncer is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Observable debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing is waiting.
    Idle,
    /// A value is waiting for its deadline.
    Pending {
        /// When the value becomes due.
        deadline: DateTime<Utc>,
        /// Ticket of the waiting value.
        ticket: DebounceTicket,
    },
}

#[derive(Debug)]
struct Pending<T> {
    ticket: DebounceTicket,
    deadline: DateTime<Utc>,
    value: T,
}

/// Coalesces bursts of values into the latest one.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use chrono::{TimeDelta, Utc};
/// use client::domain::Debouncer;
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(500));
/// let start = Utc::now();
/// debouncer.schedule("a", start);
/// debouncer.schedule("al", start + TimeDelta::milliseconds(100));
/// assert_eq!(debouncer.poll(start + TimeDelta::milliseconds(599)), None);
/// assert_eq!(debouncer.poll(start + TimeDelta::milliseconds(600)), Some("al"));
/// ```
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    next_ticket: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Build an idle debouncer with the given quiescence window.
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            next_ticket: 0,
            pending: None,
        }
    }

    /// Quiescence window.
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Record `value`, superseding anything pending, and restart the window.
    pub fn schedule(&mut self, value: T, now: DateTime<Utc>) -> DebounceTicket {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = DebounceTicket(self.next_ticket);
        let deadline = deadline_after(now, self.window);
        self.pending = Some(Pending {
            ticket,
            deadline,
            value,
        });
        ticket
    }

    /// Emit the pending value when `ticket` is still current.
    ///
    /// A superseded or cancelled ticket is a no-op.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending.take().map(|pending| pending.value)
            }
            _ => None,
        }
    }

    /// Emit the pending value when its deadline is at or before `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending.take().map(|pending| pending.value)
            }
            _ => None,
        }
    }

    /// Drop any pending value. Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Current state.
    pub fn state(&self) -> DebounceState {
        self.pending
            .as_ref()
            .map_or(DebounceState::Idle, |pending| DebounceState::Pending {
                deadline: pending.deadline,
                ticket: pending.ticket,
            })
    }
}

fn deadline_after(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    let delta = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start time")
    }

    fn at(start: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
        start + TimeDelta::milliseconds(millis)
    }

    #[rstest]
    fn starts_idle(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::<&str>::new(DEFAULT_DEBOUNCE_WINDOW);
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert_eq!(debouncer.poll(start), None);
    }

    #[rstest]
    fn schedule_moves_to_pending_with_deadline(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let ticket = debouncer.schedule("a", start);
        assert_eq!(
            debouncer.state(),
            DebounceState::Pending {
                deadline: at(start, 500),
                ticket,
            }
        );
    }

    #[rstest]
    fn burst_within_window_emits_only_last_value(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let mut emitted = Vec::new();
        for (offset, value) in [(0, "a"), (120, "al"), (260, "ali"), (400, "alic")] {
            debouncer.schedule(value, at(start, offset));
            emitted.extend(debouncer.poll(at(start, offset)));
        }
        emitted.extend(debouncer.poll(at(start, 899)));
        assert!(emitted.is_empty(), "nothing is due before the last deadline");

        emitted.extend(debouncer.poll(at(start, 900)));
        assert_eq!(emitted, vec!["alic"]);
        assert_eq!(debouncer.state(), DebounceState::Idle);
    }

    #[rstest]
    fn superseded_ticket_is_a_no_op(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let first = debouncer.schedule("a", start);
        let second = debouncer.schedule("al", at(start, 10));

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), Some("al"));
        assert_eq!(debouncer.fire(second), None, "a ticket fires at most once");
    }

    #[rstest]
    fn cancel_discards_pending_value(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let ticket = debouncer.schedule("a", start);

        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.fire(ticket), None);
        assert_eq!(debouncer.poll(at(start, 10_000)), None);
    }

    #[rstest]
    fn oversized_window_saturates_deadline(start: DateTime<Utc>) {
        let mut debouncer = Debouncer::new(Duration::MAX);
        debouncer.schedule("a", start);
        assert!(matches!(
            debouncer.state(),
            DebounceState::Pending { deadline, .. } if deadline == DateTime::<Utc>::MAX_UTC
        ));
    }
}
