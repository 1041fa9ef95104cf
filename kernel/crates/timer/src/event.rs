use crate::{Scheduler, Ticks, queue::Deadline};

/// The function called when a timer fires. It receives the scheduler that
/// fired it, so that it can schedule new timers (or reschedule itself for
/// periodic timers), and the payload given when the timer was added.
pub type Callback<H, P> = fn(&Scheduler<H, P>, P);

/// A pending timer: a callback to invoke with its payload once the counter
/// reaches `expire_time`.
pub struct TimerEvent<H, P> {
    expire_time: Ticks,
    callback: Callback<H, P>,
    payload: P,
}

impl<H, P> TimerEvent<H, P> {
    #[must_use]
    pub fn new(callback: Callback<H, P>, payload: P, expire_time: Ticks) -> Self {
        Self {
            expire_time,
            callback,
            payload,
        }
    }

    /// Consume the event and invoke its callback.
    pub fn fire(self, scheduler: &Scheduler<H, P>) {
        (self.callback)(scheduler, self.payload);
    }
}

impl<H, P> Deadline for TimerEvent<H, P> {
    fn expire_time(&self) -> Ticks {
        self.expire_time
    }
}

impl<H, P: core::fmt::Debug> core::fmt::Debug for TimerEvent<H, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerEvent")
            .field("expire_time", &self.expire_time)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}
