use crate::{
    ClockSource, InterruptController, Ticks,
    critical,
    event::{Callback, TimerEvent},
    queue::{Deadline, TimerQueue},
};

/// What the interrupt handler did when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No timer was pending. The countdown was pushed back by
    /// [`config::SPURIOUS_REARM_TICKS`] ticks to keep the line quiet.
    Spurious,

    /// The earliest pending timer was fired. `remaining` is the number of
    /// timers still pending after the callback returned, including any timer
    /// added by the callback itself.
    Fired { remaining: usize },
}

/// Multiplexes any number of software timers over a single hardware timer.
///
/// The scheduler owns the queue of pending timers and the hardware handle.
/// The hardware countdown is always programmed for the earliest pending timer,
/// and the timer interrupt line is enabled as long as the queue is not empty.
///
/// # Concurrency
/// The scheduler is designed for a single core where the only concurrency is
/// between the normal flow of execution and the timer interrupt handler. Every
/// access to the queue is done inside a [critical section](critical), which
/// masks interrupts. The queue is still wrapped into a mutex to convince the
/// compiler that sharing the scheduler is fine, but since the lock is only
/// taken with interrupts masked, it is never contended.
pub struct Scheduler<H, P> {
    hardware: H,
    queue: spin::Mutex<TimerQueue<TimerEvent<H, P>>>,
}

impl<H, P> Scheduler<H, P>
where
    H: ClockSource + InterruptController,
{
    /// Create a new scheduler with no pending timer, driving the given
    /// hardware.
    #[must_use]
    pub fn new(hardware: H) -> Self {
        Self {
            hardware,
            queue: spin::Mutex::new(TimerQueue::new()),
        }
    }

    /// Schedule `callback` to be called with `payload` once the counter
    /// reaches `expire_time`. If the expiry time has already passed, the
    /// timer fires as soon as possible.
    ///
    /// This can be called at any time outside of a critical section, including
    /// from a timer callback to schedule a new timer or to reschedule itself.
    /// Timers expiring at the same tick fire in the order they were added.
    ///
    /// # Panics
    /// Panics if the memory needed to store the timer cannot be allocated.
    /// There is no way to recover from this in the kernel.
    pub fn add_timer(&self, callback: Callback<H, P>, payload: P, expire_time: Ticks) {
        let event = TimerEvent::new(callback, payload, expire_time);

        critical::without(&self.hardware, || {
            let mut queue = self.queue.lock();
            queue.insert(event);

            // The queue cannot be empty since we just inserted an event.
            if let Some(expiry) = queue.peek_front_expiry() {
                self.arm_at(expiry);
            }
        });

        self.hardware.enable();
        log::trace!("Timer added, expiring at tick {expire_time}");
    }

    /// The timer interrupt handler. It must be called by the platform each
    /// time the timer interrupt is raised, and must not be reentered.
    ///
    /// Only the earliest pending timer is fired, even if several timers are
    /// overdue. The countdown is then rearmed for the next one, which will be
    /// already expired and will raise a new interrupt immediately. This bounds
    /// the work done with interrupts masked, whatever the number of timers.
    ///
    /// The callback runs outside of any critical section: it is free to add
    /// new timers. Once it returns, the countdown is rearmed for the earliest
    /// pending timer, or the interrupt line is disabled if there is none.
    pub fn handle_interrupt(&self) -> Dispatch {
        let Some(event) = critical::without(&self.hardware, || self.queue.lock().pop_front())
        else {
            log::debug!("Spurious timer interrupt, no timer pending");
            self.hardware.arm(config::SPURIOUS_REARM_TICKS);
            return Dispatch::Spurious;
        };

        log::trace!(
            "Firing timer expiring at tick {} (now {})",
            event.expire_time(),
            self.hardware.now()
        );
        event.fire(self);

        let remaining = critical::without(&self.hardware, || {
            let queue = self.queue.lock();
            match queue.peek_front_expiry() {
                Some(expiry) => self.arm_at(expiry),
                None => self.hardware.disable(),
            }
            queue.len()
        });

        Dispatch::Fired { remaining }
    }

    /// The number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        critical::without(&self.hardware, || self.queue.lock().len())
    }

    /// The expiry time of the earliest pending timer, if any.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Ticks> {
        critical::without(&self.hardware, || self.queue.lock().peek_front_expiry())
    }

    /// The hardware driven by this scheduler.
    #[must_use]
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Program the countdown to expire at the given absolute tick, or as soon
    /// as possible if it has already passed.
    fn arm_at(&self, expiry: Ticks) {
        self.hardware.arm(expiry.saturating_sub(self.hardware.now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTimer;
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Probe {
        label: &'static str,
        log: Log,
    }

    type TestScheduler = Scheduler<SimulatedTimer, Probe>;

    fn probe(log: &Log, label: &'static str) -> Probe {
        Probe {
            label,
            log: Rc::clone(log),
        }
    }

    fn record(_: &TestScheduler, probe: Probe) {
        probe.log.borrow_mut().push(probe.label);
    }

    fn setup() -> (TestScheduler, Log) {
        (Scheduler::new(SimulatedTimer::new()), Log::default())
    }

    #[test]
    fn fires_once_and_disables_line_when_drained() {
        let (scheduler, log) = setup();
        let now = scheduler.hardware().now();

        scheduler.add_timer(record, probe(&log, "x"), now + 2);
        assert!(scheduler.hardware().line_enabled());
        assert_eq!(scheduler.hardware().deadline(), Some(now + 2));

        scheduler.hardware().advance(3);
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 0 });

        assert_eq!(*log.borrow(), ["x"]);
        assert_eq!(scheduler.pending(), 0);
        assert!(!scheduler.hardware().line_enabled());
    }

    #[test]
    fn fires_one_timer_per_interrupt() {
        let (scheduler, log) = setup();
        scheduler.add_timer(record, probe(&log, "c"), 3);
        scheduler.add_timer(record, probe(&log, "a"), 1);
        scheduler.add_timer(record, probe(&log, "b"), 2);
        scheduler.hardware().advance(10);

        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 2 });
        assert_eq!(*log.borrow(), ["a"]);

        // The next timer is already overdue: the countdown is armed to expire
        // immediately.
        assert_eq!(scheduler.hardware().deadline(), Some(10));
        assert!(scheduler.hardware().line_enabled());

        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 1 });
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 0 });
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
    }

    #[test]
    fn fires_in_expiry_order() {
        let (scheduler, log) = setup();
        scheduler.add_timer(record, probe(&log, "50"), 50);
        assert_eq!(scheduler.hardware().deadline(), Some(50));
        scheduler.add_timer(record, probe(&log, "10"), 10);
        assert_eq!(scheduler.hardware().deadline(), Some(10));
        scheduler.add_timer(record, probe(&log, "30"), 30);
        assert_eq!(scheduler.hardware().deadline(), Some(10));

        for _ in 0..3 {
            let deadline = scheduler.hardware().deadline().unwrap();
            let now = scheduler.hardware().now();
            scheduler.hardware().advance(deadline - now);
            scheduler.handle_interrupt();
        }

        assert_eq!(*log.borrow(), ["10", "30", "50"]);
        assert_eq!(scheduler.hardware().now(), 50);
    }

    #[test]
    fn ties_fire_in_insertion_order() {
        let (scheduler, log) = setup();
        scheduler.add_timer(record, probe(&log, "A"), 5);
        scheduler.add_timer(record, probe(&log, "B"), 5);
        scheduler.hardware().advance(5);

        scheduler.handle_interrupt();
        scheduler.handle_interrupt();
        assert_eq!(*log.borrow(), ["A", "B"]);
    }

    #[test]
    fn spurious_interrupt_pushes_countdown_back() {
        let (scheduler, log) = setup();
        scheduler.hardware().advance(7);

        assert_eq!(scheduler.handle_interrupt(), Dispatch::Spurious);
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Spurious);

        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(
            scheduler.hardware().deadline(),
            Some(7 + config::SPURIOUS_REARM_TICKS)
        );
    }

    #[test]
    fn callback_can_reschedule_itself() {
        fn periodic(scheduler: &TestScheduler, probe: Probe) {
            assert!(!scheduler.hardware().is_masked());
            probe.log.borrow_mut().push(probe.label);
            let next = scheduler.hardware().now() + 10;
            scheduler.add_timer(periodic, probe, next);
        }

        let (scheduler, log) = setup();
        scheduler.add_timer(periodic, probe(&log, "tick"), 10);
        scheduler.add_timer(record, probe(&log, "late"), 25);

        scheduler.hardware().advance(10);
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 2 });
        assert_eq!(scheduler.next_expiry(), Some(20));
        assert_eq!(scheduler.hardware().deadline(), Some(20));
        assert!(scheduler.hardware().line_enabled());

        scheduler.hardware().advance(10);
        scheduler.handle_interrupt();
        scheduler.hardware().advance(5);
        scheduler.handle_interrupt();
        assert_eq!(*log.borrow(), ["tick", "tick", "late"]);
        assert_eq!(scheduler.next_expiry(), Some(30));
    }

    #[test]
    fn overdue_timer_is_armed_immediately() {
        let (scheduler, log) = setup();
        scheduler.hardware().advance(100);
        scheduler.add_timer(record, probe(&log, "late"), 50);
        assert_eq!(scheduler.hardware().deadline(), Some(100));
    }

    #[test]
    fn queue_is_only_touched_with_interrupts_masked() {
        let (scheduler, log) = setup();
        scheduler.add_timer(record, probe(&log, "x"), 1);
        assert_eq!(scheduler.hardware().critical_sections(), 1);
        assert!(!scheduler.hardware().is_masked());

        scheduler.hardware().advance(1);
        scheduler.handle_interrupt();
        assert_eq!(scheduler.hardware().critical_sections(), 3);
        assert!(!scheduler.hardware().is_masked());
    }

    #[test]
    fn later_timer_keeps_current_countdown() {
        let (scheduler, log) = setup();
        scheduler.add_timer(record, probe(&log, "first"), 40);
        let arms = scheduler.hardware().arms();
        scheduler.add_timer(record, probe(&log, "second"), 70);

        // The countdown is reprogrammed, but still for the earliest timer.
        assert_eq!(scheduler.hardware().arms(), arms + 1);
        assert_eq!(scheduler.hardware().deadline(), Some(40));
    }

    #[test]
    fn queue_is_released_before_unmasking() {
        let (scheduler, log) = setup();
        let scheduler = Rc::new(scheduler);
        let unmasks = Rc::new(Cell::new(0));

        // Unmasking is where a pending interrupt would preempt the caller:
        // the handler must find the queue unlocked at that point.
        let (weak, seen) = (Rc::downgrade(&scheduler), Rc::clone(&unmasks));
        scheduler.hardware().on_unmask(move || {
            if let Some(scheduler) = weak.upgrade() {
                assert!(scheduler.queue.try_lock().is_some());
                seen.set(seen.get() + 1);
            }
        });

        scheduler.add_timer(record, probe(&log, "x"), 1);
        scheduler.hardware().advance(1);
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Fired { remaining: 0 });
        assert_eq!(scheduler.handle_interrupt(), Dispatch::Spurious);

        assert_eq!(*log.borrow(), ["x"]);
        assert_eq!(unmasks.get(), 4);
    }
}
