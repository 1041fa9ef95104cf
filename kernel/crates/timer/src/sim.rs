//! A simulated timer used by the tests, recording everything the scheduler
//! asks the hardware to do.
use crate::{ClockSource, InterruptController, Ticks};
use std::cell::{Cell, RefCell};

/// Called each time interrupts are unmasked, at the point where a pending
/// interrupt would be delivered on real hardware.
type UnmaskHook = Box<dyn Fn()>;

#[derive(Default)]
pub struct SimulatedTimer {
    now: Cell<Ticks>,
    deadline: Cell<Option<Ticks>>,
    line_enabled: Cell<bool>,
    masked: Cell<bool>,
    critical_sections: Cell<usize>,
    arms: Cell<usize>,
    unmask_hook: RefCell<Option<UnmaskHook>>,
}

impl SimulatedTimer {
    pub const FREQUENCY: u64 = 1_000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ticks: Ticks) {
        self.now.set(self.now.get() + ticks);
    }

    /// The absolute tick at which the countdown will expire, if armed.
    pub fn deadline(&self) -> Option<Ticks> {
        self.deadline.get()
    }

    pub fn line_enabled(&self) -> bool {
        self.line_enabled.get()
    }

    pub fn is_masked(&self) -> bool {
        self.masked.get()
    }

    pub fn critical_sections(&self) -> usize {
        self.critical_sections.get()
    }

    pub fn arms(&self) -> usize {
        self.arms.get()
    }

    pub fn on_unmask(&self, hook: impl Fn() + 'static) {
        *self.unmask_hook.borrow_mut() = Some(Box::new(hook));
    }
}

impl ClockSource for SimulatedTimer {
    fn now(&self) -> Ticks {
        self.now.get()
    }

    fn frequency(&self) -> u64 {
        Self::FREQUENCY
    }

    fn arm(&self, ticks: Ticks) {
        self.arms.set(self.arms.get() + 1);
        self.deadline.set(Some(self.now.get() + ticks));
    }
}

impl InterruptController for SimulatedTimer {
    fn enable(&self) {
        self.line_enabled.set(true);
    }

    fn disable(&self) {
        self.line_enabled.set(false);
    }

    fn mask(&self) {
        self.critical_sections.set(self.critical_sections.get() + 1);
        self.masked.set(true);
    }

    fn unmask(&self) {
        self.masked.set(false);
        if let Some(hook) = self.unmask_hook.borrow().as_ref() {
            hook();
        }
    }
}
