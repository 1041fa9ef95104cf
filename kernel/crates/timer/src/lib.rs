//! Software timers multiplexed over a single hardware timer.
//!
//! The kernel only has one physical timer per core, but many parts of the
//! system want to be called back at some point in the future. This crate
//! keeps every pending timer in a queue sorted by expiry, always programs the
//! hardware for the soonest one, and fires them one by one from the timer
//! interrupt handler.
//!
//! The crate is independent of the architecture: everything it needs from the
//! hardware goes through the [`ClockSource`] and [`InterruptController`]
//! traits, which the kernel implements on top of the real registers. This also
//! allows the whole scheduling logic to be tested on the host with a simulated
//! clock.
//!
//! # Overview
//! - [`TimerQueue`] is the sorted queue of pending timers. It is a slab of
//!   slots linked together by indices, so no raw pointer ever crosses the
//!   interrupt boundary.
//! - [`Scheduler`] owns the queue and the hardware handle. It provides the
//!   [`Scheduler::add_timer`] entry point and the
//!   [`Scheduler::handle_interrupt`] interrupt handler.
//! - [`critical`] provides the critical section used to protect the queue
//!   against the interrupt handler.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod critical;
pub mod event;
pub mod hw;
pub mod queue;
pub mod scheduler;
pub mod ticks;

#[cfg(test)]
mod sim;

pub use event::{Callback, TimerEvent};
pub use hw::{ClockSource, InterruptController};
pub use queue::{Deadline, TimerQueue};
pub use scheduler::{Dispatch, Scheduler};
pub use ticks::Ticks;
