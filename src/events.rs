//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - Timer callbacks (control ticks, status refresh ticks)
//! - Button edges detected by the polled debouncers
//! - Software (emergency-stop chord detection)
//!
//! Events are consumed by the main control loop, which processes them one
//! at a time.  `EmergencyStop` is drained with unconditional priority: the
//! loop scans for it before handling anything else in the same batch, so an
//! abort is never delayed behind a timed transition that became eligible on
//! the same tick.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer ISR   │────▶│              │     │              │
//! │ Button edge │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Software    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Emergency-stop chord (all three buttons held during a run).
    /// Highest priority — always handled before anything else.
    EmergencyStop = 0,

    /// Sequencer polling tick.
    ControlTick = 10,
    /// Status snapshot refresh tick (1 Hz during a run).
    StatusTick = 11,

    /// Debounced falling edge on the UP button.
    BtnUp = 20,
    /// Debounced falling edge on the DOWN button.
    BtnDown = 21,
    /// Debounced falling edge on the ENTER button.
    BtnEnter = 22,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs write (produce), main loop reads (consume).
// Uses atomic head/tail indices.  The buffer is intentionally
// kept in a static so ISR callbacks can access it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: one producer (timer/ISR context), one consumer (main loop).
// The acquire/release pairs on head and tail enforce the SPSC discipline;
// a slot is written strictly before head is published and read strictly
// after head is observed.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; the slot at `head` is not visible to the
    // consumer until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the slot at `tail` was published by the
    // producer's Release store.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::EmergencyStop),
        10 => Some(Event::ControlTick),
        11 => Some(Event::StatusTick),
        20 => Some(Event::BtnUp),
        21 => Some(Event::BtnDown),
        22 => Some(Event::BtnEnter),
        _ => None,
    }
}
