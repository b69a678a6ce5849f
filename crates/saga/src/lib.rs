//! # Saga Core
//!
//! A minimal demonstration of the cooperative-effects pattern: sagas yield
//! inert effect descriptions, and a thin interpreter fulfills them on tokio.
//!
//! ## Core Concepts
//!
//! Saga Core separates **describing** IO from **performing** it:
//! - [`Effect`] = an inert description of one requested operation
//! - [`Saga`] = a suspendable routine producing effects step by step
//! - [`Interpreter`] = the thin layer that fulfills each effect and resumes
//!
//! The key principle: **sagas describe, the interpreter performs**. A saga
//! body contains no timers, no channels, no IO; it only yields values.
//!
//! ## Architecture
//!
//! ```text
//! Application
//!     │
//!     ▼ emit(Occurrence)
//! EventBus ─► Subscription ─► take_every loop
//!                                  │ per occurrence
//!                                  ▼ spawn
//!                            Interpreter.run(saga)
//!                                  │
//!                    ┌─────────────┴─────────────┐
//!                    │                           │
//!              Wait(duration)              Emit(message)
//!                    │                           │
//!                    ▼                           ▼
//!              tokio timer                 DispatchBus
//!                                                │
//!                                                ▼
//!                                     application store
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Effects are inert** - Created fresh per step, consumed exactly once
//! 2. **Steps are atomic** - A step runs without preemption; suspension
//!    happens only at yield boundaries
//! 3. **Instances are independent** - Spawned saga instances share no
//!    mutable state and complete in any interleaving
//! 4. **Watchers outlive occurrences** - A take-every loop never settles on
//!    its own; it ends only when the bus is torn down
//! 5. **At-most-once delivery** - Lagged subscriptions miss occurrences;
//!    nothing is persisted or replayed
//!
//! ## Example
//!
//! ```ignore
//! use saga_core::{
//!     counter::{run_root, TracingSink, INCREMENT_SYNC},
//!     ChannelDispatch, EventBus, Interpreter, Occurrence,
//! };
//! use std::sync::Arc;
//!
//! let (dispatch, mut store) = ChannelDispatch::pair();
//! let interpreter = Interpreter::new(Arc::new(dispatch));
//! let bus = EventBus::new();
//!
//! tokio::spawn(run_root(interpreter, bus.clone(), Arc::new(TracingSink)));
//!
//! // Every occurrence starts one worker: wait 1s, emit one INCREMENT.
//! bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
//! ```
//!
//! ## What This Is Not
//!
//! Saga Core is **not**:
//! - A cooperative scheduler (tokio is the runtime)
//! - A state-management store (emitted messages leave this crate)
//! - A dispatch-matching framework (one kind per subscription, nothing more)
//!
//! Saga Core **is**:
//! > The effect vocabulary, the four tutorial routines, and the thin loop
//! > that maps each yielded effect onto a tokio primitive.

// Core modules
mod bus;
mod dispatch;
mod effect;
mod error;
mod interpreter;
mod message_macro;
mod saga;

// The counter tutorial routines
pub mod counter;

// Concurrency tests (test-only)
#[cfg(test)]
mod concurrency_tests;


// Re-export effect types
pub use crate::effect::{Effect, Message};

// Re-export the suspension model
pub use crate::saga::{Resume, Saga, Step};

// Re-export bus types
pub use crate::bus::{EventBus, Occurrence, Subscription};

// Re-export dispatch types
pub use crate::dispatch::{ChannelDispatch, DispatchBus, NullDispatch};

// Re-export error types
pub use crate::error::SagaError;

// Re-export the interpreter
pub use crate::interpreter::Interpreter;

// Re-export commonly used external types
pub use async_trait::async_trait;
