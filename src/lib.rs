/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! Device services layer for a teaching kernel: the concurrency choreography
//! that turns raw clock and terminal interrupts into three blocking
//! user-visible services — [`sleep`](syscalls::sleep),
//! [`term_read`](syscalls::term_read), [`term_write`](syscalls::term_write) —
//! running on top of a lower-level kernel that supplies processes, mailboxes,
//! and semaphores.
//!
//! # Why this crate is shaped the way it is
//!
//! The hard part is the choreography between three kinds of actors sharing
//! mutable state: interrupt-context callbacks delivered by the hardware
//! (thin, policy-free forwarders into a mailbox), long-running driver
//! processes that serialize per-device work ([`clock`], [`term::driver`]),
//! and user processes that enter through [`syscalls`] and must block and
//! unblock correctly. The terminal path in particular has to reconcile
//! character-granularity transmit/receive interrupts, a write-only control
//! register that must be fully re-asserted on every touch
//! ([`substrate::TermControl`]), per-unit line buffering, per-unit
//! single-writer exclusion, and a blocking contract — while staying safe
//! against spurious and lost interrupts.
//!
//! # Module map
//!
//! * [`config`] — [`config::ServiceConfig`], the tunables every other module
//!   is parameterized by.
//! * [`error`] — the [`error::ServiceError`] taxonomy and the
//!   [`bug!`] macro for internal-consistency violations.
//! * [`time`] — [`time::SleepQueue`], the ordered wake-up list.
//! * [`clock`] — the clock driver process and the tick counter it owns.
//! * [`term`] — per-unit terminal state and the terminal driver process.
//! * [`syscalls`] — `sleep`, `term_read`, `term_write`, plus the call-number
//!   dispatch table ([`syscalls::SyscallTable`]).
//! * [`service`] — [`service::DeviceServices`], the single object a running
//!   kernel instance constructs and hands to every syscall handler.
//! * [`substrate`] — concrete stand-ins for the process/mailbox/semaphore/
//!   device primitives this layer consumes but doesn't itself define.
//! * [`tracing_logging`] — structured logging setup.
//!
//! # Out of scope
//!
//! Persistence, multi-host operation, character echo policy, flow control,
//! signal handling, non-line-oriented reads, and asynchronous variants of the
//! three calls are all out of scope, as is the real process kernel, mailbox,
//! semaphore, and device hardware this crate is meant to sit on top of — see
//! [`substrate`] for the stand-ins used to make this crate buildable and
//! testable on its own.

pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod substrate;
pub mod syscalls;
pub mod term;
pub mod time;
pub mod tracing_logging;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use service::{DeviceServices, ServiceHandles};
