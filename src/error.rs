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

use thiserror::Error;

/// Errors produced by the substrate and the service layer. The three syscalls
/// (`sleep`, `term_read`, `term_write`) don't return this type directly — at
/// the syscall boundary every member of this enum collapses to a plain `-1`
/// status — but internally it lets a caller (and a test) tell "the caller
/// passed bad arguments" apart from "a mailbox that should be infallible
/// reported failure", which is a bug.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A syscall argument failed validation (null buffer, negative length,
    /// unit out of range, etc). Surfaced as `-1` with no side effects.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `term_write` was called for a unit that already has an active writer.
    #[error("unit {0} already has an active writer")]
    UnitBusy(usize),

    /// A mailbox or process primitive reported a failure that the design says
    /// should be impossible (closed channel, double-unblock, etc). Treated as
    /// a bug.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// Setting up the logging layer failed (bad file path, permissions).
    #[error("failed to initialize tracing: {0}")]
    Tracing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Logs an internal-consistency violation and, in debug builds, panics. In
/// release builds it logs and continues — violations that would indicate a
/// kernel bug shouldn't take the whole service down in production.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        tracing::error!(bug = true, "{msg}");
        debug_assert!(false, "{msg}");
    }};
}
