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

//! A Rust-native rendering of "a vector of handler slots indexed by call
//! number". Typed arguments stand in for untyped machine words — there's no
//! real process address space here to read a buffer pointer out of, so a
//! handler takes its buffer as an owned `Vec<u8>` rather than `(addr, len)`.

use std::{future::Future, pin::Pin};

/// One of the three syscall numbers this table dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallNumber {
    Sleep = 0,
    TermWrite = 1,
    TermRead = 2,
}

/// One variant per call, carrying that call's arguments.
#[derive(Debug, Clone)]
pub enum SyscallArgs {
    Sleep { seconds: i32 },
    TermWrite { unit: usize, buf: Vec<u8> },
    TermRead { unit: usize, cap: usize },
}

impl SyscallArgs {
    fn number(&self) -> SyscallNumber {
        match self {
            SyscallArgs::Sleep { .. } => SyscallNumber::Sleep,
            SyscallArgs::TermWrite { .. } => SyscallNumber::TermWrite,
            SyscallArgs::TermRead { .. } => SyscallNumber::TermRead,
        }
    }
}

/// One variant per call, carrying its return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyscallOutcome {
    Sleep { status: i32 },
    TermWrite { bytes_written: i32, status: i32 },
    TermRead { data: Vec<u8>, status: i32 },
}

type BoxedHandler =
    Box<dyn Fn(SyscallArgs) -> Pin<Box<dyn Future<Output = SyscallOutcome> + Send>> + Send + Sync>;

/// Three handler slots, installed once at startup and invoked by call number
/// thereafter — this crate's stand-in for the kernel's real dispatch vector.
#[derive(Default)]
pub struct SyscallTable {
    handlers: [Option<BoxedHandler>; 3],
}

impl SyscallTable {
    pub fn new() -> Self {
        Self {
            handlers: [None, None, None],
        }
    }

    pub fn install(&mut self, number: SyscallNumber, handler: BoxedHandler) {
        self.handlers[number as usize] = Some(handler);
    }

    /// Panics if `args`' syscall number has no installed handler — every call
    /// number this crate serves is installed once by
    /// [`crate::service::DeviceServices::install`].
    pub async fn invoke(&self, args: SyscallArgs) -> SyscallOutcome {
        let handler = self.handlers[args.number() as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("syscall {:?} not installed", args.number()));
        handler(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[should_panic(expected = "not installed")]
    async fn uninstalled_slot_panics() {
        let table = SyscallTable::new();
        table.invoke(SyscallArgs::Sleep { seconds: 0 }).await;
    }

    #[tokio::test]
    async fn installed_handler_is_invoked_with_its_args() {
        let mut table = SyscallTable::new();
        table.install(
            SyscallNumber::Sleep,
            Box::new(|args| {
                Box::pin(async move {
                    match args {
                        SyscallArgs::Sleep { seconds } => SyscallOutcome::Sleep { status: seconds },
                        _ => unreachable!(),
                    }
                })
            }),
        );
        let outcome = table.invoke(SyscallArgs::Sleep { seconds: 7 }).await;
        assert_eq!(outcome, SyscallOutcome::Sleep { status: 7 });
    }
}
