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

//! The clock driver process, and the tick counter + sleep queue it owns. The
//! two are grouped into one [`ClockState`] behind one lock because "current
//! tick" and "enqueue" need to be observed atomically with respect to the
//! driver's "advance tick, drain" step — otherwise a `sleep` call could read a
//! tick the driver is about to advance past and wake up one tick late (or
//! never, if it landed exactly on the old tick with the queue already
//! drained).

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::{
    substrate::{Mailbox, Pid, ProcessTable},
    time::{SleepQueue, Tick},
};

/// Shared tick counter and sleep queue. Cheaply `Clone`-able via `Arc`.
pub struct ClockState {
    tick: Tick,
    queue: SleepQueue,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            queue: SleepQueue::new(),
        }
    }

    pub fn now(&self) -> Tick {
        self.tick
    }

    /// Called from inside the `sleep` handler while holding the same lock it
    /// read `now()` through.
    pub fn enqueue(&mut self, pid: Pid, wake_tick: Tick) {
        self.queue.enqueue(pid, wake_tick);
    }

    /// Runs once per clock interrupt: advances the tick, then drains every
    /// request whose wake tick has arrived.
    fn advance(&mut self) -> Vec<Pid> {
        self.tick += 1;
        self.queue.drain(self.tick)
    }
}

/// The clock driver's perpetual loop. Exits when `clock_ticks` closes.
pub async fn run_clock_driver(
    clock_ticks: Mailbox<()>,
    state: Arc<Mutex<ClockState>>,
    processes: ProcessTable,
) {
    loop {
        if clock_ticks.recv().await.is_err() {
            trace!("clock mailbox closed, driver exiting");
            break;
        }
        let woken = {
            let mut state = state.lock().unwrap();
            state.advance()
        };
        for pid in woken {
            processes.unblock(pid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_drains_only_elapsed_requests() {
        let mut state = ClockState::new();
        let table = ProcessTable::new();
        let a = table.fresh_pid();
        let b = table.fresh_pid();
        state.enqueue(a, 1);
        state.enqueue(b, 2);

        assert_eq!(state.advance(), vec![a]);
        assert_eq!(state.now(), 1);
        assert_eq!(state.advance(), vec![b]);
        assert_eq!(state.now(), 2);
    }
}
