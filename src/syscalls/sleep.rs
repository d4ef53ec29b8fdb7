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

//! Blocks the calling process until at least the requested number of seconds
//! of simulated wall time have elapsed.

use std::sync::{Arc, Mutex};

use crate::{clock::ClockState, config::ServiceConfig, substrate::ProcessTable};

/// Returns `0` on success, `-1` on a negative `seconds` argument (no side
/// effects in that case — the caller never blocks).
pub async fn sleep(
    state: &Arc<Mutex<ClockState>>,
    processes: &ProcessTable,
    seconds: i32,
    config: &ServiceConfig,
) -> i32 {
    if seconds < 0 {
        return -1;
    }
    let pid = processes
        .current_pid()
        .expect("sleep called outside a tracked process");

    {
        let mut state = state.lock().unwrap();
        let wake = state.now() + config.ticks_for(seconds as u32);
        state.enqueue(pid, wake);
    }

    processes.block_me().await;
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn negative_seconds_rejected_without_blocking() {
        let state = Arc::new(Mutex::new(ClockState::new()));
        let processes = ProcessTable::new();
        let config = ServiceConfig::default();

        let result = processes
            .run_as(|_pid| async { sleep(&state, &processes, -1, &config).await })
            .await;
        assert_eq!(result, -1);
        assert_eq!(state.lock().unwrap().now(), 0);
    }

    #[tokio::test]
    async fn sleeper_blocks_until_explicitly_unblocked() {
        let state = Arc::new(Mutex::new(ClockState::new()));
        let processes = ProcessTable::new();
        let config = ServiceConfig::default();
        let done = Arc::new(Mutex::new(false));

        let state_clone = state.clone();
        let processes_clone = processes.clone();
        let done_clone = done.clone();
        let sleeper = processes.spawn("sleeper", move |_pid| async move {
            sleep(&state_clone, &processes_clone, 0, &config).await;
            *done_clone.lock().unwrap() = true;
        });

        tokio::task::yield_now().await;
        assert!(!*done.lock().unwrap());
        assert_eq!(state.lock().unwrap().now(), 0); // enqueue doesn't advance the tick

        assert!(processes.unblock(sleeper));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(*done.lock().unwrap());
    }
}
