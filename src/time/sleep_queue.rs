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

//! A time-ordered list of `(wake_tick, pid)` records and the wake-up dispatch
//! over it.

use crate::{substrate::Pid, time::Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SleepRequest {
    wake_tick: Tick,
    pid: Pid,
}

/// The sleep queue: a contiguous ordered container rather than an intrusive
/// linked list, a `Vec` kept sorted on insert. `enqueue` does a binary search
/// for the insertion point (`O(log n)` compare, `O(n)` shift); `drain` removes
/// a sorted prefix in one shot (`O(k)` for `k` woken processes). This beats a
/// `BinaryHeap` for this access pattern since `drain` needs an ordered prefix,
/// not just the single minimum.
///
/// No internal locking: `enqueue` only ever runs inside the `sleep` syscall
/// handler and `drain` only ever runs inside the clock driver, and the two
/// are serialized by cooperative scheduling — neither ever preempts the
/// other mid-call. A caller embedding this queue in a preemptive, multi-core
/// scheduler must add its own mutex around both calls.
#[derive(Debug, Default)]
pub struct SleepQueue {
    requests: Vec<SleepRequest>,
}

impl SleepQueue {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// Inserts `(pid, wake_tick)` at the position that keeps the queue sorted
    /// ascending by `wake_tick`. Ties break by insertion order: `partition_point`
    /// finds the position just past every existing request with the same tick,
    /// so equal-tick wakeups are released FIFO.
    pub fn enqueue(&mut self, pid: Pid, wake_tick: Tick) {
        let at = self.requests.partition_point(|r| r.wake_tick <= wake_tick);
        self.requests.insert(at, SleepRequest { wake_tick, pid });
    }

    /// Removes every request whose `wake_tick <= now_tick`, returning their
    /// pids in removal (ascending wake-tick, then FIFO) order. Called once per
    /// clock tick by the clock driver.
    pub fn drain(&mut self, now_tick: Tick) -> Vec<Pid> {
        let split = self.requests.partition_point(|r| r.wake_tick <= now_tick);
        self.requests
            .drain(0..split)
            .map(|r| r.pid)
            .collect()
    }

    /// Number of processes currently queued. Exposed for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u64) -> Pid {
        // Pid has no public constructor (pids are minted by ProcessTable), so
        // tests reach it indirectly through a real table.
        let table = crate::substrate::ProcessTable::new();
        let mut last = table.fresh_pid();
        for _ in 1..n {
            last = table.fresh_pid();
        }
        last
    }

    #[test]
    fn drain_returns_nothing_before_any_wake_tick() {
        let mut q = SleepQueue::new();
        q.enqueue(pid(1), 10);
        assert!(q.drain(5).is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn drain_is_ordered_by_wake_tick_ascending() {
        let mut q = SleepQueue::new();
        let a = pid(1);
        let b = pid(2);
        let c = pid(3);
        q.enqueue(a, 30);
        q.enqueue(b, 10);
        q.enqueue(c, 20);

        assert_eq!(q.drain(25), vec![b, c]);
        assert!(!q.is_empty());
        assert_eq!(q.drain(100), vec![a]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_wake_ticks_release_in_fifo_insertion_order() {
        let mut q = SleepQueue::new();
        let first = pid(1);
        let second = pid(2);
        q.enqueue(first, 5);
        q.enqueue(second, 5);
        assert_eq!(q.drain(5), vec![first, second]);
    }
}
