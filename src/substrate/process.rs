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

//! Stand-in for the process kernel this crate sits on top of: create a
//! process, block the caller, unblock a given process by id, fetch the
//! current process id. Each process is a long-running `tokio::spawn`'d task
//! paired with a one-shot wake channel in a shared table.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, Mutex},
};

use tokio::sync::oneshot;
use tracing::trace;

/// Opaque process id. Driver processes and every syscall caller each get one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(u64);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid{}", self.0)
    }
}

tokio::task_local! {
    static CURRENT_PID: Pid;
}

struct Inner {
    next_pid: u64,
    /// Processes currently suspended in `block_me`, keyed by pid. A process
    /// should be unblocked at most once per blocking call; removing the entry
    /// on unblock makes a second `unblock(pid)` for the same block a no-op
    /// rather than a double-wake.
    parked: HashMap<Pid, oneshot::Sender<()>>,
}

/// The process kernel stand-in. Cheaply `Clone`able; every clone shares the same
/// pid allocator and parked-process table.
#[derive(Clone)]
pub struct ProcessTable {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_pid: 1,
                parked: HashMap::new(),
            })),
        }
    }

    /// Mints a pid without tracking it as a running process. Used internally by
    /// `spawn`/`run_as`, and by other modules' tests that need a `Pid` value to
    /// exercise data structures (e.g. the sleep queue) without spinning up a
    /// task.
    pub(crate) fn fresh_pid(&self) -> Pid {
        let mut inner = self.inner.lock().unwrap();
        let pid = Pid(inner.next_pid);
        inner.next_pid += 1;
        pid
    }

    /// The pid of the process running on the current task, if this task was
    /// started via [`ProcessTable::spawn`] or [`ProcessTable::run_as`].
    pub fn current_pid(&self) -> Option<Pid> {
        CURRENT_PID.try_with(|pid| *pid).ok()
    }

    /// Runs `make_future` to completion under a freshly allocated pid, without
    /// spawning a new task. Used to give a syscall caller (which already owns a
    /// task, e.g. the task driving a test) a pid that `block_me`/`unblock` can
    /// address.
    pub async fn run_as<F, T>(&self, make_future: impl FnOnce(Pid) -> F) -> T
    where
        F: Future<Output = T>,
    {
        let pid = self.fresh_pid();
        CURRENT_PID.scope(pid, make_future(pid)).await
    }

    /// Spawns a new perpetual driver process (the clock driver, one of the four
    /// terminal drivers). Returns immediately with the new process's pid; the
    /// task keeps running in the background.
    pub fn spawn<F>(&self, name: &'static str, make_future: impl FnOnce(Pid) -> F) -> Pid
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pid = self.fresh_pid();
        let fut = make_future(pid);
        tokio::spawn(CURRENT_PID.scope(pid, async move {
            trace!(%pid, name, "process started");
            fut.await;
        }));
        pid
    }

    /// Suspends the calling process until some other process calls
    /// `unblock(self_pid)`. Panics if called from a task that wasn't given a pid
    /// via `spawn`/`run_as` — every syscall handler and driver loop in this crate
    /// is always run that way.
    pub async fn block_me(&self) {
        let pid = self
            .current_pid()
            .expect("block_me called outside a tracked process");
        let (tx, rx) = oneshot::channel();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.parked.insert(pid, tx);
        }
        trace!(%pid, "blocking");
        let _ = rx.await;
        trace!(%pid, "unblocked");
    }

    /// Wakes `pid` if it is currently parked in `block_me`. A no-op if `pid` isn't
    /// parked (already woken, or never blocked) — callers that need to know
    /// whether a wake actually happened use the `bool` return value.
    pub fn unblock(&self, pid: Pid) -> bool {
        let sender = {
            let mut inner = self.inner.lock().unwrap();
            inner.parked.remove(&pid)
        };
        match sender {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn block_me_wakes_on_unblock() {
        let table = ProcessTable::new();
        let woken = Arc::new(Mutex::new(false));

        let woken_clone = woken.clone();
        let table_clone = table.clone();
        let pid = table.spawn("blocker", move |_pid| async move {
            table_clone.block_me().await;
            *woken_clone.lock().unwrap() = true;
        });

        // Give the spawned task a chance to reach block_me.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(!*woken.lock().unwrap());

        assert!(table.unblock(pid));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(*woken.lock().unwrap());
    }

    #[tokio::test]
    async fn unblock_is_a_noop_when_not_parked() {
        let table = ProcessTable::new();
        let pid = table.fresh_pid();
        assert!(!table.unblock(pid));
    }

    #[tokio::test]
    async fn current_pid_is_scoped_to_the_spawned_task() {
        let table = ProcessTable::new();
        assert!(table.current_pid().is_none());

        let table_clone = table.clone();
        let result = table
            .run_as(|pid| async move { (pid, table_clone.current_pid()) })
            .await;
        assert_eq!(Some(result.0), result.1);
    }
}
