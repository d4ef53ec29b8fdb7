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

//! Stand-in for the counting semaphore primitive this crate sits on top of
//! (standard P/V with blocking acquire). The per-unit write lock this crate
//! actually needs is a `std::sync::Mutex<WriteState>` instead (see
//! `DESIGN.md`'s Open Questions section for why); `CountingSemaphore` is kept
//! here because it's named explicitly as an external collaborator this layer
//! is built on, even though none of the three syscalls need more than mutual
//! exclusion.

use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

/// A thin wrapper over [`tokio::sync::Semaphore`] giving the classic `P`/`V`
/// names.
#[derive(Clone)]
pub struct CountingSemaphore {
    inner: Arc<Semaphore>,
}

impl CountingSemaphore {
    pub fn new(initial_permits: usize) -> Self {
        Self {
            inner: Arc::new(Semaphore::new(initial_permits)),
        }
    }

    /// `P`: blocking acquire. The returned permit performs `V` on drop.
    pub async fn acquire(&self) -> SemaphorePermit<'_> {
        self.inner
            .acquire()
            .await
            .expect("semaphore is never closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binary_semaphore_serializes_two_waiters() {
        let sem = CountingSemaphore::new(1);
        let first = sem.acquire().await;
        assert_eq!(sem.inner.available_permits(), 0);
        drop(first);
        assert_eq!(sem.inner.available_permits(), 1);
    }
}
