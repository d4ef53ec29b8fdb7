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

//! Stand-in for the mailbox primitive this crate sits on top of: a bounded
//! FIFO of fixed-size slots with blocking send, blocking receive, and a
//! non-blocking conditional send.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex as AsyncMutex};

use crate::error::{ServiceError, ServiceResult};

/// A bounded, multi-producer, multi-consumer mailbox. Cloning shares the same
/// underlying channel (both ends), matching the teaching kernel's model where a
/// mailbox id is just an index shared by every caller.
pub struct Mailbox<T> {
    tx: mpsc::Sender<T>,
    rx: Arc<AsyncMutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T: Send + 'static> Mailbox<T> {
    /// Creates a mailbox with room for `capacity` slots; see `ServiceConfig`
    /// for the capacities this crate actually wires up for interrupt and
    /// completed-line mailboxes.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Arc::new(AsyncMutex::new(rx)),
        }
    }

    /// Blocking send (`MboxSend`): waits for room if the mailbox is full.
    pub async fn send(&self, value: T) -> ServiceResult<()> {
        self.tx
            .send(value)
            .await
            .map_err(|_| ServiceError::Invariant("mailbox receiver dropped".to_string()))
    }

    /// Non-blocking conditional send (`MboxCondSend`). Returns `false` instead
    /// of blocking when the mailbox is full or its receiver has gone away.
    /// Used by [`crate::substrate::term_isr`], where a dropped status under
    /// burst load is acceptable but blocking in interrupt context is not.
    pub fn try_send(&self, value: T) -> bool {
        self.tx.try_send(value).is_ok()
    }

    /// Blocking receive (`MboxRecv`).
    pub async fn recv(&self) -> ServiceResult<T> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| ServiceError::Invariant("mailbox sender dropped".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_then_recv_round_trips() {
        let mbox: Mailbox<u8> = Mailbox::new(2);
        mbox.send(42).await.unwrap();
        assert_eq!(mbox.recv().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn try_send_fails_without_blocking_when_full() {
        let mbox: Mailbox<u8> = Mailbox::new(1);
        assert!(mbox.try_send(1));
        assert!(!mbox.try_send(2));
        assert_eq!(mbox.recv().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clones_share_the_same_channel() {
        let mbox: Mailbox<u8> = Mailbox::new(2);
        let producer = mbox.clone();
        producer.send(7).await.unwrap();
        assert_eq!(mbox.recv().await.unwrap(), 7);
    }
}
