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

//! Per-terminal state, minus line assembly: the driver process is the sole
//! mutator of the in-progress input line, so that state lives as plain local
//! variables inside [`crate::term::driver::run_terminal_driver`] rather than
//! behind a lock here — nothing else ever touches it.
//!
//! `write_buf`/`write_len`/`write_idx`/`write_busy`/`writer_pid` *are* shared
//! between a `term_write` caller and the driver, so they're grouped into
//! [`WriteState`] behind one `std::sync::Mutex`, held only for brief,
//! non-blocking sections (a plain mutex rather than a semaphore; see
//! `DESIGN.md`).

use std::sync::Mutex;

use crate::{
    config::ServiceConfig,
    error::{ServiceError, ServiceResult},
    substrate::{Mailbox, Pid, TermStatusWord},
};

struct WriteState {
    buf: Vec<u8>,
    len: usize,
    idx: usize,
    busy: bool,
    writer_pid: Option<Pid>,
}

/// What the driver's transmit branch should do after consulting
/// `write_lock`-guarded state for one `XMIT_STAT == READY` interrupt.
pub enum TransmitAction {
    /// `write_busy` was false: no writer owns this unit. No device action.
    Spurious,
    /// Mid-message: the next character to emit, with `write_idx` already advanced.
    Emit(u8),
    /// `write_idx` had caught up to `write_len`: the writer to unblock.
    Done(Pid),
}

/// One terminal unit's durable state: the write-admission fields and the two
/// mailboxes. Constructed once per unit and shared (via `Arc`) between its driver
/// task and every `term_write`/`term_read` call for that unit.
pub struct TerminalUnit {
    unit: usize,
    max_line_length: usize,
    write: Mutex<WriteState>,
    interrupt_mbox: Mailbox<TermStatusWord>,
    read_mbox: Mailbox<Vec<u8>>,
}

impl TerminalUnit {
    /// `interrupt_mbox` is supplied rather than created here so a test can hand
    /// both this unit and the simulated hardware the same mailbox instance.
    pub fn new(unit: usize, config: &ServiceConfig, interrupt_mbox: Mailbox<TermStatusWord>) -> Self {
        Self {
            unit,
            max_line_length: config.max_line_length,
            write: Mutex::new(WriteState {
                buf: Vec::with_capacity(config.max_line_length),
                len: 0,
                idx: 0,
                busy: false,
                writer_pid: None,
            }),
            interrupt_mbox,
            read_mbox: Mailbox::new(config.max_lines),
        }
    }

    pub fn unit(&self) -> usize {
        self.unit
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub(crate) fn interrupt_mbox(&self) -> Mailbox<TermStatusWord> {
        self.interrupt_mbox.clone()
    }

    /// Completed input lines, delivered by the driver. `term_read` blocks here.
    pub fn read_mbox(&self) -> Mailbox<Vec<u8>> {
        self.read_mbox.clone()
    }

    /// Admission: copies `data` into `write_buf` and marks the unit busy under
    /// `pid`, or rejects if another writer already owns it.
    pub(crate) fn begin_write(&self, pid: Pid, data: &[u8]) -> ServiceResult<()> {
        let mut w = self.write.lock().unwrap();
        if w.busy {
            return Err(ServiceError::UnitBusy(self.unit));
        }
        w.buf.clear();
        w.buf.extend_from_slice(data);
        w.len = data.len();
        w.idx = 0;
        w.busy = true;
        w.writer_pid = Some(pid);
        Ok(())
    }

    /// Advances `write_idx` to 1 and returns `write_buf[0]`, the character the
    /// caller emits to the device before blocking.
    pub(crate) fn take_first_char(&self) -> u8 {
        let mut w = self.write.lock().unwrap();
        let c = w.buf[0];
        w.idx = 1;
        c
    }

    /// The zero-length write needs no device I/O, just clearing the admission
    /// it just took.
    pub(crate) fn finish_empty_write(&self) {
        let mut w = self.write.lock().unwrap();
        w.busy = false;
        w.writer_pid = None;
    }

    /// The transmit branch's decision, evaluated once per `XMIT_STAT == READY`
    /// interrupt.
    pub(crate) fn on_xmit_ready(&self) -> TransmitAction {
        let mut w = self.write.lock().unwrap();
        if !w.busy {
            return TransmitAction::Spurious;
        }
        if w.idx < w.len {
            let c = w.buf[w.idx];
            w.idx += 1;
            TransmitAction::Emit(c)
        } else {
            let pid = w.writer_pid.take();
            w.busy = false;
            match pid {
                Some(pid) => TransmitAction::Done(pid),
                None => {
                    crate::bug!("unit {} was busy with no writer_pid", self.unit);
                    TransmitAction::Spurious
                }
            }
        }
    }

    /// Snapshot of `write_busy` under the lock, used by the receive branch to
    /// decide whether to re-arm `XMIT_INT`.
    pub(crate) fn write_busy(&self) -> bool {
        self.write.lock().unwrap().busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{DevStatus, Mailbox as Mbox, ProcessTable};

    fn unit() -> TerminalUnit {
        let config = ServiceConfig::default();
        TerminalUnit::new(0, &config, Mbox::new(config.interrupt_mailbox_capacity))
    }

    #[tokio::test]
    async fn second_writer_is_rejected_while_first_is_active() {
        let u = unit();
        let table = ProcessTable::new();
        let first = table.fresh_pid();
        let second = table.fresh_pid();

        u.begin_write(first, b"hi").unwrap();
        assert!(u.begin_write(second, b"there").is_err());
    }

    #[tokio::test]
    async fn xmit_ready_walks_the_buffer_then_signals_done() {
        let u = unit();
        let table = ProcessTable::new();
        let pid = table.fresh_pid();

        u.begin_write(pid, b"ab").unwrap();
        assert_eq!(u.take_first_char(), b'a');

        match u.on_xmit_ready() {
            TransmitAction::Emit(c) => assert_eq!(c, b'b'),
            _ => panic!("expected Emit"),
        }
        match u.on_xmit_ready() {
            TransmitAction::Done(woken) => assert_eq!(woken, pid),
            _ => panic!("expected Done"),
        }
        assert!(!u.write_busy());
    }

    #[tokio::test]
    async fn xmit_ready_with_no_writer_is_spurious() {
        let u = unit();
        match u.on_xmit_ready() {
            TransmitAction::Spurious => {}
            _ => panic!("expected Spurious"),
        }
    }

    #[tokio::test]
    async fn interrupt_mbox_round_trips_a_status_word() {
        let u = unit();
        u.interrupt_mbox()
            .send(TermStatusWord::new(DevStatus::Ready, DevStatus::Ready, 0))
            .await
            .unwrap();
        let status = u.interrupt_mbox().recv().await.unwrap();
        assert_eq!(status.xmit(), DevStatus::Ready);
    }
}
