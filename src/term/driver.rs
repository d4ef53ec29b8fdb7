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

//! The per-unit terminal driver process. One of these runs per terminal unit,
//! consuming its `interrupt_mbox` forever.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    bug,
    substrate::{DevStatus, ProcessTable, TermControl, TerminalDevice},
    term::state::{TerminalUnit, TransmitAction},
};

/// Runs until `unit`'s interrupt mailbox closes (the sender side dropped, which
/// only happens when the owning [`crate::service::DeviceServices`] is torn down).
pub async fn run_terminal_driver(
    unit: Arc<TerminalUnit>,
    device: Arc<dyn TerminalDevice>,
    processes: ProcessTable,
) {
    // This driver task is the sole mutator of line-assembly state, so it
    // lives here as a local rather than as a field on TerminalUnit.
    let mut line_buf: Vec<u8> = Vec::with_capacity(unit.max_line_length());

    loop {
        let status = match unit.interrupt_mbox().recv().await {
            Ok(status) => status,
            Err(_) => {
                debug!(unit = unit.unit(), "interrupt mailbox closed, driver exiting");
                break;
            }
        };

        // Transmit branch.
        if status.xmit() == DevStatus::Ready {
            match unit.on_xmit_ready() {
                TransmitAction::Emit(c) => {
                    trace!(unit = unit.unit(), ch = c, "emitting character");
                    device.output(unit.unit(), TermControl::new(Some(c), true, true));
                }
                TransmitAction::Done(pid) => {
                    trace!(unit = unit.unit(), %pid, "write complete, unblocking writer");
                    if !processes.unblock(pid) {
                        bug!("unit {} writer {pid} was not blocked at completion", unit.unit());
                    }
                    device.output(unit.unit(), TermControl::new(None, true, true));
                }
                TransmitAction::Spurious => {}
            }
        }

        // Receive branch. Both branches run on every iteration: one status word
        // can report both conditions at once.
        if status.recv() == DevStatus::Busy {
            let c = status.ch();
            if line_buf.len() < unit.max_line_length() {
                line_buf.push(c);
            }
            if c == b'\n' || line_buf.len() == unit.max_line_length() {
                let line = std::mem::take(&mut line_buf);
                trace!(unit = unit.unit(), len = line.len(), "line complete");
                if unit.read_mbox().send(line).await.is_err() {
                    bug!("unit {} read_mbox receiver dropped", unit.unit());
                }
            }
            // Re-arm: RECV_INT is always wanted, XMIT_INT iff a writer is still
            // active (snapshotted under the write lock).
            let xmit_int = unit.write_busy();
            device.output(unit.unit(), TermControl::new(None, true, xmit_int));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::{config::ServiceConfig, substrate::device::sim::SimHardware};

    fn spawn_driver(config: &ServiceConfig, hw: &Arc<SimHardware>, unit: usize) -> Arc<TerminalUnit> {
        let unit = Arc::new(TerminalUnit::new(unit, config, hw.terminal_interrupts(unit)));
        tokio::spawn(run_terminal_driver(
            unit.clone(),
            hw.clone() as Arc<dyn TerminalDevice>,
            ProcessTable::new(),
        ));
        unit
    }

    #[tokio::test]
    async fn eighty_one_characters_without_newline_splits_into_two_lines() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let unit = spawn_driver(&config, &hw, 0);

        let mut input = vec![b'x'; 81];
        input[80] = b'y';
        hw.feed_input(0, &input).await;

        let first = unit.read_mbox().recv().await.unwrap();
        assert_eq!(first.len(), 80);
        assert_eq!(first, vec![b'x'; 80]);

        // The 81st character ('y') started the next line, which never reached
        // a newline or MAX_LINE_LENGTH, so no second line is ever published.
        assert!(timeout(Duration::from_millis(20), unit.read_mbox().recv()).await.is_err());
    }

    #[tokio::test]
    async fn drip_fed_lines_are_read_out_one_at_a_time() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let unit = spawn_driver(&config, &hw, 2);

        hw.feed_input(2, b"abc\ndef\n").await;

        let first = unit.read_mbox().recv().await.unwrap();
        assert_eq!(first, b"abc\n");
        let second = unit.read_mbox().recv().await.unwrap();
        assert_eq!(second, b"def\n");
    }
}
