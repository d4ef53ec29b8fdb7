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

//! An in-process stand-in for real clock/terminal hardware, used by this
//! crate's own tests and available to any consumer that wants a runnable
//! device substrate without real hardware: a host-side task standing in for
//! real hardware and delivering interrupts over a channel.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::time;

use super::{term_isr, DevStatus, TermControl, TermStatusWord, TerminalDevice};
use crate::{config::ServiceConfig, substrate::Mailbox};

struct UnitState {
    /// Characters the driver has transmitted, in order — this unit's "screen".
    transmitted: Vec<u8>,
    /// When true, every transmitted character is also queued as received input,
    /// modeling a loopback wire. Used to exercise the write-then-read round
    /// trip end to end.
    loopback: bool,
}

struct Unit {
    interrupts: Mailbox<TermStatusWord>,
    state: Mutex<UnitState>,
}

/// Simulated clock + four simulated terminal units.
pub struct SimHardware {
    clock_ticks: Mailbox<()>,
    units: Vec<Unit>,
}

impl SimHardware {
    pub fn new(config: &ServiceConfig) -> Arc<Self> {
        let units = (0..config.term_units)
            .map(|_| Unit {
                interrupts: Mailbox::new(config.interrupt_mailbox_capacity),
                state: Mutex::new(UnitState {
                    transmitted: Vec::new(),
                    loopback: false,
                }),
            })
            .collect();
        Arc::new(Self {
            clock_ticks: Mailbox::new(1),
            units,
        })
    }

    /// The mailbox the clock driver blocks on, mirroring `wait_device(CLOCK_DEV,
    /// 0)`.
    pub fn clock_ticks(&self) -> Mailbox<()> {
        self.clock_ticks.clone()
    }

    /// The interrupt hand-off mailbox for terminal `unit`, mirroring
    /// `termInterruptMailbox[unit]`.
    pub fn terminal_interrupts(&self, unit: usize) -> Mailbox<TermStatusWord> {
        self.units[unit].interrupts.clone()
    }

    /// Enables or disables loopback for `unit`: every transmitted character is
    /// also delivered back as received input.
    pub fn set_loopback(&self, unit: usize, enabled: bool) {
        self.units[unit].state.lock().unwrap().loopback = enabled;
    }

    /// Returns (and clears) everything transmitted on `unit` so far.
    pub fn take_transmitted(&self, unit: usize) -> Vec<u8> {
        std::mem::take(&mut self.units[unit].state.lock().unwrap().transmitted)
    }

    /// Simulates `len` worth of clock interrupts arriving at `period` intervals.
    /// Spawns a background task and returns immediately.
    pub fn spawn_clock(self: &Arc<Self>, period: Duration) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                interval.tick().await;
                // A real clock interrupt never backs up behind a slow consumer;
                // the clock driver's loop body is always short, so a blocking
                // send here is equivalent in practice and keeps tick counting
                // exact for tests.
                if this.clock_ticks.send(()).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Delivers `bytes` to `unit`'s receiver, one character interrupt at a time,
    /// pacing them so the driver has a chance to drain the (small) interrupt
    /// mailbox between bytes — a real UART delivers characters one at a time
    /// over the wire, so this isn't a simplification of the protocol, just of
    /// the timing.
    pub async fn feed_input(&self, unit: usize, bytes: &[u8]) {
        for &b in bytes {
            let status = TermStatusWord::new(DevStatus::Ready, DevStatus::Busy, b);
            term_isr(status, &self.units[unit].interrupts);
            time::sleep(Duration::from_millis(1)).await;
        }
    }
}

impl TerminalDevice for SimHardware {
    fn output(&self, unit: usize, ctrl: TermControl) {
        let mut feedback = None;
        {
            let mut state = self.units[unit].state.lock().unwrap();
            if let Some(ch) = ctrl.xmit_char() {
                state.transmitted.push(ch);
                if state.loopback {
                    feedback = Some(ch);
                }
            }
        }

        // Hardware becomes ready again immediately after servicing a write to
        // the control register, whether or not a character was queued —
        // mirrors the real transmitter always reporting READY when idle.
        if ctrl.xmit_int_enabled() {
            let status = TermStatusWord::new(DevStatus::Ready, DevStatus::Ready, 0);
            term_isr(status, &self.units[unit].interrupts);
        }

        if let Some(ch) = feedback {
            // A real loopback wire has propagation delay; delivering this
            // synchronously can queue two interrupts per transmitted character
            // faster than the (small, by design) interrupt mailbox drains,
            // losing the echo under `feed_input`-free, all-software loopback.
            // Pacing it the same way `feed_input` paces external input keeps
            // the round trip lossless without changing the mailbox capacity.
            let interrupts = self.units[unit].interrupts.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(1)).await;
                let status = TermStatusWord::new(DevStatus::Ready, DevStatus::Busy, ch);
                term_isr(status, &interrupts);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_with_xmit_int_raises_a_ready_interrupt() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        hw.output(0, TermControl::new(Some(b'x'), true, true));
        let status = hw.terminal_interrupts(0).recv().await.unwrap();
        assert_eq!(status.xmit(), DevStatus::Ready);
        assert_eq!(hw.take_transmitted(0), vec![b'x']);
    }

    #[tokio::test]
    async fn loopback_echoes_transmitted_characters_as_input() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        hw.set_loopback(1, true);
        hw.output(1, TermControl::new(Some(b'y'), true, true));

        // First interrupt: the proactive "ready for more" tick.
        let first = hw.terminal_interrupts(1).recv().await.unwrap();
        assert_eq!(first.recv(), DevStatus::Ready);

        // Second interrupt: the looped-back character arriving as input.
        let second = hw.terminal_interrupts(1).recv().await.unwrap();
        assert_eq!(second.recv(), DevStatus::Busy);
        assert_eq!(second.ch(), b'y');
    }

    #[tokio::test]
    async fn feed_input_delivers_one_interrupt_per_byte() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        hw.feed_input(2, b"ab").await;

        let first = hw.terminal_interrupts(2).recv().await.unwrap();
        assert_eq!(first.ch(), b'a');
        let second = hw.terminal_interrupts(2).recv().await.unwrap();
        assert_eq!(second.ch(), b'b');
    }
}
