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

//! Stand-in for the device abstraction this crate sits on top of
//! (`device_input`, `device_output`, `wait_device`). Both the clock and the
//! terminal devices deliver their interrupts by pushing into a
//! [`crate::substrate::Mailbox`] — the clock driver blocks on its mailbox the
//! same way it would block on `wait_device(CLOCK_DEV, 0)`, and each terminal
//! unit's interrupt mailbox is fed by [`term_isr`]. Only the *output*
//! direction (`device_output`) needs a trait, since it's the one thing this
//! crate's own code calls rather than receives.

pub mod sim;

/// One of the three states a direction of a terminal unit can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevStatus {
    Ready,
    Busy,
    Error,
}

/// The terminal status word. A single status word can report that both
/// directions need servicing, hence separate `xmit`/`recv` fields rather than
/// one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermStatusWord {
    xmit: DevStatus,
    recv: DevStatus,
    ch: u8,
}

impl TermStatusWord {
    pub fn new(xmit: DevStatus, recv: DevStatus, ch: u8) -> Self {
        Self { xmit, recv, ch }
    }

    /// `TERM_STAT_XMIT(status)`.
    pub fn xmit(&self) -> DevStatus {
        self.xmit
    }

    /// `TERM_STAT_RECV(status)`. `DevStatus::Busy` here means "a character is
    /// available", not "device busy".
    pub fn recv(&self) -> DevStatus {
        self.recv
    }

    /// `TERM_STAT_CHAR(status)`.
    pub fn ch(&self) -> u8 {
        self.ch
    }
}

/// The terminal control word. Writes are complete overwrites, so every write
/// must re-assert the full desired interrupt mask — this type is the single
/// place that composes the three bit positions plus the character field,
/// instead of leaving every call site to hand-assemble the control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermControl {
    recv_int_enable: bool,
    xmit_int_enable: bool,
    xmit_char: Option<u8>,
}

impl TermControl {
    /// Builds a control word. `xmit_char`, when `Some`, sets `XMIT_CHAR_VALID` and
    /// the `CHAR` field; `recv_int`/`xmit_int` set the two interrupt-enable bits.
    /// No call site in this crate composes these bits by hand.
    pub fn new(xmit_char: Option<u8>, recv_int: bool, xmit_int: bool) -> Self {
        Self {
            recv_int_enable: recv_int,
            xmit_int_enable: xmit_int,
            xmit_char,
        }
    }

    /// Both interrupt streams disabled, nothing to transmit. Used once per
    /// unit at service startup.
    pub fn disabled() -> Self {
        Self::new(None, false, false)
    }

    pub fn recv_int_enabled(&self) -> bool {
        self.recv_int_enable
    }

    pub fn xmit_int_enabled(&self) -> bool {
        self.xmit_int_enable
    }

    pub fn xmit_char(&self) -> Option<u8> {
        self.xmit_char
    }
}

/// The hardware side of a terminal unit: the one operation this crate's own code
/// calls rather than receives. Mirrors `USLOSS_DeviceOutput(USLOSS_TERM_DEV, unit,
/// ctrl)`.
pub trait TerminalDevice: Send + Sync {
    fn output(&self, unit: usize, ctrl: TermControl);
}

/// The interrupt-context callback: read the status, then forward it with a
/// non-blocking conditional send. No policy is executed here — this function
/// never touches driver state, only the mailbox. A real interrupt vector
/// calls this directly from interrupt context; the in-process simulator
/// (`sim`) calls it from a background task instead.
pub fn term_isr(status: TermStatusWord, interrupt_mbox: &crate::substrate::Mailbox<TermStatusWord>) {
    // Non-blocking, drop-oldest-on-full send: an ISR can never block.
    let _ = interrupt_mbox.try_send(status);
}
