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

/// Tunable constants for a [`crate::service::DeviceServices`] instance. Kept as
/// a plain struct (rather than a pile of free-standing `const`s) so tests can
/// shrink `max_line_length` / raise `tick_rate_hz` without touching service
/// code, the same separation drawn elsewhere between a config struct and the
/// `init` function that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Clock interrupts per second of wall time.
    pub tick_rate_hz: u32,

    /// Longest line `term_read` / `term_write` will hand back or accept.
    pub max_line_length: usize,

    /// Depth of each unit's completed-line mailbox.
    pub max_lines: usize,

    /// Number of independently addressable terminal units.
    pub term_units: usize,

    /// Capacity of each unit's interrupt hand-off mailbox. Must be at least 2
    /// so a transmit-ready and a receive-ready interrupt can both be pending
    /// at once without one overwriting the other.
    pub interrupt_mailbox_capacity: usize,
}

impl ServiceConfig {
    /// Ticks corresponding to `seconds` of wall time, per this config's tick rate.
    pub fn ticks_for(&self, seconds: u32) -> u64 {
        u64::from(seconds) * u64::from(self.tick_rate_hz)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 10,
            max_line_length: 80,
            max_lines: 10,
            term_units: 4,
            interrupt_mailbox_capacity: 2,
        }
    }
}
