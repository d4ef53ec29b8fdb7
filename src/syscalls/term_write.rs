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

//! Writes a buffer to a terminal unit one character at a time, blocking the
//! calling process until every character has been transmitted.

use std::sync::Arc;

use crate::{
    substrate::{ProcessTable, TermControl, TerminalDevice},
    term::TerminalUnit,
};

/// Returns `(bytes_written, status)`, `status` being `0` on success or `-1` on
/// an out-of-range `unit`, an argument error, or a busy unit. No partial
/// write happens on `-1` either way.
pub async fn term_write(
    units: &[Arc<TerminalUnit>],
    unit: usize,
    device: &dyn TerminalDevice,
    processes: &ProcessTable,
    buf: &[u8],
) -> (i32, i32) {
    let Some(unit) = units.get(unit) else {
        return (-1, -1);
    };

    if buf.len() > unit.max_line_length() {
        return (-1, -1);
    }
    let pid = processes
        .current_pid()
        .expect("term_write called outside a tracked process");

    if unit.begin_write(pid, buf).is_err() {
        return (-1, -1);
    }

    if buf.is_empty() {
        unit.finish_empty_write();
    } else {
        let c = unit.take_first_char();
        device.output(unit.unit(), TermControl::new(Some(c), true, true));
        processes.block_me().await;
    }

    (buf.len() as i32, 0)
}
