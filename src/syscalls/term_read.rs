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

//! Blocks the calling process until a complete line is available from the
//! given terminal unit.

use std::sync::Arc;

use crate::term::TerminalUnit;

/// Returns `(data, status)`. `data` is truncated to `cap` bytes when the
/// delivered line is longer; truncation is silent. `status` is `-1` on a
/// zero `cap` or an out-of-range `unit`.
pub async fn term_read(units: &[Arc<TerminalUnit>], unit: usize, cap: usize) -> (Vec<u8>, i32) {
    if cap == 0 {
        return (Vec::new(), -1);
    }
    let Some(unit) = units.get(unit) else {
        return (Vec::new(), -1);
    };

    match unit.read_mbox().recv().await {
        Ok(line) => {
            let n = line.len().min(cap);
            (line[..n].to_vec(), 0)
        }
        Err(_) => (Vec::new(), -1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ServiceConfig, substrate::device::sim::SimHardware};

    fn units(config: &ServiceConfig, hw: &Arc<SimHardware>) -> Vec<Arc<TerminalUnit>> {
        vec![Arc::new(TerminalUnit::new(0, config, hw.terminal_interrupts(0)))]
    }

    #[tokio::test]
    async fn zero_capacity_is_rejected() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let units = units(&config, &hw);
        assert_eq!(term_read(&units, 0, 0).await, (Vec::new(), -1));
    }

    #[tokio::test]
    async fn out_of_range_unit_is_rejected() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let units = units(&config, &hw);
        assert_eq!(term_read(&units, 1, config.max_line_length).await, (Vec::new(), -1));
    }

    #[tokio::test]
    async fn reads_the_line_a_driver_published() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let units = units(&config, &hw);
        units[0].read_mbox().send(b"abc\n".to_vec()).await.unwrap();

        let (data, status) = term_read(&units, 0, config.max_line_length).await;
        assert_eq!(status, 0);
        assert_eq!(data, b"abc\n");
    }

    #[tokio::test]
    async fn a_short_capacity_truncates_silently() {
        let config = ServiceConfig::default();
        let hw = SimHardware::new(&config);
        let units = units(&config, &hw);
        units[0].read_mbox().send(b"abcdef\n".to_vec()).await.unwrap();

        let (data, status) = term_read(&units, 0, 3).await;
        assert_eq!(status, 0);
        assert_eq!(data, b"abc");
    }
}
