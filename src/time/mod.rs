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

//! The time base and the sleep queue built on top of it.

pub mod sleep_queue;

pub use sleep_queue::*;

/// A monotonically non-decreasing tick counter, one tick per clock interrupt.
/// Nominally 100ms per tick, so 10 ticks is a second of simulated wall time.
pub type Tick = u64;
