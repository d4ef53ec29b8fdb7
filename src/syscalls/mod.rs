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

//! The three blocking services this crate exists to provide, plus
//! (`dispatch`) the call-number-indexed table that installs them.

pub mod dispatch;
pub mod sleep;
pub mod term_read;
pub mod term_write;

pub use dispatch::{SyscallArgs, SyscallNumber, SyscallOutcome, SyscallTable};
pub use sleep::sleep;
pub use term_read::term_read;
pub use term_write::term_write;
