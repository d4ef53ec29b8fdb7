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

//! Concrete stand-ins for the collaborators this crate builds on top of but
//! doesn't itself define: the process kernel, the mailbox primitive, the
//! counting semaphore, and the device abstraction. This crate needs running
//! code behind those interfaces to build and to be tested, without
//! prescribing their policy. A consumer embedding the device-services layer
//! in a real kernel supplies its own `Processes` implementation and its own
//! `ClockDevice`/`TerminalDevice`; the rest of this crate only ever depends on
//! the traits in this module, never on `tokio` directly outside of it.

pub mod device;
pub mod mailbox;
pub mod process;
pub mod semaphore;

pub use device::*;
pub use mailbox::*;
pub use process::*;
pub use semaphore::*;
