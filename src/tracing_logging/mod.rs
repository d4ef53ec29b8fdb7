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

//! Structured logging setup: a display layer, a rolling file layer, or both,
//! composed over `tracing-subscriber`'s registry. No `SharedWriter` display
//! target and no `clap`-parsed writer args — there's no interactive CLI here
//! to pick one at the command line — and no `miette` (errors are
//! `ServiceError`; see `DESIGN.md`).

pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_setup;
pub mod writer_config;

pub use tracing_config::TracingConfig;
pub use tracing_setup::init_tracing;
pub use writer_config::{Destination, WriterConfig};
