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

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::{tracing_config::TracingConfig, writer_config::DynLayer};
use crate::error::ServiceResult;

/// Initializes the global tracing subscriber from `tracing_config`. The file
/// layer (see `rolling_file_appender_impl`) writes synchronously, so there is
/// never a `WorkerGuard` to hold onto; the `Option` is kept in the return type
/// so a future non-blocking writer can be added without changing call sites.
pub fn init_tracing(tracing_config: &TracingConfig) -> ServiceResult<Option<WorkerGuard>> {
    let level_filter = tracing_config.get_level_filter();

    let mut layers: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![Box::new(level_filter)];

    if let Some(layer) = tracing_config.writer_config.try_create_display_layer(level_filter)? {
        layers.push(layer);
    }
    if let Some(layer) = tracing_config.writer_config.try_create_file_layer(level_filter)? {
        layers.push(layer);
    }

    tracing_subscriber::registry().with(layers).init();

    Ok(None)
}
