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

use tracing_core::LevelFilter;

use super::writer_config::{Destination, WriterConfig};

/// Configures where structured logs go and at what level. Consumed by
/// [`super::tracing_setup::init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level: tracing::Level,
}

impl TracingConfig {
    pub fn new(writer_config: WriterConfig, level: tracing::Level) -> Self {
        Self { writer_config, level }
    }

    pub fn get_level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.level)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            writer_config: WriterConfig::Display(Destination::Stdout),
            level: tracing::Level::INFO,
        }
    }
}
