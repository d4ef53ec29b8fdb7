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
use tracing_subscriber::{registry::LookupSpan, Layer};

use super::rolling_file_appender_impl;
use crate::error::ServiceResult;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(true)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Where display-oriented (non-file) logs go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Stderr,
}

/// Where to send logs. No `SharedWriter` variant here — that writer exists to
/// share one interactive terminal between readline input and concurrent
/// output, which this crate has no equivalent of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(Destination),
    File(String /* path and prefix */),
    DisplayAndFile(Destination, String),
}

impl WriterConfig {
    /// Erases the concrete writer type so display and file layers can be
    /// composed uniformly.
    pub fn try_create_display_layer<S>(&self, level_filter: LevelFilter) -> ServiceResult<Option<Box<DynLayer<S>>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt_layer = create_fmt!();
        Ok(match self {
            WriterConfig::Display(dest) | WriterConfig::DisplayAndFile(dest, _) => Some(match dest {
                Destination::Stdout => {
                    Box::new(fmt_layer.with_writer(std::io::stdout).with_filter(level_filter)) as Box<DynLayer<S>>
                }
                Destination::Stderr => {
                    Box::new(fmt_layer.with_writer(std::io::stderr).with_filter(level_filter)) as Box<DynLayer<S>>
                }
            }),
            _ => None,
        })
    }

    pub fn try_create_file_layer<S>(&self, level_filter: LevelFilter) -> ServiceResult<Option<Box<DynLayer<S>>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt_layer = create_fmt!();
        Ok(match self {
            WriterConfig::File(path) | WriterConfig::DisplayAndFile(_, path) => {
                let file = rolling_file_appender_impl::try_create(path)?;
                Some(Box::new(fmt_layer.with_writer(file).with_filter(level_filter)))
            }
            _ => None,
        })
    }
}
