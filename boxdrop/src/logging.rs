// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Global logging setup
//!
//! Installs a `tracing-subscriber` registry writing compact lines to stdout.
//! The filter starts from [`DEFAULT_FILTER`] and is extended by `RUST_LOG`,
//! so `RUST_LOG=boxdrop=debug` turns on per-contact logging.

use std::{env, panic};
use tracing::{error, info, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{
    fmt::{self, time::uptime},
    prelude::*,
    EnvFilter, Registry,
};

/// Default filter: this crate at info, everything else at warn
pub const DEFAULT_FILTER: &str = "warn,boxdrop=info";

/// Build the filter directive string from the default and an optional `RUST_LOG` value
pub fn filter_directives(env_filter: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(extra) = env_filter.filter(|s| !s.trim().is_empty()) {
        filter.push(',');
        filter.push_str(extra);
    }
    filter
}

/// Install the global `tracing` subscriber
///
/// Fails if a global subscriber is already installed. Panic messages are
/// routed through the log as errors once this succeeds.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer().event_format(format);

    let env_filter = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_directives(env_filter.as_deref());

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)?;
    info!("starting boxdrop");

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!("{}", info);
        default_hook(info);
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_env() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("  ")), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_extends_default() {
        assert_eq!(
            filter_directives(Some("boxdrop=debug")),
            "warn,boxdrop=info,boxdrop=debug"
        );
    }
}
