//! Tracing setup for the binary.
//!
//! - `STUDY_LOG` sets the filter (e.g. "debug" or "info,services=debug").
//! - `STUDY_LOG_FORMAT=json` switches to JSON lines.
//!
//! Logs go to stderr so they never interleave with the rendered session.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STUDY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match std::env::var("STUDY_LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
