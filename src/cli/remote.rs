//! Remote execution against the REST backend.

use bookline::backend::RestBackend;
use bookline::config::Config;
use bookline::error::Result;
use bookline::service::Scheduler;
use bookline::session::Session;

/// Build a scheduler talking to the configured backend, authenticated as
/// the persisted session's user. `url` overrides the configured base URL.
pub fn connect(config: &Config, url: Option<&str>) -> Result<Scheduler<RestBackend>> {
    let session = Session::load(config.session_file());
    let backend = RestBackend::new(
        url.unwrap_or(&config.backend.url),
        session.auth_header().map(str::to_string),
        config.backend.timeout_secs,
    )?;
    Ok(Scheduler::new(backend))
}
