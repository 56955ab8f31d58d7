use std::process::ExitCode;

use tracing::error;

mod bootstrap;
mod gameplay;
mod loop_runner;

pub(crate) fn run() -> ExitCode {
    match bootstrap::build_app() {
        Ok(app) => loop_runner::run(app),
        Err(error) => {
            error!(error = %error, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
