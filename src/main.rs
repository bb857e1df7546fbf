use crate::log::Logger;
use crate::telegram::ReqwestTransport;
use anyhow::Result;
use std::process::ExitCode;

mod config;
mod error;
mod event;
mod log;
mod notify;
mod telegram;

fn main() -> Result<ExitCode> {
    let config = config::get_config()?;
    let log = log::get_logger(&config);

    let panic_log = log.clone();
    std::panic::set_hook(Box::new(move |info| {
        panic_log.panic(info);
    }));

    log.start();

    let event = event::get_push_event(&config, &log);

    let transport = match ReqwestTransport::new(config.timeout) {
        Ok(transport) => transport,
        Err(e) => {
            log.error(&format!("Error sending message: {}", e));
            return Ok(ExitCode::FAILURE);
        }
    };

    match notify::notify(&config, &transport, &log, &event) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        // Already logged; the exit code lets the CI step decide whether this is fatal.
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
