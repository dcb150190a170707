//! SIGINT wiring shared by the session loop and in-flight provider calls.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chat_provider::CancelSignal;
use signal_hook::consts::SIGINT;
use signal_hook::flag;

use crate::error::KitError;

/// Exit status used when a second interrupt arrives before the first was handled.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Routes SIGINT into a shared flag.
///
/// The first interrupt only raises the flag so a running request is cancelled
/// and the session is saved. A second one terminates the process.
pub fn install() -> Result<CancelSignal, KitError> {
    let interrupted = Arc::new(AtomicBool::new(false));

    flag::register_conditional_shutdown(SIGINT, FORCED_EXIT_CODE, Arc::clone(&interrupted))
        .map_err(|source| KitError::io("installing interrupt handler", source))?;
    flag::register(SIGINT, Arc::clone(&interrupted))
        .map_err(|source| KitError::io("installing interrupt handler", source))?;

    Ok(interrupted)
}
