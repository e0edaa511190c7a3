//! Error report text for `exception` log calls

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::Write;

/// Default message used when `exception` is called without context
pub const DEFAULT_EXCEPTION_MESSAGE: &str = "Exception occurred";

/// Build the message body for an exception record
///
/// The body is `message`, then the error and each of its sources on their
/// own line, then the captured backtrace when `RUST_BACKTRACE` enables it.
pub fn exception_text(message: &str, error: &(dyn StdError + 'static)) -> String {
    let mut text = String::from(message);
    let _ = write!(text, "\nError: {}", error);

    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\nCaused by: {}", cause);
        source = cause.source();
    }

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        let _ = write!(text, "\nBacktrace:\n{}", backtrace);
    }

    text
}
