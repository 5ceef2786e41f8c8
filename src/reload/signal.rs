use std::io;

use tracing::{debug, warn};

use super::errors::{ReloadError, ReloadResult, SignalFailure};

/// Deliver SIGHUP to every pid in the set, exactly once each.
///
/// Delivery is attempted for the whole set even when some targets fail,
/// then the failed part is reported as one aggregate error; signals that
/// already went out are not undone, since signal delivery is not
/// transactional. A target that exited between matching and this call shows
/// up here as a failed pid, not a crash.
pub fn signal_reload(pids: &[i32]) -> ReloadResult<()> {
    let mut failed = Vec::new();

    for &pid in pids {
        // Safety: kill(2) with a valid signal number has no memory effects.
        let rc = unsafe { libc::kill(pid, libc::SIGHUP) };
        if rc == 0 {
            debug!(pid, "sent SIGHUP");
        } else {
            let source = io::Error::last_os_error();
            warn!(pid, error = %source, "failed to send SIGHUP");
            failed.push(SignalFailure { pid, source });
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ReloadError::SignalDeliveryFailed { failed })
    }
}
