use procfs::process::all_processes;
use regex::Regex;
use tracing::debug;

use super::errors::{ReloadError, ReloadResult};

/// Scan the live process table and return every pid whose command line
/// matches `pattern`.
///
/// Entries that cannot be read are skipped instead of failing the scan: a
/// process that exits between enumeration and its cmdline read simply does
/// not appear in the result. Only an unreadable process table itself is an
/// error, so callers can tell "zero matches" apart from a failed scan.
pub fn find_matching_pids(pattern: &Regex) -> ReloadResult<Vec<i32>> {
    let entries =
        all_processes().map_err(|e| ReloadError::ProcessTableUnavailable(e.to_string()))?;

    let mut pids = Vec::new();
    for entry in entries {
        let process = match entry {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "skipping inaccessible process");
                continue;
            }
        };

        // The read races with process exit; kernel threads have no cmdline.
        let cmdline = match process.cmdline() {
            Ok(args) => args.join(" "),
            Err(e) => {
                debug!(pid = process.pid, error = %e, "skipping process without readable cmdline");
                continue;
            }
        };

        if pattern.is_match(&cmdline) {
            pids.push(process.pid);
        }
    }

    Ok(pids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_current_process() {
        // Every process with a readable cmdline matches ".".
        let pattern = Regex::new(".").unwrap();

        let pids = find_matching_pids(&pattern).unwrap();

        let own_pid = std::process::id() as i32;
        assert!(pids.contains(&own_pid));
    }

    #[test]
    fn pids_are_unique() {
        let pattern = Regex::new(".").unwrap();

        let mut pids = find_matching_pids(&pattern).unwrap();
        let scanned = pids.len();
        pids.sort_unstable();
        pids.dedup();

        assert_eq!(pids.len(), scanned);
    }

    #[test]
    fn zero_matches_is_not_an_error() {
        let pattern = Regex::new("c0ffee-no-process-runs-under-this-name").unwrap();

        let pids = find_matching_pids(&pattern).unwrap();

        assert!(pids.is_empty());
    }
}
