//! Sanity-check execution against located client binaries.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use toolchest_core::CommandSpec;
use tracing::debug;

/// Run `command` against the binary at `full_path` and validate its output.
///
/// The process's stdout is split into lines and every expected pattern must
/// find at least one matching line. A process that fails to execute at all
/// is a failed check; a non-zero exit with matching output is not.
pub async fn sanity_check(full_path: &Path, command: &CommandSpec) -> bool {
    let output = match Command::new(full_path)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
    {
        Ok(output) => output,
        Err(error) => {
            debug!(binary = %full_path.display(), %error, "sanity check failed to execute");
            return false;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    command.output.iter().all(|pattern| {
        let matched = pattern_matches(pattern, &lines);
        if !matched {
            debug!(binary = %full_path.display(), %pattern, "expected output pattern not matched");
        }
        matched
    })
}

/// Whether one expected pattern matches any output line.
///
/// `prefix:value` requires a line starting with `prefix:` whose remainder
/// equals `value`; a plain pattern requires a line equal to it.
fn pattern_matches(pattern: &str, lines: &[&str]) -> bool {
    match pattern.split_once(':') {
        Some((prefix, expected)) => lines.iter().any(|line| {
            line.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|rest| rest == expected)
        }),
        None => lines.iter().any(|line| *line == pattern),
    }
}
