//! Password resolution via external commands.
//!
//! Secrets never live in the config file; a `password_cmd` option names a
//! command (e.g. `pass show caldav`) whose first line of stdout is the
//! password.

use crate::command::run_command;
use crate::error::RunResult;

/// Runs a password command and returns the first line of its output.
pub async fn resolve_password(cmd: &str) -> RunResult<String> {
    let output = run_command(cmd, b"").await?;
    let text = String::from_utf8_lossy(&output);
    Ok(text.lines().next().unwrap_or_default().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn takes_first_line_trimmed() {
        let password = resolve_password("printf 's3cret \\nextra'").await.unwrap();
        assert_eq!(password, "s3cret");
    }

    #[tokio::test]
    async fn failing_command_propagates() {
        assert!(resolve_password("exit 1").await.is_err());
    }
}
