//! [`VaultClient`] backed by the 1Password `op` command line tool.

use std::process::Command;

use super::{ItemFilter, VaultClient};
use crate::error::{DedupeError, DedupeResult};
use crate::item::LoginItem;

/// Runs `op` subcommands synchronously and decodes their output.
///
/// Authentication is left to `op` itself (desktop app integration,
/// `OP_SESSION_*` or a service account token in the environment).
#[derive(Debug, Clone)]
pub struct OpCli {
    program: String,
}

impl Default for OpCli {
    fn default() -> Self {
        Self::new("op")
    }
}

impl OpCli {
    /// Use `program` as the `op` executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Execute `op` with `args` and return its stdout.
    fn run(&self, args: &[String]) -> DedupeResult<String> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, "Running vault CLI");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| DedupeError::CommandSpawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DedupeError::CommandFailed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VaultClient for OpCli {
    fn list_login_items(&self, filter: &ItemFilter) -> DedupeResult<Vec<LoginItem>> {
        let stdout = self.run(&list_args(filter))?;
        let items = LoginItem::list_from_json(&stdout)?;
        tracing::info!(count = items.len(), "Listed login items");
        Ok(items)
    }

    fn password(&self, vault_id: &str, item_id: &str) -> DedupeResult<String> {
        self.run(&["read".to_string(), password_reference(vault_id, item_id)])
            .map(|stdout| strip_line_ending(&stdout).to_string())
            .map_err(|e| DedupeError::Retrieval {
                field: "password",
                item_id: item_id.to_string(),
                message: e.to_string(),
            })
    }

    fn otp(&self, item_id: &str) -> DedupeResult<Option<u32>> {
        let args = ["item", "get", item_id, "--otp"].map(String::from);
        let stdout = self.run(&args).map_err(|e| DedupeError::Retrieval {
            field: "one-time password",
            item_id: item_id.to_string(),
            message: e.to_string(),
        })?;
        Ok(parse_otp(&stdout))
    }

    fn delete_item(&self, item_id: &str, archive: bool) -> DedupeResult<()> {
        self.run(&delete_args(item_id, archive)).map(|_| ())
    }
}

fn list_args(filter: &ItemFilter) -> Vec<String> {
    let mut args: Vec<String> = ["item", "list", "--categories", "Login", "--format=json"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if let Some(vault) = &filter.vault {
        args.push("--vault".to_string());
        args.push(vault.clone());
    }
    if !filter.tags.is_empty() {
        args.push("--tags".to_string());
        args.push(filter.tags.join(","));
    }
    args
}

/// Secret reference for an item's password. Ids are used for both path
/// segments since vault names may contain characters references reject.
fn password_reference(vault_id: &str, item_id: &str) -> String {
    format!("op://{vault_id}/{item_id}/password")
}

fn delete_args(item_id: &str, archive: bool) -> Vec<String> {
    let mut args = vec!["item".to_string(), "delete".to_string(), item_id.to_string()];
    if archive {
        args.push("--archive".to_string());
    }
    args
}

/// A numeric code means the item has an OTP. Empty or other output means it does not.
fn parse_otp(stdout: &str) -> Option<u32> {
    strip_line_ending(stdout).trim().parse().ok()
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_without_filter() {
        let args = list_args(&ItemFilter::default());
        assert_eq!(args, vec!["item", "list", "--categories", "Login", "--format=json"]);
    }

    #[test]
    fn test_list_args_with_vault_and_tags() {
        let filter = ItemFilter {
            vault: Some("Work".to_string()),
            tags: vec!["shared".to_string(), "old".to_string()],
        };
        let args = list_args(&filter);
        assert_eq!(
            args,
            vec!["item", "list", "--categories", "Login", "--format=json", "--vault", "Work", "--tags", "shared,old"]
        );
    }

    #[test]
    fn test_delete_args() {
        assert_eq!(delete_args("abc", false), vec!["item", "delete", "abc"]);
        assert_eq!(delete_args("abc", true), vec!["item", "delete", "abc", "--archive"]);
    }

    #[test]
    fn test_password_reference_uses_ids() {
        assert_eq!(
            password_reference("x5k2qjv3lq6vdoyn7u4eb3xgwe", "abc"),
            "op://x5k2qjv3lq6vdoyn7u4eb3xgwe/abc/password"
        );
    }

    #[test]
    fn test_parse_otp() {
        assert_eq!(parse_otp("123456\n"), Some(123456));
        assert_eq!(parse_otp("012345\r\n"), Some(12345));
        assert_eq!(parse_otp(""), None);
        assert_eq!(parse_otp("\n"), None);
        assert_eq!(parse_otp("not a code"), None);
    }

    #[test]
    fn test_strip_line_ending_keeps_inner_whitespace() {
        assert_eq!(strip_line_ending("pass word \n"), "pass word ");
        assert_eq!(strip_line_ending("secret\r\n"), "secret");
        assert_eq!(strip_line_ending("secret"), "secret");
    }

    #[test]
    fn test_missing_binary_is_a_spawn_error() {
        let cli = OpCli::new("/nonexistent/path/to/op");
        let err = cli.delete_item("abc", false).unwrap_err();
        assert!(matches!(err, DedupeError::CommandSpawn { .. }));
    }

    #[test]
    fn test_missing_binary_password_is_a_retrieval_error() {
        let cli = OpCli::new("/nonexistent/path/to/op");
        let err = cli.password("x5k2qjv3lq6vdoyn7u4eb3xgwe", "abc").unwrap_err();
        assert!(matches!(err, DedupeError::Retrieval { field: "password", .. }));
    }
}
