//! Command line arguments.

use clap::Parser;

use crate::dedupe::DedupeOptions;
use crate::logging::{LogFormat, LogLevel};
use crate::vault_client::ItemFilter;

/// Remove duplicate logins from your 1Password vault
#[derive(Debug, Clone, Parser)]
#[command(name = "op-dedupe", version, about)]
pub struct Cli {
    /// Output the items to be removed without actually removing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Don't prompt for delete confirmation
    #[arg(short = 'y', long, visible_alias = "no-prompt")]
    pub yes: bool,

    /// Only search for duplicates in the specified vault
    #[arg(long, value_name = "VAULT", env = "OP_DEDUPE_VAULT")]
    pub vault: Option<String>,

    /// Only search for duplicates with the specified tags
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Archive duplicates instead of deleting them
    #[arg(long)]
    pub archive: bool,

    /// Ignore favorites
    #[arg(long)]
    pub ignore_favorites: bool,

    /// Path to the 1Password CLI
    #[arg(long, value_name = "PATH", env = "OP_DEDUPE_OP_BIN", default_value = "op")]
    pub op_bin: String,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn dedupe_options(&self) -> DedupeOptions {
        DedupeOptions {
            dry_run: self.dry_run,
            prompt: !self.yes,
            archive: self.archive,
            ignore_favorites: self.ignore_favorites,
        }
    }

    pub fn item_filter(&self) -> ItemFilter {
        ItemFilter {
            vault: self.vault.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("op-dedupe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_prompt_and_delete() {
        let cli = parse(&[]);
        assert_eq!(cli.dedupe_options(), DedupeOptions::default());
        assert_eq!(cli.op_bin, "op");
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = parse(&["-d", "-y", "--archive", "--ignore-favorites"]);
        assert_eq!(
            cli.dedupe_options(),
            DedupeOptions {
                dry_run: true,
                prompt: false,
                archive: true,
                ignore_favorites: true,
            }
        );
    }

    #[test]
    fn test_no_prompt_alias() {
        assert!(!parse(&["--no-prompt"]).dedupe_options().prompt);
    }

    #[test]
    fn test_vault_and_repeated_tags() {
        let cli = parse(&["--vault", "Work", "--tag", "shared", "--tag", "old"]);
        assert_eq!(
            cli.item_filter(),
            ItemFilter {
                vault: Some("Work".to_string()),
                tags: vec!["shared".to_string(), "old".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["op-dedupe", "--frobnicate"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
