//! Command-line argument definitions.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use piwallet_settings::BoolSetting;

/// Inspect and edit a piwallet settings file.
///
/// All reads and writes go through the same typed settings layer the wallet
/// uses, so defaults, currency validation and the legacy digit upgrade apply
/// here exactly as they do in the app.
#[derive(Debug, Parser)]
#[command(name = "piwallet-prefs", version)]
pub struct Cli {
    /// Settings file to operate on.  Defaults to the platform config directory.
    #[arg(long, global = true, env = "PIWALLET_SETTINGS_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print every setting as the wallet would read it.
    Show {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List the raw keys present in the file.
    Keys,
    /// Set a boolean preference.
    SetFlag {
        flag: FlagArg,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
    /// Set the display currency (stored verbatim, validated on read).
    SetCurrency { code: String },
    /// Set the maximum number of displayed digits.
    SetMaxDigits { digits: i64 },
    /// Configure a custom node.
    SetNode { host: Ipv4Addr, port: u16 },
    /// Remove the custom node.
    ClearNode,
    /// Record that the recovery phrase was written down now.
    MarkBackedUp,
    /// Delete the legacy "wallet needs backup" flag.
    RemoveLegacyBackupFlag,
}

impl Command {
    /// Returns `true` for commands that write to the store.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::Show { .. } | Command::Keys)
    }
}

/// Command-line names for [`BoolSetting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagArg {
    BiometricsEnabled,
    ShareDataPermission,
    AmountSwapped,
    PromptedShareData,
    PromptedBiometrics,
    ShownWelcome,
}

impl From<FlagArg> for BoolSetting {
    fn from(flag: FlagArg) -> Self {
        match flag {
            FlagArg::BiometricsEnabled => BoolSetting::BiometricsEnabled,
            FlagArg::ShareDataPermission => BoolSetting::HasAcquiredShareDataPermission,
            FlagArg::AmountSwapped => BoolSetting::IsAmountSwapped,
            FlagArg::PromptedShareData => BoolSetting::HasPromptedShareData,
            FlagArg::PromptedBiometrics => BoolSetting::HasPromptedBiometrics,
            FlagArg::ShownWelcome => BoolSetting::HasShownWelcome,
        }
    }
}

/// The command-line name of a boolean setting.
pub fn flag_name(setting: BoolSetting) -> &'static str {
    match setting {
        BoolSetting::BiometricsEnabled => "biometrics-enabled",
        BoolSetting::HasAcquiredShareDataPermission => "share-data-permission",
        BoolSetting::IsAmountSwapped => "amount-swapped",
        BoolSetting::HasPromptedShareData => "prompted-share-data",
        BoolSetting::HasPromptedBiometrics => "prompted-biometrics",
        BoolSetting::HasShownWelcome => "shown-welcome",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_flag() {
        let cli = Cli::try_parse_from(["piwallet-prefs", "set-flag", "amount-swapped", "true"])
            .expect("valid args");
        assert_eq!(
            cli.command,
            Command::SetFlag {
                flag: FlagArg::AmountSwapped,
                value: true
            }
        );
        assert!(cli.command.is_mutating());
    }

    #[test]
    fn test_parse_set_node_requires_ipv4_host() {
        let ok = Cli::try_parse_from(["piwallet-prefs", "set-node", "10.0.0.2", "9333"]);
        assert!(ok.is_ok());

        let bad = Cli::try_parse_from(["piwallet-prefs", "set-node", "node.example", "9333"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_file_option_is_global() {
        let cli = Cli::try_parse_from(["piwallet-prefs", "show", "--file", "/tmp/s.toml"])
            .expect("valid args");
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/s.toml")));
        assert!(!cli.command.is_mutating());
    }

    #[test]
    fn test_flag_names_match_value_enum_names() {
        for flag in FlagArg::value_variants() {
            let name = flag.to_possible_value().expect("visible").get_name().to_string();
            assert_eq!(name, flag_name(BoolSetting::from(*flag)));
        }
    }
}
