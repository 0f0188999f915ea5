//! CLI argument definitions using clap
//!
//! Commands:
//! - schemata models --config <path>
//! - schemata schema --config <path> --model <name>
//! - schemata validate --config <path> --model <name> [--mapping <name>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemata - declarative, schema-driven records
#[derive(Parser, Debug)]
#[command(name = "schemata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List declared model types
    Models {
        /// Path to configuration file
        #[arg(long, default_value = "./schemata.json")]
        config: PathBuf,
    },

    /// Print a model type's resolved schema and mapping names
    Schema {
        /// Path to configuration file
        #[arg(long, default_value = "./schemata.json")]
        config: PathBuf,

        /// Model type name
        #[arg(long)]
        model: String,
    },

    /// Construct and validate one record per stdin line
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./schemata.json")]
        config: PathBuf,

        /// Model type name
        #[arg(long)]
        model: String,

        /// Named mapping to apply to each input record
        #[arg(long)]
        mapping: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_with_mapping() {
        let cli = Cli::try_parse_from([
            "schemata", "validate", "--model", "Person", "--mapping", "ldap",
        ])
        .unwrap();

        match cli.command {
            Command::Validate {
                config,
                model,
                mapping,
            } => {
                assert_eq!(config, PathBuf::from("./schemata.json"));
                assert_eq!(model, "Person");
                assert_eq!(mapping.as_deref(), Some("ldap"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_schema_requires_model() {
        assert!(Cli::try_parse_from(["schemata", "schema"]).is_err());
    }
}
