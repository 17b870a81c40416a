use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

/// Runtime configuration for the `uniqid` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uniqid",
    version,
    about = "Generate and inspect compact 64-bit unique IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate fresh IDs, one per line.
    Generate {
        /// Server identifier embedded in every ID (1-65535).
        ///
        /// When unset, it is derived from the last two octets of this
        /// machine's outbound IPv4 address.
        ///
        /// Environment variable: `UNIQID_SERVER_ID`
        #[arg(long, env = "UNIQID_SERVER_ID")]
        server_id: Option<u16>,

        /// Number of IDs to generate.
        ///
        /// Environment variable: `UNIQID_COUNT`
        #[arg(short = 'n', long, env = "UNIQID_COUNT", default_value_t = 1)]
        count: u64,

        /// Output representation.
        #[arg(short, long, value_enum, default_value_t = Format::Hex)]
        format: Format,
    },

    /// Print the server identifier encoded in one or more hex IDs.
    ServerId {
        /// 16-character hex IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the outbound IPv4 address and the server identifier derived
    /// from it.
    ExternalIp,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 16 uppercase hex characters.
    Hex,
    /// Decimal `u64`.
    Raw,
    /// `server_id:sequence` in decimal.
    Fields,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Config {
    Generate {
        server_id: Option<u16>,
        count: u64,
        format: Format,
    },
    ServerId {
        ids: Vec<String>,
    },
    ExternalIp,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        match args.command {
            Command::Generate {
                server_id,
                count,
                format,
            } => {
                if server_id == Some(0) {
                    bail!("UNIQID_SERVER_ID must be greater than 0 (0 is reserved)");
                }
                if count == 0 {
                    bail!("UNIQID_COUNT must be greater than 0");
                }
                Ok(Self::Generate {
                    server_id,
                    count,
                    format,
                })
            }
            Command::ServerId { ids } => {
                for id in &ids {
                    uniqid::decode_hex(id.as_bytes())
                        .with_context(|| format!("invalid id `{id}`"))?;
                }
                Ok(Self::ServerId { ids })
            }
            Command::ExternalIp => Ok(Self::ExternalIp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("uniqid").chain(args.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let config = parse(&["generate", "--server-id", "77"]).unwrap();
        assert_eq!(
            config,
            Config::Generate {
                server_id: Some(77),
                count: 1,
                format: Format::Hex,
            }
        );
    }

    #[test]
    fn generate_rejects_reserved_server_id() {
        let err = parse(&["generate", "--server-id", "0"]).unwrap_err();
        assert!(err.to_string().contains("reserved"), "{err}");
    }

    #[test]
    fn generate_rejects_zero_count() {
        assert!(parse(&["generate", "--server-id", "1", "-n", "0"]).is_err());
    }

    #[test]
    fn generate_rejects_out_of_range_server_id() {
        assert!(parse(&["generate", "--server-id", "65536"]).is_err());
    }

    #[test]
    fn server_id_validates_inputs() {
        let config = parse(&["server-id", "004D00000000002A", "ffff000000000000"]).unwrap();
        assert_eq!(
            config,
            Config::ServerId {
                ids: vec!["004D00000000002A".into(), "ffff000000000000".into()],
            }
        );
        assert!(parse(&["server-id", "zzzz000000000000"]).is_err());
        assert!(parse(&["server-id", "004D"]).is_err());
        assert!(parse(&["server-id"]).is_err());
    }
}
