use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

const DEFAULT_GROUP_NAME: &str = "room1";
const DEFAULT_ROUTE: &str = "chat.msg";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Name of the session group to create
    #[arg(long, env, default_value = DEFAULT_GROUP_NAME)]
    group_name: String,

    /// Number of channel-backed sessions to join to the group
    #[arg(long, env, default_value_t = 3)]
    pub demo_members: u32,

    /// Route label attached to messages pushed to the group
    #[arg(long, env, default_value = DEFAULT_ROUTE)]
    route: String,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Returns the route label used for demo pushes.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_env_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));
    }

    #[test]
    fn test_rust_env_display_round_trips() {
        for env in [RustEnv::Development, RustEnv::Production, RustEnv::Staging] {
            assert_eq!(env.to_string().parse::<RustEnv>(), Ok(env));
        }
    }

    #[test]
    fn test_config_parses_explicit_flags() {
        let config = Config::try_parse_from([
            "session_group_rs",
            "--group-name",
            "lobby",
            "--demo-members",
            "5",
            "--route",
            "lobby.notice",
            "--log-level-filter",
            "DEBUG",
            "--runtime-env",
            "production",
        ])
        .unwrap();

        assert_eq!(config.group_name(), "lobby");
        assert_eq!(config.demo_members, 5);
        assert_eq!(config.route(), "lobby.notice");
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
        assert!(config.is_production());
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let result =
            Config::try_parse_from(["session_group_rs", "--log-level-filter", "VERBOSE"]);
        assert!(result.is_err());
    }
}
