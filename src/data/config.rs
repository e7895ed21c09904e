use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use serenity::model::id::{GuildId, RoleId};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_INTERVAL_SECS: u64 = 10;
/// Keeps `Instant::now() + interval` from overflowing in the cycle loop.
const MAX_INTERVAL_SECS: u64 = u32::MAX as u64;

#[derive(Parser, Debug, Default)]
#[command(
    name = "rainbow-role",
    version,
    about = "Cycles a Discord role's colour through the rainbow"
)]
pub(crate) struct Cli {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// Discord guild ID
    #[arg(long)]
    pub(crate) guild: Option<String>,

    /// Discord role ID
    #[arg(long)]
    pub(crate) role: Option<String>,

    /// Interval in seconds to change the role colour [default: 10]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS))]
    pub(crate) interval: Option<u64>,

    /// JSON file providing token, guild_id, role_id and interval
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
}

/// Rewrites `-token` / `-token=x` into `--token` / `--token=x` so the bot
/// keeps accepting the single-dash flags it has always been launched with.
/// Single-letter flags like `-h` are left alone.
pub(crate) fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(position, arg)| {
            let arg = arg.into();
            if position == 0 {
                return arg;
            }
            match arg.to_str() {
                Some(flag) if is_single_dash_long(flag) => OsString::from(format!("-{}", flag)),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let rest = match arg.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') => rest,
        _ => return false,
    };
    let name = rest.split('=').next().unwrap_or_default();
    name.len() > 1 && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// Contents of the optional `--config` JSON file.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) token: Option<String>,
    pub(crate) guild_id: Option<u64>,
    pub(crate) role_id: Option<u64>,
    pub(crate) interval: Option<u64>,
}

impl FileConfig {
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

pub(crate) struct Config {
    pub(crate) token: String,
    pub(crate) guild_id: GuildId,
    pub(crate) role_id: RoleId,
    pub(crate) interval: Duration,
}

impl Config {
    pub(crate) fn load(cli: Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Flags (and `DISCORD_TOKEN`, which clap folds into `cli.token`) win over
    /// the file; the file wins over the defaults.
    pub(crate) fn resolve(cli: Cli, file: FileConfig) -> Result<Self> {
        let token = non_empty(cli.token).or_else(|| non_empty(file.token));
        let guild = non_empty(cli.guild).or_else(|| file.guild_id.map(|id| id.to_string()));
        let role = non_empty(cli.role).or_else(|| file.role_id.map(|id| id.to_string()));

        let (token, guild, role) = match (token, guild, role) {
            (Some(token), Some(guild), Some(role)) => (token, guild, role),
            _ => bail!("Token, Guild ID, and Role ID are required."),
        };

        let interval = cli.interval.or(file.interval).unwrap_or(DEFAULT_INTERVAL_SECS);
        if !(1..=MAX_INTERVAL_SECS).contains(&interval) {
            bail!(
                "Interval must be between 1 and {} seconds.",
                MAX_INTERVAL_SECS
            );
        }

        Ok(Config {
            token,
            guild_id: GuildId(parse_snowflake("Guild", &guild)?),
            role_id: RoleId(parse_snowflake("Role", &role)?),
            interval: Duration::from_secs(interval),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("role_id", &self.role_id)
            .field("interval", &self.interval)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_snowflake(what: &str, raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(anyhow!("{} ID '{}' is not a valid Discord ID.", what, raw)),
    }
}
