use anyhow::{Context, Result, bail};
use mk_serve::duration::parse_duration;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_HOME: &str = ".mk/mocks";
pub const DEFAULT_MAX_DELAY: &str = "60s";
pub const DEFAULT_CLEAN_INTERVAL: &str = "60s";

/// Values given on the command line; anything left out falls back to `MK_*`
/// environment variables, then to the defaults above.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct ServeArgs {
    /// Port to listen on [env: MK_PORT]
    #[arg(long)]
    pub port: Option<u16>,
    /// Address to bind [env: MK_BIND]
    #[arg(long)]
    pub bind: Option<IpAddr>,
    /// Directory holding one file per mock [env: MK_HOME]
    #[arg(long)]
    pub home: Option<PathBuf>,
    /// Ceiling for the `delay` a request may ask for, e.g. 60s [env: MK_MAX_DELAY]
    #[arg(long)]
    pub max_delay: Option<String>,
    /// Keep at most this many mocks; 0 disables the cleaner [env: MK_MAX_RECORDS]
    #[arg(long)]
    pub max_records: Option<i64>,
    /// How often the cleaner runs, e.g. 60s [env: MK_CLEAN_INTERVAL]
    #[arg(long)]
    pub clean_interval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub addr: SocketAddr,
    pub home: PathBuf,
    pub max_delay: Duration,
    pub max_records: i64,
    pub clean_interval: Duration,
}

impl ServeConfig {
    pub fn resolve(args: ServeArgs) -> Result<Self> {
        Self::resolve_with(args, |key| std::env::var(key).ok())
    }

    fn resolve_with<F>(args: ServeArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match args.port {
            Some(port) => port,
            None => match env("MK_PORT") {
                Some(value) => value
                    .parse()
                    .with_context(|| format!("invalid MK_PORT: {value}"))?,
                None => DEFAULT_PORT,
            },
        };
        let bind = match args.bind {
            Some(bind) => bind,
            None => env("MK_BIND")
                .unwrap_or_else(|| DEFAULT_BIND.to_string())
                .parse()
                .context("invalid bind address")?,
        };
        let home = args
            .home
            .or_else(|| env("MK_HOME").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));
        let max_delay = duration_setting(
            "max delay",
            args.max_delay.or_else(|| env("MK_MAX_DELAY")),
            DEFAULT_MAX_DELAY,
        )?;
        let max_records = match args.max_records {
            Some(limit) => limit,
            None => match env("MK_MAX_RECORDS") {
                Some(value) => value
                    .parse()
                    .with_context(|| format!("invalid MK_MAX_RECORDS: {value}"))?,
                None => 0,
            },
        };
        let clean_interval = duration_setting(
            "clean interval",
            args.clean_interval.or_else(|| env("MK_CLEAN_INTERVAL")),
            DEFAULT_CLEAN_INTERVAL,
        )?;
        if clean_interval.is_zero() {
            bail!("clean interval must be greater than zero");
        }

        Ok(Self {
            addr: SocketAddr::new(bind, port),
            home,
            max_delay,
            max_records,
            clean_interval,
        })
    }
}

fn duration_setting(name: &str, value: Option<String>, default: &str) -> Result<Duration> {
    let value = value.unwrap_or_else(|| default.to_string());
    match parse_duration(&value) {
        Some(duration) => Ok(duration),
        None => bail!("invalid {name}: {value} (expected e.g. 500ms, 30s, 5m)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(args: ServeArgs, vars: &[(&str, &str)]) -> Result<ServeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ServeConfig::resolve_with(args, |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = resolve(ServeArgs::default(), &[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3333".parse().unwrap());
        assert_eq!(config.home, PathBuf::from(DEFAULT_HOME));
        assert_eq!(config.max_delay, Duration::from_secs(60));
        assert_eq!(config.max_records, 0);
        assert_eq!(config.clean_interval, Duration::from_secs(60));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = resolve(
            ServeArgs::default(),
            &[
                ("MK_PORT", "4000"),
                ("MK_HOME", "/tmp/mocks"),
                ("MK_MAX_DELAY", "1500ms"),
                ("MK_MAX_RECORDS", "25"),
            ],
        )
        .unwrap();
        assert_eq!(config.addr.port(), 4000);
        assert_eq!(config.home, PathBuf::from("/tmp/mocks"));
        assert_eq!(config.max_delay, Duration::from_millis(1500));
        assert_eq!(config.max_records, 25);
    }

    #[test]
    fn flags_override_environment() {
        let args = ServeArgs {
            port: Some(5000),
            max_delay: Some("2s".to_string()),
            ..ServeArgs::default()
        };
        let config = resolve(args, &[("MK_PORT", "4000"), ("MK_MAX_DELAY", "9s")]).unwrap();
        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.max_delay, Duration::from_secs(2));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(resolve(ServeArgs::default(), &[("MK_PORT", "http")]).is_err());
        assert!(resolve(ServeArgs::default(), &[("MK_MAX_DELAY", "forever")]).is_err());
        assert!(resolve(ServeArgs::default(), &[("MK_CLEAN_INTERVAL", "0s")]).is_err());
    }
}
