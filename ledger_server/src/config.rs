use std::{env, str::FromStr, time::Duration};

use ledger_common::helpers::parse_boolean_flag;
use ledger_engine::{commission::CommissionRate, settings::LedgerSettings};
use log::*;

const DEFAULT_LGR_HOST: &str = "127.0.0.1";
const DEFAULT_LGR_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/ledger.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_UNIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, pending database migrations are applied before the server starts accepting requests.
    pub run_migrations: bool,
    /// The fraction of each settled order that is credited to the platform wallet.
    pub commission_rate: CommissionRate,
    /// The user that owns the platform wallet. When unset, the lowest-id admin is used.
    pub platform_user_id: Option<i64>,
    /// Upper bound on the duration of one atomic ledger unit.
    pub unit_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LGR_HOST.to_string(),
            port: DEFAULT_LGR_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            commission_rate: CommissionRate::default(),
            platform_user_id: None,
            unit_timeout: DEFAULT_UNIT_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LGR_HOST").ok().unwrap_or_else(|| DEFAULT_LGR_HOST.into());
        let port = parse_env("LGR_PORT", DEFAULT_LGR_PORT);
        let database_url = env::var("LGR_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ LGR_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let max_connections = parse_env("LGR_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("LGR_RUN_MIGRATIONS").ok(), true);
        let commission_rate = parse_env("LGR_COMMISSION_RATE", CommissionRate::default());
        info!("🪛️ Platform commission is set at {commission_rate}");
        let platform_user_id = env::var("LGR_PLATFORM_USER_ID").ok().and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| {
                    warn!("🪛️ {s} is not a valid user id for LGR_PLATFORM_USER_ID. {e} The first admin will be used.")
                })
                .ok()
        });
        if platform_user_id.is_none() {
            info!("🪛️ No platform user is configured. Commissions go to the wallet of the first admin user.");
        }
        let unit_timeout = parse_env("LGR_UNIT_TIMEOUT_MS", DEFAULT_UNIT_TIMEOUT.as_millis() as u64);
        Self {
            host,
            port,
            database_url,
            max_connections,
            run_migrations,
            commission_rate,
            platform_user_id,
            unit_timeout: Duration::from_millis(unit_timeout),
        }
    }

    pub fn ledger_settings(&self) -> LedgerSettings {
        let settings =
            LedgerSettings::default().with_commission_rate(self.commission_rate).with_unit_timeout(self.unit_timeout);
        match self.platform_user_id {
            Some(id) => settings.with_platform_user(id),
            None => settings,
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default}.");
            default
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn settings_follow_the_configuration() {
        let mut config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.port, 9000);
        assert!(config.run_migrations);
        let settings = config.ledger_settings();
        assert_eq!(settings.commission_rate.basis_points(), 1_800);
        assert_eq!(settings.platform_user_id, None);

        config.commission_rate = "12.5".parse().unwrap();
        config.platform_user_id = Some(3);
        config.unit_timeout = Duration::from_millis(250);
        let settings = config.ledger_settings();
        assert_eq!(settings.commission_rate.basis_points(), 1_250);
        assert_eq!(settings.platform_user_id, Some(3));
        assert_eq!(settings.unit_timeout, Duration::from_millis(250));
    }
}
