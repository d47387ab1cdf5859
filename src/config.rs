use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use log::LevelFilter;

use crate::optimizer::{BoundsCheck, PackingConfig};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub optimizer: OptimizerConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            optimizer: OptimizerConfig::from_env(),
        }
    }
}

/// Log level from `SHELF_PACK_LOG`, read before the logger exists.
pub fn log_level_from_env() -> LevelFilter {
    const LOG_VAR: &str = "SHELF_PACK_LOG";
    const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

    match env_string(LOG_VAR) {
        Some(raw) => crate::logging::parse_level(&raw).unwrap_or_else(|| {
            eprintln!(
                "⚠️ Could not parse {} ('{}') as log level. Using {}.",
                LOG_VAR, raw, DEFAULT_LEVEL
            );
            DEFAULT_LEVEL
        }),
        None => DEFAULT_LEVEL,
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("SHELF_PACK_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                log::warn!(
                    "Could not parse SHELF_PACK_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("SHELF_PACK_API_PORT") {
            Some(raw) => parse_port(&raw).unwrap_or_else(|| {
                log::warn!(
                    "SHELF_PACK_API_PORT ('{}') must be a port between 1 and 65535. Using {}.",
                    raw,
                    Self::DEFAULT_PORT
                );
                Self::DEFAULT_PORT
            }),
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Configuration for the packing engine.
#[derive(Clone, Debug, Default)]
pub struct OptimizerConfig {
    packing: PackingConfig,
}

impl OptimizerConfig {
    const BOUNDS_CHECK_VAR: &'static str = "SHELF_PACK_BOUNDS_CHECK";
    const REQUIRE_ITEMS_VAR: &'static str = "SHELF_PACK_REQUIRE_ITEMS";

    fn from_env() -> Self {
        let bounds_check = env_string(Self::BOUNDS_CHECK_VAR)
            .and_then(|raw| {
                let parsed = BoundsCheck::parse(&raw);
                if parsed.is_none() {
                    log::warn!(
                        "{} ('{}') must be one of off, warn, strict. Using default value.",
                        Self::BOUNDS_CHECK_VAR,
                        raw
                    );
                }
                parsed
            })
            .unwrap_or(PackingConfig::DEFAULT_BOUNDS_CHECK);

        if bounds_check == BoundsCheck::Off {
            log::info!("Bounds check disabled: placements are not verified against the container");
        }

        let require_items = env_string(Self::REQUIRE_ITEMS_VAR)
            .and_then(|raw| parse_bool(&raw, Self::REQUIRE_ITEMS_VAR))
            .unwrap_or(PackingConfig::DEFAULT_REQUIRE_ITEMS);

        let packing = PackingConfig::builder()
            .bounds_check(bounds_check)
            .require_items(require_items)
            .build();

        Self { packing }
    }

    /// Returns the configured PackingConfig.
    pub fn packing_config(&self) -> PackingConfig {
        self.packing
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            log::warn!(
                "Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name,
                other
            );
            None
        }
    }
}
