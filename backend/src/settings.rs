//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RBAC_*` environment variables and
//! configuration files. [`AppSettings::validate`] turns the raw values into a
//! [`RuntimeSettings`] or explains which key is wrong.

use std::io;
use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_EXPIRES_IN: &str = "1h";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RBAC")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Token signing secret, longer than 32 characters. Reserved for the
    /// authentication layer.
    pub jwt_secret: Option<String>,
    pub jwt_expires_in: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// `development`, `production` or `test`.
    pub environment: Option<String>,
    /// Telemetry ingest token. Required.
    pub telemetry_token: Option<String>,
    /// Telemetry dataset name. Required.
    pub telemetry_dataset: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    pub db_max_connections: Option<u32>,
}

/// Validated settings consumed by the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: String,
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub telemetry_token: String,
    pub telemetry_dataset: String,
    pub run_migrations: bool,
    pub db_max_connections: u32,
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid configuration for {key}: {reason}"),
    )
}

/// A blank value counts as missing.
fn required<'a>(key: &str, raw: Option<&'a str>) -> io::Result<&'a str> {
    raw.filter(|value| !value.trim().is_empty())
        .ok_or_else(|| invalid(key, "value is required"))
}

fn validate_database_url(raw: Option<&str>) -> io::Result<String> {
    let raw = required("database_url", raw)?;
    let parsed = Url::parse(raw).map_err(|err| invalid("database_url", err))?;
    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(raw.to_owned()),
        other => Err(invalid(
            "database_url",
            format!("unsupported scheme {other}"),
        )),
    }
}

impl AppSettings {
    /// Check every key and resolve defaults.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] naming the first offending key.
    pub fn validate(&self) -> io::Result<RuntimeSettings> {
        let database_url = validate_database_url(self.database_url.as_deref())?;

        let jwt_secret = required("jwt_secret", self.jwt_secret.as_deref())?;
        if jwt_secret.chars().count() <= MIN_JWT_SECRET_LEN {
            return Err(invalid(
                "jwt_secret",
                format!("must be longer than {MIN_JWT_SECRET_LEN} characters"),
            ));
        }

        let telemetry_token = required("telemetry_token", self.telemetry_token.as_deref())?;
        let telemetry_dataset = required("telemetry_dataset", self.telemetry_dataset.as_deref())?;

        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|err| invalid("host", err))?;
        let bind_addr = SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT));

        let environment = match self.environment.as_deref() {
            None => Environment::Development,
            Some(raw) => Environment::parse(raw).ok_or_else(|| {
                invalid(
                    "environment",
                    format!("{raw} is not one of development, production, test"),
                )
            })?,
        };

        let db_max_connections = self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if db_max_connections == 0 {
            return Err(invalid("db_max_connections", "must be at least 1"));
        }

        Ok(RuntimeSettings {
            database_url,
            jwt_secret: jwt_secret.to_owned(),
            jwt_expires_in: self
                .jwt_expires_in
                .clone()
                .unwrap_or_else(|| DEFAULT_JWT_EXPIRES_IN.to_owned()),
            bind_addr,
            environment,
            telemetry_token: telemetry_token.to_owned(),
            telemetry_dataset: telemetry_dataset.to_owned(),
            run_migrations: self.run_migrations,
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Configuration loading and validation tests.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const KEYS: [&str; 10] = [
        "RBAC_DATABASE_URL",
        "RBAC_JWT_SECRET",
        "RBAC_JWT_EXPIRES_IN",
        "RBAC_HOST",
        "RBAC_PORT",
        "RBAC_ENVIRONMENT",
        "RBAC_TELEMETRY_TOKEN",
        "RBAC_TELEMETRY_DATASET",
        "RBAC_RUN_MIGRATIONS",
        "RBAC_DB_MAX_CONNECTIONS",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let vars = KEYS.map(|key| {
            let value = overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned());
            (key, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("rbac-api")]).expect("config should load")
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef!";

    const REQUIRED: [(&str, &str); 4] = [
        ("RBAC_DATABASE_URL", "postgres://rbac@localhost/rbac"),
        ("RBAC_JWT_SECRET", SECRET),
        ("RBAC_TELEMETRY_TOKEN", "token"),
        ("RBAC_TELEMETRY_DATASET", "rbac"),
    ];

    fn base() -> AppSettings {
        AppSettings {
            database_url: Some("postgres://rbac@localhost/rbac".into()),
            jwt_secret: Some(SECRET.into()),
            jwt_expires_in: None,
            host: None,
            port: None,
            environment: None,
            telemetry_token: Some("token".into()),
            telemetry_dataset: Some("rbac".into()),
            run_migrations: false,
            db_max_connections: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_only_required_keys_are_set() {
        let settings = load_with(&REQUIRED);
        let runtime = settings.validate().expect("valid settings");

        assert_eq!(runtime.bind_addr, "0.0.0.0:3000".parse().expect("socket"));
        assert_eq!(runtime.environment, Environment::Development);
        assert_eq!(runtime.jwt_expires_in, "1h");
        assert_eq!(runtime.db_max_connections, 10);
        assert!(!runtime.run_migrations);
        assert_eq!(runtime.jwt_secret, SECRET);
        assert_eq!(runtime.telemetry_dataset, "rbac");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("RBAC_DATABASE_URL", "postgresql://db.internal/rbac"),
            ("RBAC_JWT_SECRET", SECRET),
            ("RBAC_HOST", "127.0.0.1"),
            ("RBAC_PORT", "8080"),
            ("RBAC_ENVIRONMENT", "production"),
            ("RBAC_RUN_MIGRATIONS", "true"),
            ("RBAC_TELEMETRY_TOKEN", "token"),
            ("RBAC_TELEMETRY_DATASET", "events"),
        ]);
        let runtime = settings.validate().expect("valid settings");

        assert_eq!(runtime.bind_addr, "127.0.0.1:8080".parse().expect("socket"));
        assert_eq!(runtime.environment, Environment::Production);
        assert!(runtime.run_migrations);
        assert_eq!(runtime.telemetry_dataset, "events");
    }

    #[rstest]
    #[case::missing(None)]
    #[case::not_a_url(Some("localhost"))]
    #[case::wrong_scheme(Some("mysql://localhost/rbac"))]
    fn database_url_must_be_postgres(#[case] url: Option<&str>) {
        let settings = AppSettings {
            database_url: url.map(str::to_owned),
            ..base()
        };
        let err = settings.validate().expect_err("invalid url");
        assert!(err.to_string().contains("database_url"));
    }

    #[rstest]
    #[case("a".repeat(32), false)]
    #[case("a".repeat(33), true)]
    fn jwt_secret_must_exceed_32_characters(#[case] secret: String, #[case] ok: bool) {
        let settings = AppSettings {
            jwt_secret: Some(secret),
            ..base()
        };
        assert_eq!(settings.validate().is_ok(), ok);
    }

    #[rstest]
    #[case::environment(AppSettings { environment: Some("staging".into()), ..base() }, "environment")]
    #[case::host(AppSettings { host: Some("example.com".into()), ..base() }, "host")]
    #[case::pool(AppSettings { db_max_connections: Some(0), ..base() }, "db_max_connections")]
    #[case::no_secret(AppSettings { jwt_secret: None, ..base() }, "jwt_secret")]
    #[case::no_token(AppSettings { telemetry_token: None, ..base() }, "telemetry_token")]
    #[case::blank_dataset(AppSettings { telemetry_dataset: Some(" ".into()), ..base() }, "telemetry_dataset")]
    fn invalid_or_missing_values_name_the_key(#[case] settings: AppSettings, #[case] key: &str) {
        let err = settings.validate().expect_err("invalid settings");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains(key));
    }
}
