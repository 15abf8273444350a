//! Runtime settings and the HTTP server configuration built from them.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
/// `Key::derive_from` needs at least this much master key material.
const MIN_SESSION_KEY_LEN: usize = 32;

/// Settings loaded from `TRAINING_*` environment variables, CLI flags, and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAINING")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Users are kept in memory when unset.
    pub database_url: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    ///
    /// Env and file only: an absent CLI switch would otherwise read as `false`.
    #[ortho_config(default = false, skip_cli)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`. Env and file only, like
    /// `session_allow_ephemeral`.
    #[ortho_config(skip_cli)]
    pub cookie_secure: Option<bool>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::ErrorKind::InvalidInput`] for an unparsable address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether the session cookie is `Secure`; defaults to `true`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Load the session signing key.
    ///
    /// Debug builds and `session_allow_ephemeral` fall back to a generated key
    /// when the file is missing or too short.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when no usable key is available and ephemeral keys
    /// are not permitted.
    pub fn session_key(&self) -> std::io::Result<Key> {
        let path = self.session_key_file();
        let failure = match std::fs::read(path) {
            Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_LEN => {
                return Ok(Key::derive_from(&bytes));
            }
            Ok(bytes) => format!(
                "session key at {} is {} bytes; at least {MIN_SESSION_KEY_LEN} required",
                path.display(),
                bytes.len()
            ),
            Err(err) => format!("failed to read session key at {}: {err}", path.display()),
        };

        if cfg!(debug_assertions) || self.session_allow_ephemeral {
            warn!(
                path = %path.display(),
                reason = %failure,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        } else {
            Err(std::io::Error::other(failure))
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; users are then stored in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "TRAINING_BIND_ADDR",
        "TRAINING_DATABASE_URL",
        "TRAINING_SESSION_KEY_FILE",
        "TRAINING_SESSION_ALLOW_EPHEMERAL",
        "TRAINING_COOKIE_SECURE",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("training-backend")])
            .expect("config should load")
    }

    fn settings_with_key_file(path: PathBuf, allow_ephemeral: bool) -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            session_key_file: Some(path),
            session_allow_ephemeral: allow_ephemeral,
            cookie_secure: None,
        }
    }

    fn scratch_file(contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("session-key-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).expect("write key file");
        path
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.session_key_file(), Path::new(DEFAULT_SESSION_KEY_FILE));
        assert!(!settings.session_allow_ephemeral);
        assert!(settings.cookie_secure());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TRAINING_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "TRAINING_DATABASE_URL",
                Some("postgres://localhost/training".to_owned()),
            ),
            ("TRAINING_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("TRAINING_SESSION_ALLOW_EPHEMERAL", Some("true".to_owned())),
            ("TRAINING_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/training")
        );
        assert_eq!(settings.session_key_file(), Path::new("/tmp/key"));
        assert!(settings.session_allow_ephemeral);
        assert!(!settings.cookie_secure());
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(None, true)]
    fn cookie_secure_follows_environment(#[case] raw: Option<&str>, #[case] expected: bool) {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "TRAINING_COOKIE_SECURE")
                .then(|| raw.map(str::to_owned))
                .flatten();
            (name, value)
        }));

        assert_eq!(load_from_empty_args().cookie_secure(), expected);
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let mut settings = settings_with_key_file(PathBuf::from("/nonexistent"), false);
        settings.bind_addr = Some("not-an-address".into());
        let err = settings.bind_addr().expect_err("invalid address");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn key_file_is_used_when_long_enough() {
        let path = scratch_file(&[7u8; 64]);
        let settings = settings_with_key_file(path.clone(), false);

        let first = settings.session_key().expect("key");
        let second = settings.session_key().expect("key");
        std::fs::remove_file(path).ok();

        assert_eq!(first.master(), second.master());
    }

    #[rstest]
    fn missing_key_falls_back_when_ephemeral_allowed() {
        let settings = settings_with_key_file(PathBuf::from("/nonexistent/session_key"), true);
        assert!(settings.session_key().is_ok());
    }
}
