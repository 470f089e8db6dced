//! Runtime configuration.
//!
//! Everything has a working default so an embedding shell can open the core
//! without any environment; `from_env` only overrides what is set.

use std::env;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::warn;

/// Demo login used by the front desk while there is no real identity provider.
pub const DEMO_EMAIL: &str = "doctor@clinic.com";
const DEMO_PASSWORD: &str = "demo123";

/// Storage slot names for each collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub patients: String,
    pub appointments: String,
    pub activity: String,
    pub lab_results: String,
}

impl StorageKeys {
    /// Keys prefixed with `namespace:`, so several clinics can share one database.
    pub fn namespaced(namespace: &str) -> Self {
        let ns = namespace.trim();
        if ns.is_empty() {
            return Self::default();
        }
        Self {
            patients: format!("{}:patients", ns),
            appointments: format!("{}:appointments", ns),
            activity: format!("{}:activity", ns),
            lab_results: format!("{}:labResults", ns),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            patients: "patients".into(),
            appointments: "appointments".into(),
            activity: "activity".into(),
            lab_results: "labResults".into(),
        }
    }
}

/// The single credential pair accepted by the session gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCredentials {
    pub email: String,
    /// Lowercase hex SHA-256 of the password
    pub password_sha256: String,
}

impl DemoCredentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            password_sha256: hash_password(password),
        }
    }

    /// Compare a login attempt against the stored pair.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password_sha256 == hash_password(password)
    }
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD)
    }
}

/// Hex-encoded SHA-256 of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ClinicConfig {
    /// SQLite file backing the durable store; `None` keeps everything in memory
    pub database_path: Option<PathBuf>,
    pub keys: StorageKeys,
    pub credentials: DemoCredentials,
}

impl ClinicConfig {
    pub fn from_env() -> Self {
        let database_path = match env::var("CLINIC_DATABASE_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => {
                warn!("CLINIC_DATABASE_PATH not set, using in-memory storage");
                None
            }
        };

        let keys = match env::var("CLINIC_KEY_NAMESPACE") {
            Ok(ns) => StorageKeys::namespaced(&ns),
            Err(_) => StorageKeys::default(),
        };

        let email = env::var("CLINIC_DEMO_EMAIL").unwrap_or_else(|_| {
            warn!("CLINIC_DEMO_EMAIL not set, using demo account");
            DEMO_EMAIL.to_string()
        });

        let credentials = match env::var("CLINIC_DEMO_PASSWORD_SHA256") {
            Ok(digest) if digest.len() == 64 => DemoCredentials {
                email,
                password_sha256: digest.to_lowercase(),
            },
            Ok(_) => {
                warn!("CLINIC_DEMO_PASSWORD_SHA256 is not a SHA-256 hex digest, using demo password");
                DemoCredentials::new(email, DEMO_PASSWORD)
            }
            Err(_) => DemoCredentials::new(email, DEMO_PASSWORD),
        };

        Self {
            database_path,
            keys,
            credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.patients, "patients");
        assert_eq!(keys.lab_results, "labResults");
    }

    #[test]
    fn test_namespaced_keys() {
        let keys = StorageKeys::namespaced("clinicA");
        assert_eq!(keys.appointments, "clinicA:appointments");
        assert_eq!(keys.activity, "clinicA:activity");

        // Blank namespace falls back to plain keys
        assert_eq!(StorageKeys::namespaced("  "), StorageKeys::default());
    }

    #[test]
    fn test_demo_credentials() {
        let creds = DemoCredentials::default();
        assert!(creds.matches("doctor@clinic.com", "demo123"));
        assert!(!creds.matches("doctor@clinic.com", "demo1234"));
        assert!(!creds.matches("nurse@clinic.com", "demo123"));
        assert_eq!(creds.password_sha256.len(), 64);
    }
}
