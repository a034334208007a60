use std::env;
use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid(var, msg) => write!(f, "{} is invalid: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Admin account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub correo: String,
    pub contrasena: String,
    pub nombre: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub bind_address: String,
    pub bcrypt_cost: u32,
    pub admin_seed: Option<AdminSeed>,
}

fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = optional("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = match optional("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| ConfigError::Invalid("BCRYPT_COST", format!("expected 4..=31, got {}", raw)))?,
            None => bcrypt::DEFAULT_COST,
        };

        let admin_seed = match (optional("ADMIN_CORREO"), optional("ADMIN_CONTRASENA")) {
            (Some(correo), Some(contrasena)) => Some(AdminSeed {
                correo,
                contrasena,
                nombre: optional("ADMIN_NOMBRE").unwrap_or_else(|| "Administrador".to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_CONTRASENA")),
            _ => None,
        };

        Ok(Self {
            jwt_secret,
            database_url: optional("DATABASE_URL"),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            bcrypt_cost,
            admin_seed,
        })
    }
}
