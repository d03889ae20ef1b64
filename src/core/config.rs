use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub hasher: HasherConfig,
    pub upload: UploadConfig,
    pub activity_log: ActivityLogConfig,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Where session records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// `sessions` table, shared by every instance and kept across restarts
    Postgres,
    /// Process-local map, only suitable for a single instance
    Memory,
}

/// Session lifetime and cookie settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure_cookie: bool,
    pub backend: SessionBackend,
    pub sweep_interval: Duration,
}

/// Argon2id work factor
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    pub max_file_size: usize,
}

#[derive(Debug, Clone)]
pub struct ActivityLogConfig {
    /// Number of audit events buffered before new ones are dropped
    pub buffer: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for file uploads
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for publicly accessible files (optional, defaults to endpoint)
    pub public_endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing files
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix for public files (e.g., "public")
    pub public_prefix: String,
    /// Prefix for private files (e.g., "private")
    pub private_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            session: SessionConfig::from_env()?,
            hasher: HasherConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            activity_log: ActivityLogConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
        })
    }
}

/// Read an env var and parse it, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr + ToString,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid value", key))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative pool defaults for small-medium deployments
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SessionConfig {
    const DEFAULT_COOKIE_NAME: &'static str = "sid";
    const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60; // 1 day
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300; // 5 minutes
    const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60; // 1 year

    pub fn from_env() -> Result<Self, String> {
        let cookie_name = env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_COOKIE_NAME.to_string());

        let ttl = Self::checked_ttl(parse_env("SESSION_TTL_SECS", Self::DEFAULT_TTL_SECS)?)?;

        let secure_cookie = parse_env("SESSION_COOKIE_SECURE", false)?;

        let backend = match env::var("SESSION_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => SessionBackend::Postgres,
            "memory" => SessionBackend::Memory,
            other => {
                return Err(format!(
                    "SESSION_BACKEND must be 'postgres' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let sweep_interval_secs = parse_env(
            "SESSION_SWEEP_INTERVAL_SECS",
            Self::DEFAULT_SWEEP_INTERVAL_SECS,
        )?;

        Ok(Self {
            cookie_name,
            ttl,
            secure_cookie,
            backend,
            sweep_interval: Duration::from_secs(sweep_interval_secs.max(1)),
        })
    }

    /// Session lifetime must be non-zero and at most one year
    fn checked_ttl(secs: u64) -> Result<Duration, String> {
        if secs == 0 {
            return Err("SESSION_TTL_SECS must be greater than zero".to_string());
        }
        if secs > Self::MAX_TTL_SECS {
            return Err(format!(
                "SESSION_TTL_SECS must be at most {} (one year)",
                Self::MAX_TTL_SECS
            ));
        }
        Ok(Duration::from_secs(secs))
    }
}

impl HasherConfig {
    // 64 MiB, 3 passes, 4 lanes
    const DEFAULT_MEMORY_KIB: u32 = 65536;
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 4;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            memory_kib: parse_env("ARGON2_MEMORY_KIB", Self::DEFAULT_MEMORY_KIB)?,
            iterations: parse_env("ARGON2_ITERATIONS", Self::DEFAULT_ITERATIONS)?,
            parallelism: parse_env("ARGON2_PARALLELISM", Self::DEFAULT_PARALLELISM)?,
        })
    }
}

impl UploadConfig {
    const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let max_file_size = parse_env("MAX_UPLOAD_SIZE", Self::DEFAULT_MAX_FILE_SIZE)?;
        if max_file_size == 0 {
            return Err("MAX_UPLOAD_SIZE must be greater than zero".to_string());
        }

        Ok(Self { max_file_size })
    }
}

impl ActivityLogConfig {
    const DEFAULT_BUFFER: usize = 1024;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            buffer: parse_env("ACTIVITY_LOG_BUFFER", Self::DEFAULT_BUFFER)?.max(1),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "SaaS Core API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Accounts, sessions and file uploads".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "saas-uploads".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let public_prefix =
            env::var("MINIO_PUBLIC_PREFIX").unwrap_or_else(|_| "public".to_string());

        let private_prefix =
            env::var("MINIO_PRIVATE_PREFIX").unwrap_or_else(|_| "private".to_string());

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_endpoint: public_endpoint.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
            bucket,
            region,
            public_prefix,
            private_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_bounds() {
        assert!(SessionConfig::checked_ttl(0).is_err());
        assert_eq!(
            SessionConfig::checked_ttl(86400).unwrap(),
            Duration::from_secs(86400)
        );
        assert!(SessionConfig::checked_ttl(SessionConfig::MAX_TTL_SECS).is_ok());
        assert!(SessionConfig::checked_ttl(SessionConfig::MAX_TTL_SECS + 1).is_err());
        assert!(SessionConfig::checked_ttl(u64::MAX).is_err());
    }
}
