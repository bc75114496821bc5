//! Configuration module
//!
//! Environment-driven settings for the API process and the upload services.
//! The scan timeout and access token lifetime are fixed constants and are not
//! configurable here.

use std::env;

const SERVER_PORT: u16 = 4000;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const MAX_RECORDS: usize = 100;
const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_image_size_bytes: usize,
    pub max_document_size_bytes: usize,
    /// Per-partition capacity of each record store
    pub max_records: usize,
    pub virus_scan_enabled: bool,
    /// When set, access tokens are HMAC-signed with this secret
    pub access_token_secret: Option<String>,
    pub log_format: LogFormat,
}

fn megabytes_to_bytes(var: &str, megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", var, megabytes))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * 1024 * 1024,
            max_records: MAX_RECORDS,
            virus_scan_enabled: true,
            access_token_secret: None,
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_image_size_bytes: megabytes_to_bytes(
                "MAX_IMAGE_SIZE_MB",
                env::var("MAX_IMAGE_SIZE_MB")
                    .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
                    .parse::<usize>()
                    .unwrap_or(MAX_IMAGE_SIZE_MB),
            )?,
            max_document_size_bytes: megabytes_to_bytes(
                "MAX_DOCUMENT_SIZE_MB",
                env::var("MAX_DOCUMENT_SIZE_MB")
                    .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
                    .parse::<usize>()
                    .unwrap_or(MAX_DOCUMENT_SIZE_MB),
            )?,
            max_records: env::var("MAX_RECORDS")
                .unwrap_or_else(|_| MAX_RECORDS.to_string())
                .parse()
                .unwrap_or(MAX_RECORDS),
            virus_scan_enabled: env::var("VIRUS_SCAN_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Compact,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_image_size_bytes == 0 || self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        if self.max_records == 0 {
            return Err(anyhow::anyhow!("MAX_RECORDS must be greater than zero"));
        }

        if let Some(secret) = &self.access_token_secret {
            if secret.len() < MIN_TOKEN_SECRET_LEN {
                return Err(anyhow::anyhow!(
                    "ACCESS_TOKEN_SECRET must be at least {} characters long",
                    MIN_TOKEN_SECRET_LEN
                ));
            }
        }

        Ok(())
    }
}
