use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which object store implementation backs the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Amazon S3 or any S3-compatible service
    S3,
    /// In-process store for local development
    Memory,
}

/// Object storage configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Access key identifier
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Region the buckets live in (e.g. "us-east-1")
    pub region: String,
    /// Custom endpoint for S3-compatible services; requests use path-style addressing when set
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            app: AppConfig::from_lookup(&lookup)?,
            storage: StorageConfig::from_lookup(&lookup)?,
            swagger: SwaggerConfig::from_lookup(&lookup),
        })
    }
}

impl AppConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 5001;
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 100 * 1024 * 1024; // 100MB

    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT: {}", e))?,
            None => Self::DEFAULT_PORT,
        };

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = match lookup("MAX_REQUEST_BODY_SIZE") {
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?,
            None => Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(format!(
                    "STORAGE_BACKEND must be 's3' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let endpoint = lookup("S3_ENDPOINT").filter(|s| !s.is_empty());

        if backend == StorageBackend::Memory {
            return Ok(Self {
                backend,
                access_key: lookup("AWS_ACCESS_KEY_ID").unwrap_or_default(),
                secret_key: lookup("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                region: lookup("AWS_REGION").unwrap_or_else(|| "local".to_string()),
                endpoint,
            });
        }

        let required = |name: &str| {
            lookup(name)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("{} environment variable is required", name))
        };

        Ok(Self {
            backend,
            access_key: required("AWS_ACCESS_KEY_ID")?,
            secret_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: required("AWS_REGION")?,
            endpoint,
        })
    }
}

impl SwaggerConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            title: lookup("SWAGGER_TITLE").unwrap_or_else(|| "Bucket Gateway API".to_string()),
            version: lookup("SWAGGER_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            description: lookup("SWAGGER_DESCRIPTION")
                .unwrap_or_else(|| "Upload, list, download and delete objects in S3 buckets".to_string()),
        }
    }
}
