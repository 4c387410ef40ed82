use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - storage: 数据目录与存储后端
/// - features: 短码长度、默认有效期、批量上限
/// - geo: 地理位置查询
/// - log_sink: 远程日志上报
/// - server: HTTP 服务地址
/// - logging: 本地日志输出
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub log_sink: LogSinkConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SB，分隔符：__
    /// 示例：SB__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                // logging is not up yet at this point
                eprintln!("[ERROR] {}", e);
                Self::default()
            }
        }
    }

    /// Like [`StaticConfig::load`] but reports build/deserialize failures
    pub fn try_load(path: Option<&str>) -> Result<Self, String> {
        use config::{Config, Environment, File};

        // an explicitly given file must exist, the default one is optional
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let builder = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix("SB")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| format!("Failed to build config: {}", e))?;
        let config = settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| format!("Failed to deserialize config: {}", e))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// "file" | "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// 功能配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeaturesConfig {
    #[serde(default = "default_shortcode_length")]
    pub shortcode_length: usize,
    #[serde(default = "default_validity_minutes")]
    pub default_validity_minutes: u32,
    #[serde(default = "default_max_validity_minutes")]
    pub max_validity_minutes: u32,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Prefix used when printing full short links
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// 地理位置查询配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Endpoint answering with the caller's own location as JSON
    #[serde(default = "default_geo_api_url")]
    pub api_url: String,
    #[serde(default = "default_geo_timeout")]
    pub timeout_secs: u64,
}

/// 远程日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_endpoint")]
    pub endpoint: String,
    /// Sent as `Authorization: Bearer <token>` when set
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_log_timeout")]
    pub timeout_secs: u64,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" | "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_shortcode_length() -> usize {
    crate::utils::DEFAULT_SHORTCODE_LENGTH
}

fn default_validity_minutes() -> u32 {
    30
}

fn default_max_validity_minutes() -> u32 {
    // 一年
    525_600
}

fn default_max_batch_size() -> usize {
    5
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_geo_api_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_geo_timeout() -> u64 {
    2
}

fn default_log_endpoint() -> String {
    "http://20.244.56.144/evaluation-service/logs".to_string()
}

fn default_log_timeout() -> u64 {
    5
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            shortcode_length: default_shortcode_length(),
            default_validity_minutes: default_validity_minutes(),
            max_validity_minutes: default_max_validity_minutes(),
            max_batch_size: default_max_batch_size(),
            base_url: default_base_url(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_geo_api_url(),
            timeout_secs: default_geo_timeout(),
        }
    }
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_log_endpoint(),
            token: None,
            timeout_secs: default_log_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
        }
    }
}
