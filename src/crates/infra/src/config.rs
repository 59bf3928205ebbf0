use crate::auth::AuthConfig;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    database_url: String,
    jwt_expire_secs: i64,
    jwt_secret_key: String,
    salt_cost: i32,
    /// 服务器配置
    server: RawServerConfig,
    /// 数据库连接池配置
    database: RawDatabaseConfig,
    /// OMDb 元数据服务配置
    omdb: RawOmdbConfig,
    /// 初始管理员账号
    admin: RawAdminConfig,
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabaseConfig {
    max_connections: u32,
    min_connections: u32,
}

impl Default for RawDatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 2,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawOmdbConfig {
    api_key: String,
    base_url: String,
    /// 请求超时（秒）
    timeout_secs: u64,
}

impl Default for RawOmdbConfig {
    fn default() -> Self {
        Self {
            api_key: "".to_string(),
            base_url: "http://www.omdbapi.com/".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawAdminConfig {
    username: String,
    email: String,
}

impl Default for RawAdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
        }
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            database_url: "".to_string(),
            jwt_expire_secs: 7 * 24 * 3600, // 7 天
            jwt_secret_key: "secret".to_string(),
            salt_cost: 12,
            server: RawServerConfig::default(),
            database: RawDatabaseConfig::default(),
            omdb: RawOmdbConfig::default(),
            admin: RawAdminConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 数据库连接池配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
}

/// OMDb 配置
#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
}

/// 启动时加载一次的只读配置，每个实例持有自己的值
#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    jwt_expire_secs: i64,
    salt_cost: i32,
    jwt_secret_key: String,
    database_url: String,
    server: ServerConfig,
    database: DatabaseConfig,
    omdb: OmdbConfig,
    admin: AdminConfig,
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        AppConfigImpl {
            jwt_expire_secs: data.jwt_expire_secs,
            salt_cost: data.salt_cost,
            jwt_secret_key: data.jwt_secret_key,
            database_url: data.database_url,
            server: ServerConfig {
                host: data.server.host,
                port: data.server.port,
            },
            database: DatabaseConfig {
                max_connections: data.database.max_connections,
                min_connections: data.database.min_connections,
            },
            omdb: OmdbConfig {
                api_key: data.omdb.api_key,
                base_url: data.omdb.base_url,
                timeout_secs: data.omdb.timeout_secs,
            },
            admin: AdminConfig {
                username: data.admin.username,
                email: data.admin.email,
            },
        }
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        Ok(AppConfigImpl::new(raw))
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone()
    }

    pub fn database(&self) -> DatabaseConfig {
        self.database.clone()
    }

    pub fn omdb(&self) -> OmdbConfig {
        self.omdb.clone()
    }

    pub fn admin(&self) -> AdminConfig {
        self.admin.clone()
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone()
    }
}

impl Default for AppConfigImpl {
    fn default() -> Self {
        AppConfigImpl::new(RawConfig::default())
    }
}

impl AuthConfig for AppConfigImpl {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret_key
    }

    fn jwt_expire_secs(&self) -> i64 {
        self.jwt_expire_secs
    }

    fn salt_cost(&self) -> i32 {
        self.salt_cost
    }
}
