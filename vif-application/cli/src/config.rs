//! CLI 配置管理
//!
//! 支持从多个源加载连接配置:
//! - 命令行参数 (优先级最高)
//! - 环境变量
//! - 配置文件 (TOML)
//! - 默认值 (优先级最低)
//!
//! 配置文件搜索路径 (按优先级):
//! 1. `--config` 指定的路径
//! 2. `VIF_CONFIG` 环境变量指定的路径
//! 3. `./vif.toml` (当前目录)
//! 4. `~/.config/vif/config.toml` (用户配置目录)
//! 5. `/etc/vif/config.toml` (系统配置目录)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use vif_vimclient::VimConfig;

use crate::args::ConnectionArgs;

// ============================================
// 核心配置结构
// ============================================

/// CLI 配置 (顶层)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VifConfig {
    /// vCenter / ESXi 连接配置
    #[serde(default)]
    pub vcenter: VcenterConfig,
}

/// vCenter / ESXi 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcenterConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub disable_ssl_verification: bool,

    /// VI/JSON API 版本
    #[serde(default = "default_api_release")]
    pub api_release: String,

    /// 连接超时 (秒)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// 请求超时 (秒)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// 任务轮询间隔 (毫秒)
    #[serde(default = "default_task_poll_interval_ms")]
    pub task_poll_interval_ms: u64,
}

// ============================================
// 默认值
// ============================================

fn default_port() -> u16 {
    443
}
fn default_api_release() -> String {
    "8.0.1.0".to_string()
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_request_timeout() -> u64 {
    30
}
fn default_task_poll_interval_ms() -> u64 {
    1000
}

impl Default for VcenterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            user: String::new(),
            password: None,
            disable_ssl_verification: false,
            api_release: default_api_release(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            task_poll_interval_ms: default_task_poll_interval_ms(),
        }
    }
}

// ============================================
// 加载
// ============================================

impl VifConfig {
    /// 从多个源加载配置 (优先级: 命令行 > 环境变量 > 配置文件 > 默认值)
    pub fn load(config_path: Option<&Path>, args: &ConnectionArgs) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::find_config_file() {
                Some(path) => {
                    tracing::debug!("加载配置文件: {:?}", path);
                    Self::load_from_file(&path)?
                }
                None => {
                    tracing::debug!("未找到配置文件，使用默认值");
                    Self::default()
                }
            },
        };

        config.apply_env_vars(|key| env::var(key).ok())?;
        config.apply_args(args);
        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 查找配置文件 (按优先级搜索)
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("VIF_CONFIG") {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        let mut paths = vec![PathBuf::from("./vif.toml")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config/vif/config.toml"));
        }

        #[cfg(target_os = "linux")]
        paths.push(PathBuf::from("/etc/vif/config.toml"));

        paths.into_iter().find(|p| p.exists())
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vcenter = &mut self.vcenter;

        if let Some(host) = lookup("VIF_HOST") {
            vcenter.host = host;
        }
        if let Some(port) = lookup("VIF_PORT") {
            vcenter.port = port.parse().context("无效的 VIF_PORT")?;
        }
        if let Some(user) = lookup("VIF_USER") {
            vcenter.user = user;
        }
        if let Some(password) = lookup("VIF_PASSWORD") {
            vcenter.password = Some(password);
        }
        if let Some(disable) = lookup("VIF_DISABLE_SSL_VERIFICATION") {
            vcenter.disable_ssl_verification = parse_flag(&disable)
                .with_context(|| format!("无效的 VIF_DISABLE_SSL_VERIFICATION: {}", disable))?;
        }

        Ok(())
    }

    /// 命令行参数覆盖配置
    pub fn apply_args(&mut self, args: &ConnectionArgs) {
        let vcenter = &mut self.vcenter;

        if let Some(host) = &args.host {
            vcenter.host = host.clone();
        }
        if let Some(port) = args.port {
            vcenter.port = port;
        }
        if let Some(user) = &args.user {
            vcenter.user = user.clone();
        }
        if let Some(password) = &args.password {
            vcenter.password = Some(password.clone());
        }
        if args.disable_ssl_verification {
            vcenter.disable_ssl_verification = true;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.vcenter.host.is_empty() {
            anyhow::bail!("未指定服务端主机 (--host / VIF_HOST / [vcenter].host)");
        }
        if self.vcenter.user.is_empty() {
            anyhow::bail!("未指定登录用户 (--user / VIF_USER / [vcenter].user)");
        }
        if self.vcenter.port == 0 {
            anyhow::bail!("端口不能为 0");
        }

        Ok(())
    }
}

impl VcenterConfig {
    /// 转换为 VIM 客户端配置
    pub fn vim_config(&self) -> VimConfig {
        VimConfig {
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            verify_ssl: !self.disable_ssl_verification,
            api_release: self.api_release.clone(),
            task_poll_interval_ms: self.task_poll_interval_ms,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_default_config() {
        let config = VifConfig::default();
        assert_eq!(config.vcenter.port, 443);
        assert_eq!(config.vcenter.api_release, "8.0.1.0");
        assert_eq!(config.vcenter.connect_timeout, 10);
        assert_eq!(config.vcenter.request_timeout, 30);
        assert_eq!(config.vcenter.task_poll_interval_ms, 1000);
        assert!(!config.vcenter.disable_ssl_verification);
        assert!(config.vcenter.password.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[vcenter]
host = "vcenter.lab.local"
user = "administrator@vsphere.local"
disable_ssl_verification = true
api_release = "7.0.3.0"
"#
        )
        .unwrap();

        let config = VifConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.vcenter.host, "vcenter.lab.local");
        assert_eq!(config.vcenter.user, "administrator@vsphere.local");
        assert_eq!(config.vcenter.port, 443);
        assert!(config.vcenter.disable_ssl_verification);
        assert_eq!(config.vcenter.api_release, "7.0.3.0");
        assert_eq!(config.vcenter.request_timeout, 30);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[vcenter\nhost = ").unwrap();

        assert!(VifConfig::load_from_file(file.path()).is_err());
        assert!(VifConfig::load_from_file(Path::new("/nonexistent/vif.toml")).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: VifConfig = toml::from_str(
            r#"
[vcenter]
host = "from-file"
port = 8443
user = "file-user"
"#,
        )
        .unwrap();

        let env = env_of(&[
            ("VIF_HOST", "from-env"),
            ("VIF_PASSWORD", "env-secret"),
            ("VIF_DISABLE_SSL_VERIFICATION", "true"),
        ]);
        config.apply_env_vars(|key| env.get(key).cloned()).unwrap();

        assert_eq!(config.vcenter.host, "from-env");
        assert_eq!(config.vcenter.port, 8443);
        assert_eq!(config.vcenter.user, "file-user");
        assert_eq!(config.vcenter.password.as_deref(), Some("env-secret"));
        assert!(config.vcenter.disable_ssl_verification);
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = VifConfig::default();
        let env = env_of(&[("VIF_PORT", "https")]);
        assert!(config.apply_env_vars(|key| env.get(key).cloned()).is_err());

        let env = env_of(&[("VIF_DISABLE_SSL_VERIFICATION", "maybe")]);
        assert!(config.apply_env_vars(|key| env.get(key).cloned()).is_err());
    }

    #[test]
    fn test_args_override_env() {
        let mut config = VifConfig::default();
        let env = env_of(&[("VIF_HOST", "from-env"), ("VIF_PORT", "8443"), ("VIF_USER", "env-user")]);
        config.apply_env_vars(|key| env.get(key).cloned()).unwrap();

        let args = ConnectionArgs {
            host: Some("from-cli".to_string()),
            port: None,
            user: None,
            password: Some("cli-secret".to_string()),
            disable_ssl_verification: false,
        };
        config.apply_args(&args);

        assert_eq!(config.vcenter.host, "from-cli");
        assert_eq!(config.vcenter.port, 8443);
        assert_eq!(config.vcenter.user, "env-user");
        assert_eq!(config.vcenter.password.as_deref(), Some("cli-secret"));
        assert!(!config.vcenter.disable_ssl_verification);
    }

    #[test]
    fn test_validate() {
        let mut config = VifConfig::default();
        assert!(config.validate().is_err());

        config.vcenter.host = "vcenter.lab.local".to_string();
        assert!(config.validate().is_err());

        config.vcenter.user = "administrator@vsphere.local".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_vim_config() {
        let mut config = VcenterConfig::default();
        config.disable_ssl_verification = true;
        config.task_poll_interval_ms = 250;

        let vim = config.vim_config();
        assert!(!vim.verify_ssl);
        assert_eq!(vim.task_poll_interval_ms, 250);
        assert_eq!(vim.api_release, "8.0.1.0");
    }
}
