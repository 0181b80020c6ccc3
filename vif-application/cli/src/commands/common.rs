//! 公共工具函数模块
//!
//! 提供两个入口共享的功能，包括：
//! - 日志初始化
//! - VIM 客户端创建和登录
//! - 错误输出与退出码

use anyhow::{Context, Result};
use tracing::{info, Level};
use vif_vimclient::VimClient;

use crate::config::VcenterConfig;

/// 失败退出码
pub const EXIT_FAILURE: i32 = -1;

/// 解析日志级别，无法识别时使用 info
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// 初始化日志
pub fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(level))
        .with_writer(std::io::stderr)
        .init();
}

/// 取登录密码，未配置时交互输入
pub fn resolve_password(config: &VcenterConfig) -> Result<String> {
    if let Some(password) = &config.password {
        return Ok(password.clone());
    }

    dialoguer::Password::new()
        .with_prompt(format!("请输入 {}@{} 的密码", config.user, config.host))
        .interact()
        .context("读取密码失败")
}

/// 创建并登录 VIM 客户端
pub async fn create_vim_client(config: &VcenterConfig, password: &str) -> Result<VimClient> {
    let endpoint = VimClient::endpoint(&config.host, config.port);

    let mut client =
        VimClient::new(&endpoint, config.vim_config()).context("创建 VIM 客户端失败")?;

    let session = client
        .connect(&config.user, password)
        .await
        .with_context(|| format!("连接 {} 失败", endpoint))?;
    info!("已登录 {} (会话用户: {})", endpoint, session.user_name);

    Ok(client)
}

/// 输出错误并以 -1 退出，成功时返回
pub fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("错误: {:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}
