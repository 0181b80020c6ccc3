//! VIM 客户端错误定义

use thiserror::Error;

/// VIM 客户端错误类型
#[derive(Error, Debug)]
pub enum VimError {
    #[error("HTTP 错误: {0}")]
    HttpError(String),

    #[error("认证错误: {0}")]
    AuthError(String),

    #[error("API 错误 [{0}]: {1}")]
    ApiError(u16, String),

    /// 远端返回的 MethodFault（包括任务执行失败）
    #[error("vmodl 故障 [{fault_type}]: {message}")]
    Fault { fault_type: String, message: String },

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("资源不存在: {0}")]
    NotFound(String),
}

impl VimError {
    /// 是否为远端故障
    pub fn is_fault(&self) -> bool {
        matches!(self, VimError::Fault { .. })
    }
}

impl From<reqwest::Error> for VimError {
    fn from(e: reqwest::Error) -> Self {
        VimError::HttpError(e.to_string())
    }
}

/// VIM 客户端结果类型
pub type Result<T> = std::result::Result<T, VimError>;
