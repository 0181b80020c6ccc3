//! 网络切换错误定义

use std::fmt;

use thiserror::Error;
use vif_vimclient::VimError;

/// 同名 NSX 分段候选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCandidate {
    pub name: String,
    pub segment_id: Option<String>,
    pub logical_switch_uuid: Option<String>,
}

impl fmt::Display for SegmentCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segmentId: {}, logicalSwitchUuid: {}",
            self.segment_id.as_deref().unwrap_or("-"),
            self.logical_switch_uuid.as_deref().unwrap_or("-"),
        )
    }
}

/// 网络切换错误类型
#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("虚拟机不存在: {0}")]
    VmNotFound(String),

    #[error("虚拟机 {0} 没有运行时主机")]
    NoRuntimeHost(String),

    #[error("主机上不存在网络: {0}")]
    NetworkNotFound(String),

    #[error("网络 ID 不存在或网络类型无效: {0}")]
    NetworkIdNotFound(String),

    #[error("存在 {} 个同名 NSX-T 分段 {name}，无法仅凭名称选择", .candidates.len())]
    AmbiguousSegment {
        name: String,
        candidates: Vec<SegmentCandidate>,
    },

    #[error("不支持的交换机类型: {0}")]
    UnsupportedBacking(String),

    #[error("虚拟机 {0} 没有以太网卡")]
    NoEthernetCard(String),

    #[error("构建设备变更失败: {0}")]
    Spec(#[from] serde_json::Error),

    #[error(transparent)]
    Vim(#[from] VimError),
}

impl SwitchError {
    /// 是否为远端故障
    pub fn is_remote_fault(&self) -> bool {
        matches!(self, SwitchError::Vim(e) if e.is_fault())
    }
}

/// 网络切换结果类型
pub type Result<T> = std::result::Result<T, SwitchError>;
