//! 网络 API
//!
//! 提供虚拟机所在主机可见网络的查询，包括：
//! - 标准端口组 (Network)
//! - 分布式端口组 (DistributedVirtualPortgroup)
//! - NSX-T 不透明网络 (OpaqueNetwork)

use tracing::info;

use crate::client::VimClient;
use crate::error::Result;
use crate::models::{DvPortgroupConfigInfo, ManagedObjectReference, OpaqueNetworkSummary, OptionValue};

/// 网络 API
pub struct NetworkApi<'a> {
    client: &'a VimClient,
}

impl<'a> NetworkApi<'a> {
    /// 创建新的网络 API 实例
    pub(crate) fn new(client: &'a VimClient) -> Self {
        Self { client }
    }

    /// 查询主机可见的全部网络
    pub async fn list_host_networks(&self, host: &ManagedObjectReference) -> Result<Vec<ManagedObjectReference>> {
        info!("查询主机网络: {}", host);
        self.client.property_list(host, "network").await
    }

    /// 查询网络名称
    pub async fn name(&self, network: &ManagedObjectReference) -> Result<String> {
        self.client.property(network, "name").await
    }

    // ============================================
    // 分布式端口组
    // ============================================

    /// 查询分布式端口组配置
    pub async fn portgroup_config(&self, portgroup: &ManagedObjectReference) -> Result<DvPortgroupConfigInfo> {
        self.client.property(portgroup, "config").await
    }

    /// 查询分布式交换机 UUID
    pub async fn switch_uuid(&self, switch: &ManagedObjectReference) -> Result<String> {
        self.client.property(switch, "uuid").await
    }

    // ============================================
    // 不透明网络
    // ============================================

    /// 查询不透明网络摘要
    pub async fn opaque_summary(&self, network: &ManagedObjectReference) -> Result<OpaqueNetworkSummary> {
        self.client.property(network, "summary").await
    }

    /// 查询不透明网络扩展配置
    pub async fn extra_config(&self, network: &ManagedObjectReference) -> Result<Vec<OptionValue>> {
        self.client.property_list(network, "extraConfig").await
    }
}
