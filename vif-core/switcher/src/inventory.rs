//! 清单访问抽象
//!
//! 网络切换流程只通过 `Inventory` 访问 vSphere，`VimInventory` 是基于
//! `VimClient` 的实现，测试中可替换为内存实现。

use async_trait::async_trait;
use tracing::{debug, info, warn};
use vif_vimclient::{
    kind, DvPortgroupConfigInfo, ManagedObjectReference, OpaqueNetworkSummary, OptionValue,
    VimClient, VirtualDevice, VirtualMachineConfigSpec,
};

use crate::error::{Result, SwitchError};
use crate::network::{
    DistributedPortgroup, Network, OpaqueNetwork, PortgroupBackingType, StandardPortgroup,
    SEGMENT_PATH_KEY,
};

/// vSphere 清单访问
#[async_trait]
pub trait Inventory: Send + Sync {
    /// 按名称查找虚拟机
    async fn find_vm(&self, name: &str) -> Result<Option<ManagedObjectReference>>;

    /// 虚拟机当前所在主机可见的全部网络（按主机返回顺序）
    async fn host_networks(&self, vm: &ManagedObjectReference) -> Result<Vec<Network>>;

    /// 虚拟机硬件设备列表
    async fn devices(&self, vm: &ManagedObjectReference) -> Result<Vec<VirtualDevice>>;

    /// 提交重配置，返回任务引用
    async fn reconfigure(
        &self,
        vm: &ManagedObjectReference,
        spec: &VirtualMachineConfigSpec,
    ) -> Result<ManagedObjectReference>;

    /// 等待任务完成，任务失败时返回远端故障
    async fn wait_for_task(&self, task: &ManagedObjectReference) -> Result<()>;
}

// ============================================
// 网络属性映射
// ============================================

/// 主机网络按托管对象类型的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkClass {
    Standard,
    Distributed,
    Opaque,
}

impl NetworkClass {
    /// 未识别的网络类型按标准端口组处理
    pub fn of(moref: &ManagedObjectReference) -> Self {
        match moref.kind.as_str() {
            kind::DISTRIBUTED_PORTGROUP => NetworkClass::Distributed,
            kind::OPAQUE_NETWORK => NetworkClass::Opaque,
            _ => NetworkClass::Standard,
        }
    }
}

/// 从远端读取的网络属性
#[derive(Debug, Clone)]
pub enum NetworkProperties {
    Standard {
        name: String,
    },
    Distributed {
        config: DvPortgroupConfigInfo,
        /// 端口组未关联分布式交换机时为空
        switch_uuid: Option<String>,
    },
    Opaque {
        summary: OpaqueNetworkSummary,
        extra_config: Vec<OptionValue>,
    },
}

/// 由网络属性构建 `Network`
pub fn network_from_properties(moref: ManagedObjectReference, properties: NetworkProperties) -> Network {
    match properties {
        NetworkProperties::Standard { name } => Network::Standard(StandardPortgroup { moref, name }),
        NetworkProperties::Distributed { config, switch_uuid } => {
            Network::Distributed(DistributedPortgroup {
                name: config.name,
                key: config.key,
                switch_uuid,
                backing_type: PortgroupBackingType::parse(config.backing_type.as_deref()),
                segment_id: config.segment_id,
                logical_switch_uuid: config.logical_switch_uuid,
                moref,
            })
        }
        NetworkProperties::Opaque { summary, extra_config } => {
            let segment_path = extra_config
                .iter()
                .find(|option| option.key == SEGMENT_PATH_KEY)
                .and_then(|option| option.as_str())
                .map(|path| path.to_string());

            Network::Opaque(OpaqueNetwork {
                name: summary.name,
                opaque_network_id: summary.opaque_network_id,
                opaque_network_type: summary.opaque_network_type,
                segment_path,
                moref,
            })
        }
    }
}

// ============================================
// VIM 实现
// ============================================

/// 基于 VI/JSON 客户端的清单实现
pub struct VimInventory<'a> {
    client: &'a VimClient,
}

impl<'a> VimInventory<'a> {
    pub fn new(client: &'a VimClient) -> Self {
        Self { client }
    }

    async fn load_network(&self, moref: ManagedObjectReference) -> Result<Network> {
        let api = self.client.network();

        let properties = match NetworkClass::of(&moref) {
            NetworkClass::Distributed => {
                let config = api.portgroup_config(&moref).await?;
                let switch_uuid = match &config.distributed_virtual_switch {
                    Some(switch) => Some(api.switch_uuid(switch).await?),
                    None => {
                        warn!("端口组 {} 未关联分布式交换机", moref);
                        None
                    }
                };
                NetworkProperties::Distributed { config, switch_uuid }
            }
            NetworkClass::Opaque => NetworkProperties::Opaque {
                summary: api.opaque_summary(&moref).await?,
                extra_config: api.extra_config(&moref).await?,
            },
            NetworkClass::Standard => NetworkProperties::Standard {
                name: api.name(&moref).await?,
            },
        };

        let network = network_from_properties(moref, properties);
        debug!("网络 {} -> {} ({})", network.moref(), network.name(), network.kind_name());
        Ok(network)
    }
}

#[async_trait]
impl<'a> Inventory for VimInventory<'a> {
    async fn find_vm(&self, name: &str) -> Result<Option<ManagedObjectReference>> {
        Ok(self.client.view().find_by_name(kind::VIRTUAL_MACHINE, name).await?)
    }

    async fn host_networks(&self, vm: &ManagedObjectReference) -> Result<Vec<Network>> {
        let runtime = self.client.vm().runtime(vm).await?;
        info!("虚拟机 {} 电源状态: {}", vm, runtime.power_state.as_deref().unwrap_or("-"));

        let host = runtime
            .host
            .ok_or_else(|| SwitchError::NoRuntimeHost(vm.to_string()))?;

        let morefs = self.client.network().list_host_networks(&host).await?;
        info!("主机 {} 可见 {} 个网络", host, morefs.len());

        let mut networks = Vec::with_capacity(morefs.len());
        for moref in morefs {
            networks.push(self.load_network(moref).await?);
        }
        Ok(networks)
    }

    async fn devices(&self, vm: &ManagedObjectReference) -> Result<Vec<VirtualDevice>> {
        Ok(self.client.vm().devices(vm).await?)
    }

    async fn reconfigure(
        &self,
        vm: &ManagedObjectReference,
        spec: &VirtualMachineConfigSpec,
    ) -> Result<ManagedObjectReference> {
        Ok(self.client.vm().reconfigure(vm, spec).await?)
    }

    async fn wait_for_task(&self, task: &ManagedObjectReference) -> Result<()> {
        self.client.task().wait(task).await?;
        Ok(())
    }
}
