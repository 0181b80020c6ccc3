//! 网络切换流程
//!
//! 定位虚拟机 -> 选择网络 -> 构建设备变更 -> 提交重配置 -> 等待任务完成

use tracing::info;
use vif_vimclient::ManagedObjectReference;

use crate::error::{Result, SwitchError};
use crate::inventory::Inventory;
use crate::reconfig::build_config_spec;
use crate::selector::{select_by_id, select_by_name};

/// 目标网络的定位方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkTarget {
    /// 网络名称
    Name(String),

    /// 分段 ID 或逻辑交换机 UUID
    Id(String),
}

impl NetworkTarget {
    pub fn as_str(&self) -> &str {
        match self {
            NetworkTarget::Name(s) | NetworkTarget::Id(s) => s,
        }
    }
}

/// 切换结果
#[derive(Debug, Clone)]
pub struct SwitchReport {
    pub vm: ManagedObjectReference,
    pub network: ManagedObjectReference,
    pub network_name: String,

    /// 网卡后端类型: "standard" / "distributed" / "opaque"
    pub backing: &'static str,

    pub task: ManagedObjectReference,
}

/// 将虚拟机第一块以太网卡切换到目标网络
///
/// 任何一步失败都会立即返回，不做重试。
pub async fn switch_vm_network<I: Inventory + ?Sized>(
    inventory: &I,
    vm_name: &str,
    target: &NetworkTarget,
) -> Result<SwitchReport> {
    info!("切换虚拟机 {} 的网络: {:?}", vm_name, target);

    let vm = inventory
        .find_vm(vm_name)
        .await?
        .ok_or_else(|| SwitchError::VmNotFound(vm_name.to_string()))?;
    info!("找到虚拟机: {}", vm);

    let networks = inventory.host_networks(&vm).await?;
    let network = match target {
        NetworkTarget::Name(name) => select_by_name(&networks, name)?,
        NetworkTarget::Id(id) => select_by_id(&networks, id)?,
    };

    let devices = inventory.devices(&vm).await?;
    let spec = build_config_spec(vm_name, devices, network)?;

    let task = inventory.reconfigure(&vm, &spec).await?;
    info!("已提交重配置任务: {}", task);

    inventory.wait_for_task(&task).await?;
    info!("虚拟机 {} 已切换到网络 {}", vm_name, network.name());

    Ok(SwitchReport {
        vm,
        network: network.moref().clone(),
        network_name: network.name().to_string(),
        backing: network.kind_name(),
        task,
    })
}
