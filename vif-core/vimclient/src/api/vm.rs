//! 虚拟机 API

use tracing::info;

use crate::client::VimClient;
use crate::error::Result;
use crate::models::{
    ManagedObjectReference, VirtualDevice, VirtualMachineConfigInfo,
    VirtualMachineConfigSpec, VirtualMachineRuntimeInfo,
};

/// 虚拟机 API
pub struct VmApi<'a> {
    client: &'a VimClient,
}

impl<'a> VmApi<'a> {
    /// 创建新的虚拟机 API 实例
    pub(crate) fn new(client: &'a VimClient) -> Self {
        Self { client }
    }

    /// 查询虚拟机运行时信息
    pub async fn runtime(&self, vm: &ManagedObjectReference) -> Result<VirtualMachineRuntimeInfo> {
        self.client.property(vm, "runtime").await
    }

    /// 查询虚拟机硬件设备列表
    pub async fn devices(&self, vm: &ManagedObjectReference) -> Result<Vec<VirtualDevice>> {
        info!("查询虚拟机设备: {}", vm);
        let config: VirtualMachineConfigInfo = self.client.property(vm, "config").await?;
        Ok(config.hardware.device)
    }

    /// 提交重配置任务 (ReconfigVM_Task)
    ///
    /// 返回任务引用，调用方负责等待任务完成。
    pub async fn reconfigure(
        &self,
        vm: &ManagedObjectReference,
        spec: &VirtualMachineConfigSpec,
    ) -> Result<ManagedObjectReference> {
        info!("提交虚拟机重配置: {} ({} 项设备变更)", vm, spec.device_change.len());
        self.client.invoke(
            vm,
            "ReconfigVM_Task",
            Some(serde_json::json!({ "spec": spec })),
        ).await
    }
}
