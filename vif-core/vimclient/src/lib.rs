//! vSphere VI/JSON API 客户端
//!
//! 通过 `https://{host}/sdk/vim25/{release}/...` 与 vCenter / ESXi 交互。
//!
//! # 功能
//!
//! - **会话管理** (`VimClient`): 读取服务实例内容、登录、登出
//! - **对象定位** (`ViewApi`): 容器视图、按名称查找托管对象
//! - **虚拟机** (`VmApi`): 运行时信息、硬件设备、提交重配置任务
//! - **网络** (`NetworkApi`): 主机可见网络、分布式端口组、不透明网络
//! - **任务** (`TaskApi`): 轮询任务状态直到完成
//!
//! # 示例
//!
//! ```ignore
//! use vif_vimclient::{VimClient, VimConfig, kind};
//!
//! let mut client = VimClient::new(&VimClient::endpoint("vcenter.lab.local", 443), VimConfig::default())?;
//! client.connect("administrator@vsphere.local", "password").await?;
//!
//! let vm = client.view().find_by_name(kind::VIRTUAL_MACHINE, "web-01").await?;
//!
//! client.logout().await?;
//! ```

pub mod client;
pub mod api;
pub mod models;
pub mod error;

pub use client::{VimClient, VimConfig};
pub use error::{VimError, Result};

// 导出 API 模块
pub use api::{
    view::ViewApi,
    vm::VmApi,
    network::NetworkApi,
    task::TaskApi,
};

// 导出数据模型
pub use models::{
    kind,

    // 基础模型
    ManagedObjectReference, ServiceContent, AboutInfo, UserSession,

    // 虚拟机
    VirtualMachineRuntimeInfo, VirtualMachineConfigInfo, VirtualHardware,
    VirtualDevice, ETHERNET_CARD_TYPES,

    // 设备变更
    NicBacking, DistributedVirtualSwitchPortConnection, VirtualDeviceConnectInfo,
    VirtualDeviceConfigSpec, VirtualDeviceConfigSpecOperation, VirtualMachineConfigSpec,

    // 网络
    DvPortgroupConfigInfo, OpaqueNetworkSummary, OptionValue,

    // 任务
    TaskInfo, TaskInfoState, LocalizedMethodFault, MethodFault,
};
