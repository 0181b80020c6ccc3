//! 虚拟机网卡网络切换
//!
//! 在标准交换机、分布式交换机和 NSX-T 不透明网络之间切换虚拟机第一块以太网卡的后端。
//!
//! - 按名称选择网络 (`NetworkTarget::Name`)，同名 NSX 分段时报告全部候选项
//! - 按分段 ID / 逻辑交换机 UUID 选择网络 (`NetworkTarget::Id`)
//!
//! vSphere 访问通过 [`Inventory`] 抽象，生产环境使用 [`VimInventory`]。

pub mod error;
pub mod network;
pub mod inventory;
pub mod selector;
pub mod reconfig;
pub mod flow;

pub use error::{Result, SegmentCandidate, SwitchError};
pub use network::{
    DistributedPortgroup, Network, OpaqueNetwork, PortgroupBackingType, StandardPortgroup,
    SEGMENT_PATH_KEY,
};
pub use inventory::{network_from_properties, Inventory, NetworkClass, NetworkProperties, VimInventory};
pub use selector::{select_by_id, select_by_name};
pub use reconfig::{build_config_spec, nic_backing};
pub use flow::{switch_vm_network, NetworkTarget, SwitchReport};
