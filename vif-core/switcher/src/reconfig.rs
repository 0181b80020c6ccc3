//! 网卡重配置
//!
//! 根据选中网络的类型构建网卡后端，生成只编辑第一块以太网卡的设备变更。
//! 多网卡场景不在处理范围内。

use tracing::info;
use vif_vimclient::{
    DistributedVirtualSwitchPortConnection, NicBacking, VirtualDevice, VirtualDeviceConfigSpec,
    VirtualDeviceConfigSpecOperation, VirtualDeviceConnectInfo, VirtualMachineConfigSpec,
};

use crate::error::{Result, SwitchError};
use crate::network::Network;

/// 根据网络类型构建网卡后端
///
/// 分布式端口组必须关联分布式交换机。
pub fn nic_backing(network: &Network) -> Result<NicBacking> {
    let backing = match network {
        Network::Opaque(net) => NicBacking::Opaque {
            opaque_network_id: net.opaque_network_id.clone(),
            opaque_network_type: net.opaque_network_type.clone(),
        },
        Network::Distributed(pg) => {
            let switch_uuid = pg.switch_uuid.clone().ok_or_else(|| {
                SwitchError::UnsupportedBacking(format!("端口组 {} 未关联分布式交换机", pg.name))
            })?;
            NicBacking::DistributedPort {
                port: DistributedVirtualSwitchPortConnection {
                    switch_uuid,
                    portgroup_key: pg.key.clone(),
                },
            }
        }
        Network::Standard(pg) => NicBacking::Network {
            device_name: pg.name.clone(),
            network: pg.moref.clone(),
        },
    };
    Ok(backing)
}

/// 生成虚拟机重配置描述
///
/// 找到第一块以太网卡，替换后端，设为已连接并允许客户机控制，开启网络唤醒。
pub fn build_config_spec(
    vm_name: &str,
    devices: Vec<VirtualDevice>,
    network: &Network,
) -> Result<VirtualMachineConfigSpec> {
    let mut nic = devices
        .into_iter()
        .find(|d| d.is_ethernet_card())
        .ok_or_else(|| SwitchError::NoEthernetCard(vm_name.to_string()))?;

    let backing = nic_backing(network)?;
    info!(
        "网卡 {} ({}) -> {} 后端 {}",
        nic.label().unwrap_or("-"),
        nic.type_name(),
        backing.variant_name(),
        network.name()
    );

    nic.set_backing(&backing)?;
    nic.set_connectable(&VirtualDeviceConnectInfo::connected())?;
    nic.set_wake_on_lan(true);

    Ok(VirtualMachineConfigSpec {
        device_change: vec![VirtualDeviceConfigSpec {
            operation: VirtualDeviceConfigSpecOperation::Edit,
            device: nic,
        }],
    })
}
