//! 网络选择
//!
//! 在虚拟机所在主机的可见网络中确定目标网络：
//! - 按名称：同名 NSX 端口组超过一个时（多集群各自的 VDS 都加入同一传输区域）报告歧义
//! - 按标识：匹配分段 ID / 逻辑交换机 UUID，只接受 NSX 网络

use tracing::{debug, info, warn};

use crate::error::{Result, SegmentCandidate, SwitchError};
use crate::network::Network;

/// 按名称选择网络
///
/// 有且只有一个同名 NSX 端口组时选中它，否则选中第一个同名网络。
pub fn select_by_name<'a>(networks: &'a [Network], name: &str) -> Result<&'a Network> {
    let mut first_match = None;
    let mut nsx_portgroups = Vec::new();

    for network in networks.iter().filter(|n| n.name() == name) {
        first_match.get_or_insert(network);
        if network.as_nsx_portgroup().is_some() {
            nsx_portgroups.push(network);
        }
    }

    let first_match = first_match.ok_or_else(|| SwitchError::NetworkNotFound(name.to_string()))?;

    if nsx_portgroups.len() > 1 {
        warn!("主机上存在 {} 个同名 NSX 端口组: {}", nsx_portgroups.len(), name);
        let candidates = nsx_portgroups
            .iter()
            .filter_map(|n| n.as_nsx_portgroup())
            .map(|pg| SegmentCandidate {
                name: pg.name.clone(),
                segment_id: pg.segment_id.clone(),
                logical_switch_uuid: pg.logical_switch_uuid.clone(),
            })
            .collect();
        return Err(SwitchError::AmbiguousSegment {
            name: name.to_string(),
            candidates,
        });
    }

    let selected = nsx_portgroups.first().copied().unwrap_or(first_match);
    info!("选中网络: {} ({}, {})", selected.name(), selected.kind_name(), selected.moref());
    Ok(selected)
}

/// 按分段 ID / 逻辑交换机 UUID 选择网络
///
/// 按主机网络顺序取第一个匹配项；匹配到非 NSX 网络时报告不支持。
pub fn select_by_id<'a>(networks: &'a [Network], id: &str) -> Result<&'a Network> {
    let selected = networks
        .iter()
        .find(|n| n.matches_id(id))
        .ok_or_else(|| SwitchError::NetworkIdNotFound(id.to_string()))?;

    debug!("标识 {} 匹配网络 {}", id, selected.moref());

    match selected {
        Network::Distributed(pg) if !pg.backing_type.is_nsx() => {
            Err(SwitchError::UnsupportedBacking(format!(
                "端口组 {} 的后端类型为 {}，不支持标准端口组",
                pg.name,
                pg.backing_type.as_str()
            )))
        }
        Network::Standard(pg) => Err(SwitchError::UnsupportedBacking(format!(
            "网络 {} 位于标准交换机上",
            pg.name
        ))),
        _ => {
            info!("选中网络: {} ({}, {})", selected.name(), selected.kind_name(), selected.moref());
            Ok(selected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{DistributedPortgroup, OpaqueNetwork, PortgroupBackingType, StandardPortgroup};
    use vif_vimclient::{kind, ManagedObjectReference};

    fn standard(id: &str, name: &str) -> Network {
        Network::Standard(StandardPortgroup {
            moref: ManagedObjectReference::new(kind::NETWORK, id),
            name: name.to_string(),
        })
    }

    fn portgroup(id: &str, name: &str, backing: &str, segment: Option<&str>, ls: Option<&str>) -> Network {
        Network::Distributed(DistributedPortgroup {
            moref: ManagedObjectReference::new(kind::DISTRIBUTED_PORTGROUP, id),
            name: name.to_string(),
            key: id.to_string(),
            switch_uuid: Some(format!("uuid-of-{}", id)),
            backing_type: PortgroupBackingType::parse(Some(backing)),
            segment_id: segment.map(|s| s.to_string()),
            logical_switch_uuid: ls.map(|s| s.to_string()),
        })
    }

    fn opaque(id: &str, name: &str, path: Option<&str>) -> Network {
        Network::Opaque(OpaqueNetwork {
            moref: ManagedObjectReference::new(kind::OPAQUE_NETWORK, id),
            name: name.to_string(),
            opaque_network_id: format!("ls-{}", id),
            opaque_network_type: "nsx.LogicalSwitch".to_string(),
            segment_path: path.map(|p| p.to_string()),
        })
    }

    #[test]
    fn test_by_name_single_nsx_portgroup() {
        let networks = vec![
            standard("network-1", "VM Network"),
            portgroup("dvportgroup-10", "seg-web", "nsx", Some("/infra/segments/seg-web"), Some("ls-web")),
        ];

        let selected = select_by_name(&networks, "seg-web").unwrap();
        assert_eq!(selected.moref().value, "dvportgroup-10");
    }

    #[test]
    fn test_by_name_prefers_nsx_portgroup_over_earlier_match() {
        let networks = vec![
            standard("network-1", "seg-web"),
            portgroup("dvportgroup-10", "seg-web", "nsx", Some("seg-web"), Some("ls-web")),
        ];

        let selected = select_by_name(&networks, "seg-web").unwrap();
        assert_eq!(selected.kind_name(), "distributed");
    }

    #[test]
    fn test_by_name_ambiguous_nsx_portgroups() {
        let networks = vec![
            portgroup("dvportgroup-10", "seg-web", "nsx", Some("seg-web"), Some("ls-a")),
            portgroup("dvportgroup-20", "seg-web", "nsx", Some("seg-web"), Some("ls-b")),
        ];

        match select_by_name(&networks, "seg-web") {
            Err(SwitchError::AmbiguousSegment { name, candidates }) => {
                assert_eq!(name, "seg-web");
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].logical_switch_uuid.as_deref(), Some("ls-a"));
                assert_eq!(candidates[1].logical_switch_uuid.as_deref(), Some("ls-b"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_by_name_duplicate_plain_portgroups_are_not_ambiguous() {
        let networks = vec![
            portgroup("dvportgroup-10", "prod", "standard", None, None),
            portgroup("dvportgroup-20", "prod", "standard", None, None),
        ];

        let selected = select_by_name(&networks, "prod").unwrap();
        assert_eq!(selected.moref().value, "dvportgroup-10");
    }

    #[test]
    fn test_by_name_not_found() {
        let networks = vec![standard("network-1", "VM Network")];
        assert!(matches!(
            select_by_name(&networks, "seg-web"),
            Err(SwitchError::NetworkNotFound(name)) if name == "seg-web"
        ));
    }

    #[test]
    fn test_by_id_segment_id() {
        let networks = vec![
            standard("network-1", "VM Network"),
            portgroup("dvportgroup-10", "seg-web", "nsx", Some("seg-web-id"), Some("ls-web")),
        ];

        let selected = select_by_id(&networks, "seg-web-id").unwrap();
        assert_eq!(selected.name(), "seg-web");
    }

    #[test]
    fn test_by_id_logical_switch_uuid() {
        let networks = vec![portgroup("dvportgroup-10", "seg-web", "nsx", Some("seg-web"), Some("ls-web"))];
        assert!(select_by_id(&networks, "ls-web").is_ok());
    }

    #[test]
    fn test_by_id_opaque_segment_path() {
        let networks = vec![
            opaque("network-o1", "seg-db", Some("/infra/segments/seg-db-id")),
            opaque("network-o2", "seg-app", Some("/infra/segments/seg-app-id")),
        ];

        let selected = select_by_id(&networks, "seg-app-id").unwrap();
        assert_eq!(selected.moref().value, "network-o2");
    }

    #[test]
    fn test_by_id_first_match_wins() {
        let networks = vec![
            portgroup("dvportgroup-10", "seg-web", "nsx", Some("shared"), None),
            opaque("network-o1", "seg-web", Some("/infra/segments/shared")),
        ];

        assert_eq!(select_by_id(&networks, "shared").unwrap().kind_name(), "distributed");
    }

    #[test]
    fn test_by_id_plain_portgroup_unsupported() {
        let networks = vec![portgroup("dvportgroup-10", "legacy", "standard", None, Some("ls-legacy"))];
        assert!(matches!(
            select_by_id(&networks, "ls-legacy"),
            Err(SwitchError::UnsupportedBacking(_))
        ));
    }

    #[test]
    fn test_by_id_not_found() {
        let networks = vec![
            standard("network-1", "seg-web"),
            opaque("network-o1", "seg-db", None),
        ];
        assert!(matches!(
            select_by_id(&networks, "seg-web"),
            Err(SwitchError::NetworkIdNotFound(_))
        ));
    }
}
