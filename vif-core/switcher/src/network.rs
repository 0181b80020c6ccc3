//! 主机可见网络模型
//!
//! 三种交换机类型对应 `Network` 的三个变体。

use vif_vimclient::ManagedObjectReference;

/// 不透明网络扩展配置中记录分段路径的键
///
/// 值的格式为 `/infra/segments/<segment-id>`。
pub const SEGMENT_PATH_KEY: &str = "com.vmware.opaquenetwork.segment.path";

/// 分段路径中分段 ID 所在位置（按 '/' 切分后）
const SEGMENT_PATH_ID_INDEX: usize = 3;

/// 主机可见网络
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    /// 标准交换机端口组
    Standard(StandardPortgroup),

    /// 分布式交换机端口组
    Distributed(DistributedPortgroup),

    /// NSX-T 不透明网络
    Opaque(OpaqueNetwork),
}

impl Network {
    pub fn name(&self) -> &str {
        match self {
            Network::Standard(n) => &n.name,
            Network::Distributed(n) => &n.name,
            Network::Opaque(n) => &n.name,
        }
    }

    pub fn moref(&self) -> &ManagedObjectReference {
        match self {
            Network::Standard(n) => &n.moref,
            Network::Distributed(n) => &n.moref,
            Network::Opaque(n) => &n.moref,
        }
    }

    /// 网络类型简称
    pub fn kind_name(&self) -> &'static str {
        match self {
            Network::Standard(_) => "standard",
            Network::Distributed(_) => "distributed",
            Network::Opaque(_) => "opaque",
        }
    }

    /// NSX 后端的分布式端口组
    pub fn as_nsx_portgroup(&self) -> Option<&DistributedPortgroup> {
        match self {
            Network::Distributed(pg) if pg.backing_type.is_nsx() => Some(pg),
            _ => None,
        }
    }

    /// 是否能以分段 ID / 逻辑交换机 UUID 识别
    ///
    /// 分布式端口组直接比较 segmentId 和 logicalSwitchUuid；
    /// 不透明网络比较扩展配置中分段路径的 ID 部分；标准端口组没有标识。
    pub fn matches_id(&self, id: &str) -> bool {
        match self {
            Network::Distributed(pg) => {
                pg.segment_id.as_deref() == Some(id) || pg.logical_switch_uuid.as_deref() == Some(id)
            }
            Network::Opaque(net) => net.segment_id() == Some(id),
            Network::Standard(_) => false,
        }
    }
}

/// 标准交换机端口组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardPortgroup {
    pub moref: ManagedObjectReference,
    pub name: String,
}

/// 分布式端口组后端类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortgroupBackingType {
    Standard,
    Nsx,
    Other(String),
}

impl PortgroupBackingType {
    /// 解析 `config.backingType`，缺省视为 standard
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("standard") => PortgroupBackingType::Standard,
            Some("nsx") => PortgroupBackingType::Nsx,
            Some(other) => PortgroupBackingType::Other(other.to_string()),
        }
    }

    pub fn is_nsx(&self) -> bool {
        matches!(self, PortgroupBackingType::Nsx)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PortgroupBackingType::Standard => "standard",
            PortgroupBackingType::Nsx => "nsx",
            PortgroupBackingType::Other(s) => s,
        }
    }
}

/// 分布式端口组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedPortgroup {
    pub moref: ManagedObjectReference,
    pub name: String,

    /// 端口组 key
    pub key: String,

    /// 所属分布式交换机 UUID，未关联交换机时为空
    pub switch_uuid: Option<String>,

    pub backing_type: PortgroupBackingType,
    pub segment_id: Option<String>,
    pub logical_switch_uuid: Option<String>,
}

/// NSX-T 不透明网络
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueNetwork {
    pub moref: ManagedObjectReference,
    pub name: String,
    pub opaque_network_id: String,
    pub opaque_network_type: String,

    /// 扩展配置中的分段路径
    pub segment_path: Option<String>,
}

impl OpaqueNetwork {
    /// 从分段路径中取出分段 ID
    pub fn segment_id(&self) -> Option<&str> {
        self.segment_path
            .as_deref()
            .and_then(|path| path.split('/').nth(SEGMENT_PATH_ID_INDEX))
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vif_vimclient::kind;

    fn opaque(path: Option<&str>) -> OpaqueNetwork {
        OpaqueNetwork {
            moref: ManagedObjectReference::new(kind::OPAQUE_NETWORK, "network-o1"),
            name: "seg-app".to_string(),
            opaque_network_id: "ls-uuid".to_string(),
            opaque_network_type: "nsx.LogicalSwitch".to_string(),
            segment_path: path.map(|p| p.to_string()),
        }
    }

    #[test]
    fn test_segment_id_from_path() {
        assert_eq!(opaque(Some("/infra/segments/seg-app")).segment_id(), Some("seg-app"));
        assert_eq!(opaque(Some("/infra/segments/seg-app/extra")).segment_id(), Some("seg-app"));
        assert_eq!(opaque(Some("/infra/segments")).segment_id(), None);
        assert_eq!(opaque(Some("/infra/segments/")).segment_id(), None);
        assert_eq!(opaque(None).segment_id(), None);
    }

    #[test]
    fn test_backing_type_parse() {
        assert_eq!(PortgroupBackingType::parse(None), PortgroupBackingType::Standard);
        assert_eq!(PortgroupBackingType::parse(Some("standard")), PortgroupBackingType::Standard);
        assert!(PortgroupBackingType::parse(Some("nsx")).is_nsx());
        assert_eq!(PortgroupBackingType::parse(Some("vpc")).as_str(), "vpc");
    }

    #[test]
    fn test_standard_never_matches_id() {
        let net = Network::Standard(StandardPortgroup {
            moref: ManagedObjectReference::new(kind::NETWORK, "network-1"),
            name: "seg-app".to_string(),
        });
        assert!(!net.matches_id("seg-app"));
        assert_eq!(net.kind_name(), "standard");
    }
}
