//! VI/JSON 数据模型
//!
//! 只建模本项目读取或提交的对象，其余字段在反序列化时忽略。
//! VI/JSON 使用 `_typeName` 字段区分数据对象类型，提交给服务端的对象必须携带它。

use serde::{Deserialize, Deserializer, Serialize};

/// 未设置的数组字段可能以 `null` 出现，按空列表处理
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn moref_type_name() -> String {
    "ManagedObjectReference".to_string()
}

/// 托管对象引用 (MoRef)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObjectReference {
    #[serde(rename = "_typeName", default = "moref_type_name")]
    type_name: String,

    /// 托管对象类型 (VirtualMachine / HostSystem / Network ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// 托管对象 ID (vm-42 / host-10 ...)
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: moref_type_name(),
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// 生成 `{type}/{id}` 形式的 URL 路径片段
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind, self.value)
    }
}

impl std::fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// 托管对象类型名
pub mod kind {
    pub const SERVICE_INSTANCE: &str = "ServiceInstance";
    pub const VIRTUAL_MACHINE: &str = "VirtualMachine";
    pub const HOST_SYSTEM: &str = "HostSystem";
    pub const NETWORK: &str = "Network";
    pub const DISTRIBUTED_PORTGROUP: &str = "DistributedVirtualPortgroup";
    pub const OPAQUE_NETWORK: &str = "OpaqueNetwork";
    pub const TASK: &str = "Task";
}

// ============================================
// 会话 / 服务内容
// ============================================

/// 服务实例内容
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContent {
    pub root_folder: ManagedObjectReference,
    pub view_manager: ManagedObjectReference,
    pub session_manager: ManagedObjectReference,

    #[serde(default)]
    pub property_collector: Option<ManagedObjectReference>,

    #[serde(default)]
    pub about: Option<AboutInfo>,
}

/// 服务端版本信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfo {
    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub api_version: String,
}

/// 登录会话
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub user_name: String,
}

// ============================================
// 虚拟机
// ============================================

/// 虚拟机运行时信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineRuntimeInfo {
    /// 当前所在主机
    #[serde(default)]
    pub host: Option<ManagedObjectReference>,

    #[serde(default)]
    pub power_state: Option<String>,
}

/// 虚拟机配置（只取硬件部分）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineConfigInfo {
    #[serde(default)]
    pub name: String,

    pub hardware: VirtualHardware,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHardware {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub device: Vec<VirtualDevice>,
}

/// 以太网卡设备类型
pub const ETHERNET_CARD_TYPES: &[&str] = &[
    "VirtualE1000",
    "VirtualE1000e",
    "VirtualPCNet32",
    "VirtualVmxnet",
    "VirtualVmxnet2",
    "VirtualVmxnet3",
    "VirtualVmxnet3Vrdma",
    "VirtualSriovEthernetCard",
];

/// 虚拟设备
///
/// 保留服务端返回的完整 JSON，编辑时原样回传，只替换需要修改的字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualDevice(serde_json::Value);

impl VirtualDevice {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// 设备类型 (`_typeName`)
    pub fn type_name(&self) -> &str {
        self.0["_typeName"].as_str().unwrap_or("")
    }

    /// 设备 key
    pub fn key(&self) -> Option<i64> {
        self.0["key"].as_i64()
    }

    /// 设备标签，如 "Network adapter 1"
    pub fn label(&self) -> Option<&str> {
        self.0["deviceInfo"]["label"].as_str()
    }

    pub fn is_ethernet_card(&self) -> bool {
        ETHERNET_CARD_TYPES.contains(&self.type_name())
    }

    /// 替换设备后端
    pub fn set_backing(&mut self, backing: &NicBacking) -> serde_json::Result<()> {
        self.set_field("backing", serde_json::to_value(backing)?);
        Ok(())
    }

    /// 替换连接状态
    pub fn set_connectable(&mut self, connectable: &VirtualDeviceConnectInfo) -> serde_json::Result<()> {
        self.set_field("connectable", serde_json::to_value(connectable)?);
        Ok(())
    }

    pub fn set_wake_on_lan(&mut self, enabled: bool) {
        self.set_field("wakeOnLanEnabled", serde_json::Value::Bool(enabled));
    }

    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        if let serde_json::Value::Object(map) = &mut self.0 {
            map.insert(name.to_string(), value);
        }
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

// ============================================
// 网卡后端 / 设备变更
// ============================================

/// 网卡后端
///
/// 三种交换机类型各对应一种后端描述。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_typeName")]
pub enum NicBacking {
    /// NSX-T 不透明网络
    #[serde(rename = "VirtualEthernetCardOpaqueNetworkBackingInfo", rename_all = "camelCase")]
    Opaque {
        opaque_network_id: String,
        opaque_network_type: String,
    },

    /// 分布式交换机端口组
    #[serde(rename = "VirtualEthernetCardDistributedVirtualPortBackingInfo")]
    DistributedPort { port: DistributedVirtualSwitchPortConnection },

    /// 标准交换机端口组（按名称）
    #[serde(rename = "VirtualEthernetCardNetworkBackingInfo", rename_all = "camelCase")]
    Network {
        device_name: String,
        network: ManagedObjectReference,
    },
}

impl NicBacking {
    /// 后端类型简称，用于日志
    pub fn variant_name(&self) -> &'static str {
        match self {
            NicBacking::Opaque { .. } => "opaque",
            NicBacking::DistributedPort { .. } => "distributed",
            NicBacking::Network { .. } => "standard",
        }
    }
}

/// 分布式交换机端口连接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_typeName", rename = "DistributedVirtualSwitchPortConnection", rename_all = "camelCase")]
pub struct DistributedVirtualSwitchPortConnection {
    pub switch_uuid: String,
    pub portgroup_key: String,
}

/// 设备连接状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_typeName", rename = "VirtualDeviceConnectInfo", rename_all = "camelCase")]
pub struct VirtualDeviceConnectInfo {
    pub start_connected: bool,
    pub allow_guest_control: bool,
    pub connected: bool,
}

impl VirtualDeviceConnectInfo {
    /// 已连接、开机自动连接、允许客户机控制
    pub fn connected() -> Self {
        Self {
            start_connected: true,
            allow_guest_control: true,
            connected: true,
        }
    }
}

/// 设备变更操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualDeviceConfigSpecOperation {
    Edit,
}

/// 设备变更描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_typeName", rename = "VirtualDeviceConfigSpec")]
pub struct VirtualDeviceConfigSpec {
    pub operation: VirtualDeviceConfigSpecOperation,
    pub device: VirtualDevice,
}

/// 虚拟机重配置描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_typeName", rename = "VirtualMachineConfigSpec", rename_all = "camelCase")]
pub struct VirtualMachineConfigSpec {
    pub device_change: Vec<VirtualDeviceConfigSpec>,
}

// ============================================
// 网络
// ============================================

/// 分布式端口组配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvPortgroupConfigInfo {
    pub key: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub distributed_virtual_switch: Option<ManagedObjectReference>,

    /// "standard" 或 "nsx"（vSphere 7.0 起）
    #[serde(default)]
    pub backing_type: Option<String>,

    #[serde(default)]
    pub segment_id: Option<String>,

    #[serde(default)]
    pub logical_switch_uuid: Option<String>,
}

/// 不透明网络摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueNetworkSummary {
    #[serde(default)]
    pub name: String,

    pub opaque_network_id: String,
    pub opaque_network_type: String,
}

/// 扩展配置项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValue {
    pub key: String,

    #[serde(default)]
    pub value: serde_json::Value,
}

impl OptionValue {
    /// 取字符串值
    ///
    /// VI/JSON 中 anyType 会包装成 `{"_typeName": "string", "_value": ...}`。
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map.get("_value").and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

// ============================================
// 任务 / 故障
// ============================================

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskInfoState {
    Queued,
    Running,
    Success,
    Error,
}

impl TaskInfoState {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskInfoState::Success | TaskInfoState::Error)
    }
}

/// 任务信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    #[serde(default)]
    pub key: String,

    pub state: TaskInfoState,

    #[serde(default)]
    pub description_id: Option<String>,

    #[serde(default)]
    pub progress: Option<i32>,

    #[serde(default)]
    pub error: Option<LocalizedMethodFault>,
}

/// 本地化故障
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedMethodFault {
    #[serde(default)]
    pub fault: Option<MethodFault>,

    #[serde(default)]
    pub localized_message: Option<String>,
}

impl LocalizedMethodFault {
    pub fn fault_type(&self) -> &str {
        self.fault
            .as_ref()
            .map(|f| f.type_name.as_str())
            .unwrap_or("MethodFault")
    }

    pub fn message(&self) -> String {
        match &self.localized_message {
            Some(msg) if !msg.is_empty() => msg.clone(),
            _ => self
                .fault
                .as_ref()
                .map(|f| f.message())
                .unwrap_or_default(),
        }
    }
}

/// 远端故障
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFault {
    #[serde(rename = "_typeName", default)]
    pub type_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub fault_message: Vec<LocalizableMessage>,
}

impl MethodFault {
    /// 拼接故障消息，没有消息时返回故障类型
    pub fn message(&self) -> String {
        let messages: Vec<&str> = self
            .fault_message
            .iter()
            .filter_map(|m| m.message.as_deref())
            .filter(|m| !m.is_empty())
            .collect();

        if messages.is_empty() {
            self.type_name.clone()
        } else {
            messages.join("; ")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizableMessage {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub message: Option<String>,
}
