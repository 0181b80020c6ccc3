//! VIM API 模块
//!
//! 按托管对象分组封装 VI/JSON 调用：
//! - 容器视图和对象定位 (ViewApi)
//! - 虚拟机运行时、设备和重配置 (VmApi)
//! - 主机可见网络、端口组、不透明网络 (NetworkApi)
//! - 任务跟踪 (TaskApi)

pub mod view;
pub mod vm;
pub mod network;
pub mod task;

pub use view::ViewApi;
pub use vm::VmApi;
pub use network::NetworkApi;
pub use task::TaskApi;
