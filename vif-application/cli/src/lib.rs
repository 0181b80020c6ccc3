//! VIF CLI
//!
//! 两个入口共享的命令行参数、配置加载和连接管理：
//! - `change-vm-vif`: 按网络名称切换
//! - `change-vm-vif-by-id`: 按分段 ID / 逻辑交换机 UUID 切换

pub mod args;
pub mod commands;
pub mod config;
