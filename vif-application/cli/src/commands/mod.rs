//! CLI 命令处理模块

pub mod common; // 连接、日志、退出码
pub mod switch; // 网络切换
