//! 命令行参数
//!
//! 连接参数未指定时回落到配置文件和环境变量。

use std::path::PathBuf;

use clap::{Args, Parser};

/// 日志与配置参数
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// 日志级别 (trace/debug/info/warn/error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// vCenter / ESXi 连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// 服务端主机名或 IP
    #[arg(short = 's', long)]
    pub host: Option<String>,

    /// 服务端端口 [默认: 443]
    #[arg(short = 'o', long)]
    pub port: Option<u16>,

    /// 登录用户名
    #[arg(short, long)]
    pub user: Option<String>,

    /// 登录密码，未指定时交互输入
    #[arg(short, long)]
    pub password: Option<String>,

    /// 跳过 SSL 证书验证
    #[arg(short = 'S', long, alias = "disable_ssl_verification")]
    pub disable_ssl_verification: bool,
}

/// 按网络名称切换虚拟机网卡
#[derive(Parser, Debug)]
#[command(name = "change-vm-vif")]
#[command(about = "在标准/分布式/NSX-T 网络之间切换虚拟机网卡（按网络名称）", long_about = None)]
#[command(version)]
pub struct ChangeVmVifCli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// 虚拟机名称
    #[arg(short = 'v', long, alias = "vm_name")]
    pub vm_name: String,

    /// 目标网络名称
    #[arg(short = 'n', long, alias = "network_name")]
    pub network_name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// 按分段 ID / 逻辑交换机 UUID 切换虚拟机网卡
#[derive(Parser, Debug)]
#[command(name = "change-vm-vif-by-id")]
#[command(about = "在 NSX-T 网络之间切换虚拟机网卡（按分段 ID 或逻辑交换机 UUID）", long_about = None)]
#[command(version)]
pub struct ChangeVmVifByIdCli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// 虚拟机名称
    #[arg(short = 'v', long, alias = "vm_name")]
    pub vm_name: String,

    /// 分段 ID 或逻辑交换机 UUID
    #[arg(short = 'i', long)]
    pub id: String,

    #[command(flatten)]
    pub common: CommonArgs,
}
