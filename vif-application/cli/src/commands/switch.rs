//! 网络切换命令
//!
//! 两个入口共用：加载配置、登录、执行切换流程、登出。

use anyhow::Result;
use tracing::{info, warn};
use vif_switcher::{switch_vm_network, NetworkTarget, SwitchError, SwitchReport, VimInventory};

use super::common::{create_vim_client, resolve_password};
use crate::args::{CommonArgs, ConnectionArgs};
use crate::config::VifConfig;

/// 成功提示
pub const SUCCESS_MESSAGE: &str = "网络切换成功";

/// 处理网络切换
pub async fn handle(
    common: &CommonArgs,
    connection: &ConnectionArgs,
    vm_name: &str,
    target: NetworkTarget,
) -> Result<()> {
    let config = VifConfig::load(common.config.as_deref(), connection)?;
    config.validate()?;

    let password = resolve_password(&config.vcenter)?;
    let mut client = create_vim_client(&config.vcenter, &password).await?;

    let result = {
        let inventory = VimInventory::new(&client);
        switch_vm_network(&inventory, vm_name, &target).await
    };

    // 无论成功与否都释放会话
    if let Err(e) = client.logout().await {
        warn!("登出失败: {}", e);
    }

    let report = result.map_err(|e| {
        print_candidates(&e);
        e
    })?;

    print_report(&report);
    Ok(())
}

fn print_candidates(error: &SwitchError) {
    if let SwitchError::AmbiguousSegment { name, candidates } = error {
        println!("网络 {} 对应多个 NSX-T 分段，请使用 change-vm-vif-by-id 指定以下之一:", name);
        for candidate in candidates {
            println!("  {}", candidate);
        }
    }
}

fn print_report(report: &SwitchReport) {
    info!(
        "虚拟机 {} -> {} ({}, {}), 任务 {}",
        report.vm, report.network_name, report.network, report.backing, report.task
    );
    println!("{}", SUCCESS_MESSAGE);
}
