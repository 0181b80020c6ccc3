//! 按分段 ID / 逻辑交换机 UUID 切换虚拟机网卡

use clap::Parser;
use vif_cli::args::ChangeVmVifByIdCli;
use vif_cli::commands::{common, switch};
use vif_switcher::NetworkTarget;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = ChangeVmVifByIdCli::parse();
    common::init_logging(&cli.common.log_level);

    let target = NetworkTarget::Id(cli.id.clone());
    common::exit_on_error(switch::handle(&cli.common, &cli.connection, &cli.vm_name, target).await);
}
