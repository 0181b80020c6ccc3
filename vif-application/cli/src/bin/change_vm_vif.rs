//! 按网络名称切换虚拟机网卡

use clap::Parser;
use vif_cli::args::ChangeVmVifCli;
use vif_cli::commands::{common, switch};
use vif_switcher::NetworkTarget;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = ChangeVmVifCli::parse();
    common::init_logging(&cli.common.log_level);

    let target = NetworkTarget::Name(cli.network_name.clone());
    common::exit_on_error(switch::handle(&cli.common, &cli.connection, &cli.vm_name, target).await);
}
