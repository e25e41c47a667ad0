use crate::cli::args::PingArgs;
use crate::exit_codes::{DELIVERY_FAILED, SUCCESS};
use resultcast_core::NetworkResultSender;

pub async fn run(args: PingArgs) -> anyhow::Result<i32> {
    let cfg = args.sender.resolve()?;
    let endpoint = cfg.endpoint();
    let mut sender = NetworkResultSender::new(cfg);

    if sender.probe().await {
        println!("{endpoint}: reachable");
        Ok(SUCCESS)
    } else {
        println!("{endpoint}: unreachable");
        Ok(DELIVERY_FAILED)
    }
}
