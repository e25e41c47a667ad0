use super::super::args::{Cli, Command};
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Listen(args) => super::listen::run(args).await,
        Command::Ping(args) => super::ping::run(args).await,
        Command::Report(args) => super::report::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
