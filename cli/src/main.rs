mod commands;
mod terminal;

use commands::{CommandLine, run};
use terminal::{logging, print};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet)?;

    let cfg = commands.into_config();
    print::header("dns2ip-templater", cfg.quiet);

    run::run(cfg).await;
    Ok(())
}
