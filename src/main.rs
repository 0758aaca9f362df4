use clap::Parser;

use hemolink::cli::{self, AppContext, Cli};
use hemolink::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let ctx = match AppContext::load(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };
    init_tracing(&ctx.config().logging.level, cli.verbose);

    if let Err(e) = cli::run(cli, &ctx).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
