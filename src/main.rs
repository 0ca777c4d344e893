use anyhow::{Context, Result};
use buildtimer::{cli::Cli, commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args.to_config();
    let output = commands::execute(&args.command, &config).with_context(|| {
        format!(
            "{} failed for build log {}",
            args.command.name(),
            config.log_path.display()
        )
    })?;

    print!("{}", output);
    Ok(())
}
