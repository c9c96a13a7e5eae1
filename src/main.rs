use clap::Parser;
use dockerfile_validator::cli::Cli;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    match dockerfile_validator::run(&cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
