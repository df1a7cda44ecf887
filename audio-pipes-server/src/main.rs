use audio_pipes_server::{serve, Result, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    config.log_config().init()?;

    serve(config).await
}
