// Faceoff - Web Server
// REST API with Axum over the character store

use anyhow::Result;
use faceoff::Config;

#[tokio::main]
async fn main() -> Result<()> {
    faceoff::init_tracing("info,tower_http=debug");

    let config = Config::load()?;
    faceoff::api::serve(config).await
}
