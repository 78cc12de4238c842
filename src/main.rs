use std::io::{Error, ErrorKind};

use models::settings::{Settings, SETTINGS};
use tcp::server::ServerInstance;
use utils::logger::{Level, Logger};

mod game;
mod models;
mod tcp;
mod utils;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::load().map_err(|error| Error::new(ErrorKind::InvalidData, error))?;
    Logger::set_level(Level::parse(&settings.log_level));
    let settings = SETTINGS.get_or_init(|| settings);

    let server = ServerInstance::create_instance(settings).await?;
    server.run().await;
    Ok(())
}
