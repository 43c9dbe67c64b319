//! Standalone mock server for manual runs against `RestClient`.
//!
//! Listens on loopback. `PORT` selects the port (default 3000, `0` picks a
//! free one); the bound address is logged once the listener is up.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use log::info;
use tokio::net::TcpListener;

const DEFAULT_PORT: u16 = 3000;

fn port_from_env() -> io::Result<u16> {
    match std::env::var("PORT") {
        Ok(port) => port.parse().map_err(|err| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid PORT {port:?}: {err}"))
        }),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port_from_env()?));
    let listener = TcpListener::bind(addr).await?;
    info!(
        "serving http://{}{}",
        listener.local_addr()?,
        mock_server::CONTEXT_PATH
    );
    mock_server::run(listener).await
}
