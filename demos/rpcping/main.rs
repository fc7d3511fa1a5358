use std::time::{Duration, Instant};

use anyhow::Context;
use oncrpc_client::{Client, ClientConfig};

/// Procedure 0 of every RPC program takes no arguments and returns nothing.
const NULL_PROCEDURE: u32 = 0;

/// Pings the NULL procedure of an RPC program over TCP.
///
/// Usage: rpcping <host> <program> <version> <port>
/// e.g. `rpcping 127.0.0.1 100003 3 2049` for an NFSv3 server.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        let name = args.first().map_or("rpcping", String::as_str);
        anyhow::bail!("usage: {name} <host> <program> <version> <port>");
    }
    let program: u32 = args[2].parse().context("invalid program number")?;
    let version: u32 = args[3].parse().context("invalid program version")?;
    let port: u16 = args[4].parse().context("invalid port")?;

    let config = ClientConfig::new(args[1].as_str(), program, version, port)
        .with_timeout(Duration::from_secs(5));
    let mut client = Client::connect(&config)?;

    let started = Instant::now();
    client.call(NULL_PROCEDURE, &())?;
    println!(
        "program {program} version {version} on {} is alive (xid {}, {:?})",
        config.server_addr(),
        client.xid(),
        started.elapsed()
    );
    Ok(())
}
