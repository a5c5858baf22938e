//! Network reachability probe.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

const TARGETS: &[&str] = &["1.1.1.1:443", "8.8.8.8:443", "9.9.9.9:443"];
const TIMEOUT: Duration = Duration::from_secs(2);

/// Whether any well-known public host accepts a TCP connection.
///
/// Several hosts are tried so one blocked resolver does not read as
/// "offline".
pub fn network_reachable() -> bool {
    TARGETS.iter().any(|target| {
        target
            .parse::<SocketAddr>()
            .map(|addr| TcpStream::connect_timeout(&addr, TIMEOUT).is_ok())
            .unwrap_or(false)
    })
}
