//! Configuration for the calculator module.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5555));

/// Calculator module configuration (`modules.calculator.config`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// TCP address the accept loop binds to. Port `0` picks an ephemeral port.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Longest accepted request line in bytes, terminator excluded.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

fn default_listen_addr() -> SocketAddr {
    DEFAULT_LISTEN_ADDR
}

fn default_max_line_length() -> usize {
    1024
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_line_length: default_max_line_length(),
        }
    }
}
