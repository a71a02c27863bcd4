use serde::{Deserialize, Serialize};

/// One declared route, as exported by the firewall appliance.
///
/// `address` is CIDR text; the default route is the literal all-zero
/// network (`"0.0.0.0/0"`). A route without a gateway is on-link
/// (direct-attached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Gateway", default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

/// Result of a next-hop computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextHop {
    /// Destination is reachable without a gateway (same subnet or
    /// on-link route).
    Direct,
    /// No route matched the destination, not even a default route.
    NoRoute,
    /// Forward via this gateway address.
    Gateway(String),
}

impl std::fmt::Display for NextHop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("DIRECT"),
            Self::NoRoute => f.write_str("NO_ROUTE"),
            Self::Gateway(addr) => f.write_str(addr),
        }
    }
}
