use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::NetError;

/// IP address range with CIDR prefix (IPv4 or IPv6).
///
/// Membership tests mask both the stored base address and the candidate,
/// so an un-normalized base like `10.1.2.3/24` matches the same hosts as
/// `10.1.2.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpNetwork {
    /// IPv4 address as host-byte-order u32, prefix 0-32.
    V4 { addr: u32, prefix_len: u8 },
    /// IPv6 address as 16 bytes in network order, prefix 0-128.
    V6 { addr: [u8; 16], prefix_len: u8 },
}

impl IpNetwork {
    /// Build the network formed by a host address and a prefix length,
    /// e.g. the assumed local subnet of a flow source.
    pub fn from_host(addr: IpAddr, prefix_len: u8) -> Result<Self, NetError> {
        let net = match addr {
            IpAddr::V4(v4) => Self::V4 {
                addr: u32::from(v4),
                prefix_len,
            },
            IpAddr::V6(v6) => Self::V6 {
                addr: v6.octets(),
                prefix_len,
            },
        };
        net.validate()?;
        Ok(net)
    }

    /// Prefix length of this network (0 = the default network).
    pub fn prefix_len(&self) -> u8 {
        match *self {
            Self::V4 { prefix_len, .. } | Self::V6 { prefix_len, .. } => prefix_len,
        }
    }

    /// Whether this is the distinguished default network (prefix 0).
    pub fn is_default(&self) -> bool {
        self.prefix_len() == 0
    }

    /// Check whether the given host address falls within this network.
    /// An address of the other family never matches.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (*self, ip) {
            (Self::V4 { addr, prefix_len }, IpAddr::V4(v4)) => {
                cidr_match_v4(addr, prefix_len, u32::from(*v4))
            }
            (Self::V6 { addr, prefix_len }, IpAddr::V6(v6)) => {
                cidr_match_v6(&addr, prefix_len, &v6.octets())
            }
            _ => false,
        }
    }

    pub fn validate(&self) -> Result<(), NetError> {
        match *self {
            Self::V4 { prefix_len, .. } => {
                if prefix_len > 32 {
                    return Err(NetError::InvalidPrefix {
                        prefix_len,
                        family: "IPv4",
                    });
                }
            }
            Self::V6 { prefix_len, .. } => {
                if prefix_len > 128 {
                    return Err(NetError::InvalidPrefix {
                        prefix_len,
                        family: "IPv6",
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromStr for IpNetwork {
    type Err = NetError;

    /// Parse CIDR text like `"192.168.1.0/24"`, `"0.0.0.0/0"` or
    /// `"2001:db8::/32"`. A bare host address gets a full-length prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip_str, prefix_str) = match s.split_once('/') {
            Some((ip, prefix)) => (ip, Some(prefix)),
            None => (s, None),
        };

        if ip_str.contains(':') {
            let addr: Ipv6Addr = ip_str.parse().map_err(|_| NetError::InvalidCidr {
                value: s.to_string(),
                reason: format!("invalid IPv6 address: '{ip_str}'"),
            })?;
            let prefix_len = parse_prefix(s, prefix_str, 128)?;
            Ok(Self::V6 {
                addr: addr.octets(),
                prefix_len,
            })
        } else {
            let addr: Ipv4Addr = ip_str.parse().map_err(|_| NetError::InvalidCidr {
                value: s.to_string(),
                reason: format!("invalid IPv4 address: '{ip_str}'"),
            })?;
            let prefix_len = parse_prefix(s, prefix_str, 32)?;
            Ok(Self::V4 {
                addr: u32::from(addr),
                prefix_len,
            })
        }
    }
}

fn parse_prefix(full: &str, prefix_str: Option<&str>, max: u8) -> Result<u8, NetError> {
    let Some(prefix_str) = prefix_str else {
        return Ok(max);
    };
    let len = prefix_str
        .parse::<u8>()
        .map_err(|_| NetError::InvalidCidr {
            value: full.to_string(),
            reason: format!("invalid prefix length: '{prefix_str}'"),
        })?;
    if len > max {
        return Err(NetError::InvalidCidr {
            value: full.to_string(),
            reason: format!("prefix length {len} must be 0-{max}"),
        });
    }
    Ok(len)
}

/// Parse a host address, rejecting anything that is not a plain IP.
pub fn parse_host(s: &str) -> Result<IpAddr, NetError> {
    s.parse::<IpAddr>().map_err(|_| NetError::InvalidAddress {
        value: s.to_string(),
    })
}

fn cidr_match_v4(net_addr: u32, prefix_len: u8, ip: u32) -> bool {
    if prefix_len == 0 {
        return true;
    }
    if prefix_len >= 32 {
        return net_addr == ip;
    }
    let mask = !0u32 << (32 - prefix_len);
    (net_addr & mask) == (ip & mask)
}

fn cidr_match_v6(net_addr: &[u8; 16], prefix_len: u8, ip: &[u8; 16]) -> bool {
    if prefix_len == 0 {
        return true;
    }
    if prefix_len >= 128 {
        return net_addr == ip;
    }
    let full_bytes = (prefix_len / 8) as usize;
    if net_addr[..full_bytes] != ip[..full_bytes] {
        return false;
    }
    let remaining_bits = prefix_len % 8;
    if remaining_bits > 0 {
        let mask = !0u8 << (8 - remaining_bits);
        if (net_addr[full_bytes] & mask) != (ip[full_bytes] & mask) {
            return false;
        }
    }
    true
}
