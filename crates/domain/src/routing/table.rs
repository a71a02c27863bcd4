use crate::net::entity::{parse_host, IpNetwork};

use super::entity::{NextHop, RouteEntry};

/// Assumed prefix length of the source's local subnet for the
/// direct-delivery check.
pub const DEFAULT_LOCAL_PREFIX_LEN: u8 = 24;

/// Prioritized route lookup over a declared route list.
///
/// Matching is specificity-ordered: among all routes containing the
/// destination, the longest prefix wins, and the default route (prefix 0)
/// is only a fallback no matter where it sits in the table. Zone lookup
/// (`zone::entity::ZoneTable`) deliberately uses the opposite,
/// declaration-ordered policy.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    local_prefix_len: u8,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self {
            entries,
            local_prefix_len: DEFAULT_LOCAL_PREFIX_LEN,
        }
    }

    /// Override the assumed local subnet mask used by the
    /// direct-delivery check.
    pub fn with_local_prefix_len(mut self, prefix_len: u8) -> Self {
        self.local_prefix_len = prefix_len;
        self
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute how a flow from `source` to `destination` would egress.
    ///
    /// Step 1 is a direct-delivery check against the network formed by
    /// the source address and the fixed local prefix length. This is a
    /// simplifying heuristic, not an interface-table lookup: a source
    /// with a different real mask can be misclassified.
    ///
    /// Step 2 selects the longest-prefix route containing the
    /// destination. Malformed route entries are skipped. Unparseable
    /// source text just skips step 1; an unparseable destination yields
    /// `NoRoute`.
    pub fn next_hop(&self, source: &str, destination: &str) -> NextHop {
        let dest = match parse_host(destination) {
            Ok(addr) => addr,
            Err(_) => return NextHop::NoRoute,
        };

        if let Ok(src) = parse_host(source) {
            if let Ok(local) = IpNetwork::from_host(src, self.local_prefix_len) {
                if local.contains(&dest) {
                    return NextHop::Direct;
                }
            }
        }

        let mut best: Option<(&RouteEntry, u8)> = None;
        for entry in &self.entries {
            let network = match entry.address.parse::<IpNetwork>() {
                Ok(net) => net,
                Err(_) => continue,
            };
            if !network.contains(&dest) {
                continue;
            }
            let prefix = network.prefix_len();
            match best {
                Some((_, best_prefix)) if best_prefix >= prefix => {}
                _ => best = Some((entry, prefix)),
            }
        }

        match best {
            Some((entry, _)) => match entry.gateway.as_deref() {
                Some(gw) if !gw.is_empty() => NextHop::Gateway(gw.to_string()),
                _ => NextHop::Direct,
            },
            None => NextHop::NoRoute,
        }
    }
}
