use serde::{Deserialize, Serialize};

use crate::net::entity::{parse_host, IpNetwork};

use super::error::ZoneError;

/// One declared network segment: a CIDR range, the zone it belongs to,
/// and the segment kind ("Production", "Admin", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub network: IpNetwork,
    pub zone: String,
    pub kind: String,
}

impl ZoneEntry {
    pub fn validate(&self) -> Result<(), ZoneError> {
        self.network.validate().map_err(|e| ZoneError::Invalid {
            reason: e.to_string(),
        })?;
        if self.zone.is_empty() {
            return Err(ZoneError::Invalid {
                reason: "zone name must not be empty".to_string(),
            });
        }
        if self.kind.is_empty() {
            return Err(ZoneError::Invalid {
                reason: format!("zone '{}' must have a kind", self.zone),
            });
        }
        Ok(())
    }

    /// Display-name prefix derived from the kind, e.g. "Production" -> "P_".
    pub fn kind_prefix(&self) -> String {
        match self.kind.chars().next() {
            Some(c) => format!("{c}_"),
            None => String::new(),
        }
    }
}

/// Ordered table of declared network segments.
///
/// Lookup is a linear scan in declared order and returns the FIRST entry
/// whose range contains the address. When ranges overlap, table order
/// decides, not prefix specificity. Route lookup works the other way
/// around (see `routing::table`); the two policies are intentionally kept
/// separate.
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    entries: Vec<ZoneEntry>,
}

impl ZoneTable {
    pub fn new(entries: Vec<ZoneEntry>) -> Self {
        Self { entries }
    }

    pub fn validate(&self) -> Result<(), ZoneError> {
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }

    /// Resolve an address (as text) to its declared segment.
    ///
    /// Returns `None` when the text does not parse as a host address or
    /// when no declared network contains it.
    pub fn resolve(&self, addr_text: &str) -> Option<&ZoneEntry> {
        let addr = parse_host(addr_text).ok()?;
        self.entries.iter().find(|e| e.network.contains(&addr))
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cidr: &str, zone: &str, kind: &str) -> ZoneEntry {
        ZoneEntry {
            network: cidr.parse().unwrap(),
            zone: zone.to_string(),
            kind: kind.to_string(),
        }
    }

    // ── Validation ────────────────────────────────────────────────

    #[test]
    fn entry_validate_ok() {
        assert!(entry("10.0.0.0/8", "dmz", "Production").validate().is_ok());
    }

    #[test]
    fn entry_empty_zone_rejected() {
        assert!(entry("10.0.0.0/8", "", "Production").validate().is_err());
    }

    #[test]
    fn entry_empty_kind_rejected() {
        assert!(entry("10.0.0.0/8", "dmz", "").validate().is_err());
    }

    // ── Kind prefix ───────────────────────────────────────────────

    #[test]
    fn kind_prefix_first_letter() {
        assert_eq!(entry("10.0.0.0/8", "z", "Production").kind_prefix(), "P_");
        assert_eq!(entry("10.0.0.0/8", "z", "Admin").kind_prefix(), "A_");
    }

    // ── Resolution ────────────────────────────────────────────────

    #[test]
    fn resolve_inside_declared_network() {
        let table = ZoneTable::new(vec![
            entry("10.0.0.0/8", "core", "Production"),
            entry("192.168.0.0/16", "office", "Admin"),
        ]);
        assert_eq!(table.resolve("10.1.2.3").unwrap().zone, "core");
        assert_eq!(table.resolve("192.168.4.5").unwrap().zone, "office");
    }

    #[test]
    fn resolve_outside_all_networks() {
        let table = ZoneTable::new(vec![entry("10.0.0.0/8", "core", "Production")]);
        assert!(table.resolve("172.16.0.1").is_none());
    }

    #[test]
    fn resolve_unparseable_address() {
        let table = ZoneTable::new(vec![entry("10.0.0.0/8", "core", "Production")]);
        assert!(table.resolve("not-an-ip").is_none());
        assert!(table.resolve("").is_none());
        assert!(table.resolve("any").is_none());
    }

    #[test]
    fn overlapping_networks_first_in_table_order_wins() {
        // Table order decides, NOT prefix specificity: the /8 declared
        // first shadows the more specific /16 for 10.1.x.x addresses.
        let table = ZoneTable::new(vec![
            entry("10.0.0.0/8", "ZoneA", "Production"),
            entry("10.1.0.0/16", "ZoneB", "Admin"),
        ]);
        assert_eq!(table.resolve("10.1.2.3").unwrap().zone, "ZoneA");
    }

    #[test]
    fn overlapping_networks_specific_first_wins_when_declared_first() {
        let table = ZoneTable::new(vec![
            entry("10.1.0.0/16", "ZoneB", "Admin"),
            entry("10.0.0.0/8", "ZoneA", "Production"),
        ]);
        assert_eq!(table.resolve("10.1.2.3").unwrap().zone, "ZoneB");
        // Outside the /16, falls through to the /8.
        assert_eq!(table.resolve("10.2.0.1").unwrap().zone, "ZoneA");
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = ZoneTable::default();
        assert!(table.is_empty());
        assert!(table.resolve("10.0.0.1").is_none());
    }
}
