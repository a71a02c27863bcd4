use crate::routing::entity::NextHop;

/// Wildcard value used by the catch-all rule.
pub const ANY: &str = "any";

/// Action carried by the mandatory trailing catch-all rule.
pub const ACTION_BLOCK: &str = "block";

/// Composite business key identifying "the same flow" across batches.
///
/// Always derived from the address columns (never display names), for
/// both update and removal matching. Distinct from the positional `id`,
/// which is renumbered on every reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub source: String,
    pub destination: String,
    pub port: String,
    pub protocol: String,
}

/// A declared network communication with descriptive metadata.
///
/// `id` is assigned during reconciliation and never stable across
/// versions. `next_hop` is a per-run routing annotation and is stripped
/// before the record is persisted in the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    pub id: Option<u32>,
    pub action: Option<String>,
    pub source_name: String,
    pub source_addr: String,
    pub source_zone: Option<String>,
    pub destination_name: String,
    pub destination_addr: String,
    pub destination_zone: Option<String>,
    pub port: String,
    pub protocol: String,
    pub description: Option<String>,
    pub next_hop: Option<NextHop>,
}

impl FlowRecord {
    pub fn key(&self) -> FlowKey {
        FlowKey {
            source: self.source_addr.clone(),
            destination: self.destination_addr.clone(),
            port: self.port.clone(),
            protocol: self.protocol.clone(),
        }
    }

    /// Whether this record asks for its key to be removed from the
    /// matrix. `supprimer` is accepted as a legacy alias of `remove`.
    pub fn is_remove_marker(&self) -> bool {
        match self.action.as_deref() {
            Some(action) => {
                let action = action.trim().to_lowercase();
                action == "remove" || action == "supprimer"
            }
            None => false,
        }
    }

    /// Whether this is the trailing deny-everything rule.
    pub fn is_catch_all(&self) -> bool {
        self.source_addr == ANY && self.destination_addr == ANY && self.is_deny()
    }

    fn is_deny(&self) -> bool {
        match self.action.as_deref() {
            Some(action) => {
                let action = action.trim().to_lowercase();
                action == "block" || action == "deny" || action == "drop"
            }
            None => false,
        }
    }

    /// Build the mandatory trailing catch-all rule with the given id.
    pub fn catch_all(id: u32) -> Self {
        Self {
            id: Some(id),
            action: Some(ACTION_BLOCK.to_string()),
            source_name: ANY.to_string(),
            source_addr: ANY.to_string(),
            source_zone: Some(ANY.to_string()),
            destination_name: ANY.to_string(),
            destination_addr: ANY.to_string(),
            destination_zone: Some(ANY.to_string()),
            port: ANY.to_string(),
            protocol: ANY.to_string(),
            description: None,
            next_hop: None,
        }
    }

    /// Overwrite this record's fields with the incoming record's,
    /// field-by-field: optional fields only replace the prior value when
    /// the incoming record carries one. `id` is untouched (renumbered
    /// later).
    pub fn merge_from(&mut self, incoming: &Self) {
        self.source_name = incoming.source_name.clone();
        self.source_addr = incoming.source_addr.clone();
        self.destination_name = incoming.destination_name.clone();
        self.destination_addr = incoming.destination_addr.clone();
        self.port = incoming.port.clone();
        self.protocol = incoming.protocol.clone();

        if incoming.action.is_some() {
            self.action = incoming.action.clone();
        }
        if incoming.source_zone.is_some() {
            self.source_zone = incoming.source_zone.clone();
        }
        if incoming.destination_zone.is_some() {
            self.destination_zone = incoming.destination_zone.clone();
        }
        if incoming.description.is_some() {
            self.description = incoming.description.clone();
        }
        if incoming.next_hop.is_some() {
            self.next_hop = incoming.next_hop.clone();
        }
    }
}
