//! Zone enrichment and routing annotation of flow batches.
//!
//! Zone enrichment is all-or-nothing per record: a flow whose source or
//! destination resolves to no declared zone is a hard error, because
//! zone columns are part of the persisted matrix schema. Routing
//! annotation on the other hand degrades per flow: an unreachable
//! destination surfaces as `NO_ROUTE` in the data, never as a failure.

use thiserror::Error;

use domain::flow::entity::FlowRecord;
use domain::routing::table::RouteTable;
use domain::zone::entity::ZoneTable;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(
        "no zone found for {side} address '{addr}' of flow '{flow_source}' -> '{destination}'"
    )]
    ZoneNotFound {
        side: &'static str,
        addr: String,
        flow_source: String,
        destination: String,
    },
}

/// Annotate one flow with its source and destination zones and prefix
/// both display names with the zone kind ("Production" -> `P_`).
pub fn enrich_record(rec: &FlowRecord, zones: &ZoneTable) -> Result<FlowRecord, EnrichError> {
    let source_entry =
        zones
            .resolve(&rec.source_addr)
            .ok_or_else(|| EnrichError::ZoneNotFound {
                side: "source",
                addr: rec.source_addr.clone(),
                flow_source: rec.source_name.clone(),
                destination: rec.destination_name.clone(),
            })?;
    let destination_entry =
        zones
            .resolve(&rec.destination_addr)
            .ok_or_else(|| EnrichError::ZoneNotFound {
                side: "destination",
                addr: rec.destination_addr.clone(),
                flow_source: rec.source_name.clone(),
                destination: rec.destination_name.clone(),
            })?;

    let mut enriched = rec.clone();
    enriched.source_name = format!("{}{}", source_entry.kind_prefix(), rec.source_name);
    enriched.source_zone = Some(source_entry.zone.clone());
    enriched.destination_name = format!(
        "{}{}",
        destination_entry.kind_prefix(),
        rec.destination_name
    );
    enriched.destination_zone = Some(destination_entry.zone.clone());
    Ok(enriched)
}

/// Enrich a whole batch; the first unresolvable record aborts the batch.
pub fn enrich_batch(
    records: &[FlowRecord],
    zones: &ZoneTable,
) -> Result<Vec<FlowRecord>, EnrichError> {
    records.iter().map(|rec| enrich_record(rec, zones)).collect()
}

/// Per-batch routing annotation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteStats {
    pub direct: usize,
    pub gateway: usize,
    pub no_route: usize,
}

/// Annotate each flow with its computed next hop. Flows without a route
/// are counted and logged, not failed.
pub fn annotate_next_hops(records: &mut [FlowRecord], routes: &RouteTable) -> RouteStats {
    use domain::routing::entity::NextHop;

    let mut stats = RouteStats::default();
    for rec in records.iter_mut() {
        let next_hop = routes.next_hop(&rec.source_addr, &rec.destination_addr);
        match &next_hop {
            NextHop::Direct => stats.direct += 1,
            NextHop::Gateway(_) => stats.gateway += 1,
            NextHop::NoRoute => {
                stats.no_route += 1;
                tracing::warn!(
                    source = %rec.source_addr,
                    destination = %rec.destination_addr,
                    "no route to destination"
                );
            }
        }
        rec.next_hop = Some(next_hop);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::net::entity::IpNetwork;
    use domain::routing::entity::{NextHop, RouteEntry};
    use domain::zone::entity::ZoneEntry;

    fn zones() -> ZoneTable {
        let entry = |cidr: &str, zone: &str, kind: &str| ZoneEntry {
            network: cidr.parse::<IpNetwork>().unwrap(),
            zone: zone.to_string(),
            kind: kind.to_string(),
        };
        ZoneTable::new(vec![
            entry("10.0.0.0/8", "core", "Production"),
            entry("192.168.0.0/16", "office", "Admin"),
        ])
    }

    fn record(src: &str, dst: &str) -> FlowRecord {
        FlowRecord {
            id: None,
            action: None,
            source_name: "web".to_string(),
            source_addr: src.to_string(),
            source_zone: None,
            destination_name: "db".to_string(),
            destination_addr: dst.to_string(),
            destination_zone: None,
            port: "5432".to_string(),
            protocol: "tcp".to_string(),
            description: None,
            next_hop: None,
        }
    }

    // ── Zone enrichment ───────────────────────────────────────────

    #[test]
    fn enrich_sets_zones_and_prefixes_names() {
        let rec = enrich_record(&record("10.0.0.1", "192.168.1.2"), &zones()).unwrap();
        assert_eq!(rec.source_name, "P_web");
        assert_eq!(rec.source_zone.as_deref(), Some("core"));
        assert_eq!(rec.destination_name, "A_db");
        assert_eq!(rec.destination_zone.as_deref(), Some("office"));
    }

    #[test]
    fn unresolvable_source_is_hard_error() {
        let err = enrich_record(&record("172.16.0.1", "10.0.0.2"), &zones()).unwrap_err();
        match err {
            EnrichError::ZoneNotFound { side, addr, .. } => {
                assert_eq!(side, "source");
                assert_eq!(addr, "172.16.0.1");
            }
        }
    }

    #[test]
    fn unresolvable_destination_is_hard_error() {
        let err = enrich_record(&record("10.0.0.1", "8.8.8.8"), &zones()).unwrap_err();
        match err {
            EnrichError::ZoneNotFound { side, .. } => assert_eq!(side, "destination"),
        }
    }

    #[test]
    fn unparseable_address_is_hard_error() {
        assert!(enrich_record(&record("not-an-ip", "10.0.0.2"), &zones()).is_err());
    }

    #[test]
    fn batch_aborts_on_first_bad_record() {
        let batch = vec![
            record("10.0.0.1", "10.0.0.2"),
            record("8.8.8.8", "10.0.0.2"),
        ];
        assert!(enrich_batch(&batch, &zones()).is_err());
    }

    #[test]
    fn batch_enriches_all_records() {
        let batch = vec![
            record("10.0.0.1", "10.0.0.2"),
            record("192.168.1.1", "10.0.0.2"),
        ];
        let enriched = enrich_batch(&batch, &zones()).unwrap();
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].source_name, "P_web");
        assert_eq!(enriched[1].source_name, "A_web");
    }

    // ── Routing annotation ────────────────────────────────────────

    #[test]
    fn annotation_fills_next_hop_and_counts() {
        let routes = RouteTable::new(vec![
            RouteEntry {
                address: "192.168.0.0/16".to_string(),
                gateway: Some("10.0.0.254".to_string()),
            },
        ]);
        let mut batch = vec![
            record("10.0.0.1", "10.0.0.77"),    // same /24: direct
            record("10.0.0.1", "192.168.1.2"),  // via gateway
            record("10.0.0.1", "8.8.8.8"),      // no route
        ];
        let stats = annotate_next_hops(&mut batch, &routes);

        assert_eq!(stats, RouteStats { direct: 1, gateway: 1, no_route: 1 });
        assert_eq!(batch[0].next_hop, Some(NextHop::Direct));
        assert_eq!(
            batch[1].next_hop,
            Some(NextHop::Gateway("10.0.0.254".to_string()))
        );
        assert_eq!(batch[2].next_hop, Some(NextHop::NoRoute));
    }
}
