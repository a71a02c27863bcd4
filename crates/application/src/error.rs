use thiserror::Error;

use adapters::export::ExportError;
use adapters::flowfile::FlowFileError;
use adapters::matrix_store::StoreError;
use adapters::routingfile::RoutingFileError;
use adapters::zonefile::ZoneFileError;

use crate::enrichment::EnrichError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    FlowFile(#[from] FlowFileError),

    #[error(transparent)]
    ZoneFile(#[from] ZoneFileError),

    #[error(transparent)]
    RoutingFile(#[from] RoutingFileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error("no routing table configured: set paths.routing_file or pass --routing-table")]
    RoutingTableNotConfigured,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
