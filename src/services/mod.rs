//! Business logic services

pub mod qr;
pub mod visitors;

use std::sync::Arc;

use crate::{config::QrConfig, repository::VisitorStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub visitors: visitors::VisitorsService,
    pub qr: qr::QrService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn VisitorStore>, qr_config: QrConfig) -> Self {
        Self {
            visitors: visitors::VisitorsService::new(store),
            qr: qr::QrService::new(qr_config),
        }
    }
}
