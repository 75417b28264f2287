//! Application state for the web layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::directions::DirectionsSource;
use crate::fares::FareClient;
use crate::staticmap::StaticMapClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests. Nothing here is
/// mutated after startup; each request is independent.
#[derive(Clone)]
pub struct AppState {
    /// Where routes come from
    pub directions: Arc<DirectionsSource>,

    /// Ticket price lookup
    pub fares: Arc<FareClient>,

    /// Static map renderer for the document; `None` without a key
    pub maps: Option<Arc<StaticMapClient>>,

    /// Deployment configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directions: DirectionsSource,
        fares: FareClient,
        maps: Option<StaticMapClient>,
        config: AppConfig,
    ) -> Self {
        Self {
            directions: Arc::new(directions),
            fares: Arc::new(fares),
            maps: maps.map(Arc::new),
            config: Arc::new(config),
        }
    }
}
