use std::sync::Arc;

use openschool_auth::TokenVerifier;
use openschool_config::CorsConfig;
use openschool_db::Store;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        verifier: Arc<dyn TokenVerifier>,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            store,
            verifier,
            cors_config,
        }
    }
}
