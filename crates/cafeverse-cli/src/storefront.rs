//! Wiring shared by every subcommand.

use std::sync::Arc;

use cafeverse_api::CafeApiClient;
use cafeverse_core::AppConfig;
use cafeverse_storefront::{CartEngine, CartStore, FileKeyValueStore, KeyValueStore, SessionAuth};

pub(crate) struct Storefront {
    pub config: AppConfig,
    pub client: CafeApiClient,
    pub kv: Arc<dyn KeyValueStore>,
    pub auth: Arc<SessionAuth>,
}

impl Storefront {
    pub(crate) fn open(config: AppConfig) -> anyhow::Result<Self> {
        let client = CafeApiClient::from_config(&config)?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(config.data_dir.clone())?);
        let auth = Arc::new(SessionAuth::restore(Arc::clone(&kv)));
        tracing::debug!(
            env = %config.env,
            api = %config.api_base_url,
            data_dir = %config.data_dir.display(),
            "storefront ready"
        );
        Ok(Self {
            config,
            client,
            kv,
            auth,
        })
    }

    pub(crate) fn cart(&self) -> CartEngine {
        CartEngine::restore(CartStore::new(Arc::clone(&self.kv)), self.auth.clone())
    }

    /// Tells the user to sign in if anything asked for it.
    pub(crate) fn report_login_request(&self) {
        if let Some(reason) = self.auth.take_login_request() {
            eprintln!("{} Run `cafeverse login`.", reason.message());
        }
    }
}
