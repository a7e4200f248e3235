use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::intent::{IntentCatalog, PriceTable};
use crate::runtime::ModelRuntime;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Immutable lookup tables, loaded once at startup
    pub intents: IntentCatalog,
    pub prices: PriceTable,
    pub runtime: ModelRuntime,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        let runtime = ModelRuntime::new(&config.runtime_bin, config.runtime_timeout_secs);
        Self {
            db,
            config,
            intents: IntentCatalog::builtin(),
            prices: PriceTable::builtin(),
            runtime,
        }
    }
}
