// Gateway configuration pages

use serde_json::Value;

use crate::error::Error;
use crate::local::client::LocalClient;

impl LocalClient {
    /// `POST configPublic` with `load`
    pub async fn load_config(&self) -> Result<Value, Error> {
        self.post_json("configPublic", Some("load".into())).await
    }

    /// `POST advancedConfigPublic` with `load`
    pub async fn load_advanced_config(&self) -> Result<Value, Error> {
        self.post_json("advancedConfigPublic", Some("load".into()))
            .await
    }

    /// Write configuration back to the gateway.
    ///
    /// The command string is sent verbatim; its format is the one the
    /// gateway's own web interface produces and is not checked here.
    pub async fn save_config(&self, payload: &str) -> Result<String, Error> {
        self.post_text("configPublic", Some(payload.to_owned()))
            .await
    }
}
