// Log browser

use serde_json::Value;

use crate::error::Error;
use crate::local::client::LocalClient;

impl LocalClient {
    /// List the logfiles kept on the gateway.
    ///
    /// `POST logBrowser` with `logFileList`
    pub async fn load_logfiles(&self) -> Result<Value, Error> {
        self.post_json("logBrowser", Some("logFileList".into()))
            .await
    }

    /// Fetch one logfile by the name reported in [`load_logfiles`](Self::load_logfiles).
    ///
    /// `POST logBrowser` with `logFileSelect,{name}`
    pub async fn select_logfile(&self, name: &str) -> Result<Value, Error> {
        self.post_json("logBrowser", Some(format!("logFileSelect,{name}")))
            .await
    }
}
