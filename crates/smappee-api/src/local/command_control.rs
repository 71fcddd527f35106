// Command control (comfort plugs and switch groups)
//
// All operations post a command string to `commandControlPublic`.

use serde_json::Value;

use crate::error::Error;
use crate::local::client::LocalClient;

const PATH: &str = "commandControlPublic";

impl LocalClient {
    /// Load the command-control configuration (plugs, groups, timers).
    pub async fn load_command_control_config(&self) -> Result<Value, Error> {
        self.post_json(PATH, Some("load".into())).await
    }

    pub async fn send_group(&self) -> Result<String, Error> {
        self.post_text(PATH, Some("controlGroup".into())).await
    }

    /// Toggle the command control `id`.
    pub async fn on_off_command_control(&self, id: &str) -> Result<String, Error> {
        self.post_text(PATH, Some(format!("control,controlId={id}")))
            .await
    }

    pub async fn delete_command_control(&self, id: &str) -> Result<String, Error> {
        self.post_text(PATH, Some(format!("delete,controlId={id}")))
            .await
    }

    /// Remove every timer attached to command control `id`.
    pub async fn delete_command_control_timers(&self, id: &str) -> Result<String, Error> {
        self.post_text(PATH, Some(format!("deleteTimers,controlId={id}")))
            .await
    }
}
