// Gateway maintenance triggers
//
// These return the gateway's raw answer; it is free text, not JSON.

use crate::error::Error;
use crate::local::client::LocalClient;

impl LocalClient {
    /// Reboot the monitor. The session is lost once it comes back.
    pub async fn restart(&self) -> Result<String, Error> {
        self.get_text("restartSmappee?action=2").await
    }

    pub async fn reset_active_power_peaks(&self) -> Result<String, Error> {
        self.post_text("resetActivePowerPeaks", None).await
    }

    pub async fn reset_ip_scan_cache(&self) -> Result<String, Error> {
        self.post_text("resetIPScanCache", None).await
    }

    pub async fn reset_sensor_cache(&self) -> Result<String, Error> {
        self.post_text("resetSensorCache", None).await
    }

    /// Wipe all recorded measurements (`clearData`).
    pub async fn reset_data(&self) -> Result<String, Error> {
        self.post_text("clearData", None).await
    }

    /// Forget every learned appliance.
    pub async fn clear_appliances(&self) -> Result<String, Error> {
        self.post_text("clearAppliances", None).await
    }
}
