use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use solace_core::{DeviceStoreError, DeviceToken, TrustedDevice, TrustedDeviceStore, UserId};

/// In-memory trusted-device store, keyed by device token.
#[derive(Default, Clone)]
pub struct DashMapTrustedDeviceStore {
    devices: Arc<DashMap<DeviceToken, TrustedDevice>>,
}

impl DashMapTrustedDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl TrustedDeviceStore for DashMapTrustedDeviceStore {
    async fn insert(&self, device: TrustedDevice) -> Result<(), DeviceStoreError> {
        self.devices.insert(device.token.clone(), device);
        Ok(())
    }

    async fn get(&self, token: &DeviceToken) -> Result<Option<TrustedDevice>, DeviceStoreError> {
        Ok(self.devices.get(token).map(|entry| entry.value().clone()))
    }

    async fn touch(&self, token: &DeviceToken) -> Result<(), DeviceStoreError> {
        if let Some(mut entry) = self.devices.get_mut(token) {
            entry.last_used = Some(Utc::now());
        }
        Ok(())
    }

    async fn remove(&self, user_id: UserId, token: &DeviceToken) -> Result<bool, DeviceStoreError> {
        Ok(self
            .devices
            .remove_if(token, |_, device| device.user_id == user_id)
            .is_some())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<TrustedDevice>, DeviceStoreError> {
        Ok(self
            .devices
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, DeviceStoreError> {
        let before = self.devices.len();
        self.devices.retain(|_, device| device.user_id != user_id);
        Ok(before - self.devices.len())
    }

    async fn sweep_expired(&self) -> Result<usize, DeviceStoreError> {
        let before = self.devices.len();
        self.devices.retain(|_, device| !device.is_expired());
        Ok(before - self.devices.len())
    }
}
