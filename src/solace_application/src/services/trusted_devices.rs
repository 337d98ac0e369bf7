use chrono::Duration;
use solace_core::{DeviceStoreError, DeviceToken, TrustedDevice, TrustedDeviceStore, UserId};

/// Trusted-device registry: long-lived per-device 2FA-bypass tokens.
/// Issuance happens only on the post-2FA paths; validation is strictly
/// scoped to the issuing user.
#[derive(Clone)]
pub struct TrustedDeviceRegistry<D>
where
    D: TrustedDeviceStore,
{
    store: D,
    device_ttl: Duration,
}

impl<D> TrustedDeviceRegistry<D>
where
    D: TrustedDeviceStore,
{
    pub fn new(store: D, device_ttl: Duration) -> Self {
        Self { store, device_ttl }
    }

    #[tracing::instrument(name = "TrustedDeviceRegistry::trust_device", skip_all, fields(user_id = %user_id))]
    pub async fn trust_device(
        &self,
        user_id: UserId,
        name: String,
        device_type: Option<String>,
        ip_address: Option<String>,
    ) -> Result<TrustedDevice, DeviceStoreError> {
        let device = TrustedDevice::issue(user_id, name, device_type, ip_address, self.device_ttl);
        self.store.insert(device.clone()).await?;
        Ok(device)
    }

    /// True only for a live record bound to exactly this user. A token
    /// issued to user A never validates for user B.
    #[tracing::instrument(name = "TrustedDeviceRegistry::is_trusted", skip_all, fields(user_id = %user_id))]
    pub async fn is_trusted(
        &self,
        user_id: UserId,
        token: &DeviceToken,
    ) -> Result<bool, DeviceStoreError> {
        let Some(device) = self.store.get(token).await? else {
            return Ok(false);
        };
        if device.user_id != user_id || device.is_expired() {
            return Ok(false);
        }
        self.store.touch(token).await?;
        Ok(true)
    }

    /// Idempotent removal scoped to the owning user.
    pub async fn remove(
        &self,
        user_id: UserId,
        token: &DeviceToken,
    ) -> Result<bool, DeviceStoreError> {
        self.store.remove(user_id, token).await
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<TrustedDevice>, DeviceStoreError> {
        self.store.list(user_id).await
    }

    pub async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, DeviceStoreError> {
        self.store.remove_all_for_user(user_id).await
    }

    pub async fn sweep_expired(&self) -> Result<usize, DeviceStoreError> {
        self.store.sweep_expired().await
    }
}
