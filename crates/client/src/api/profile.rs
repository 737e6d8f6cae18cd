//! The signed-in user's profile.

use souk_core::{PhoneNumber, PhoneUpdate, Profile, UserId};
use tracing::{info, instrument};

use super::ApiClient;
use crate::error::{Result, add_breadcrumb};

impl ApiClient {
    /// Profile of `user_id`. Never cached, so edits show up immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the stored phone number
    /// is invalid.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn profile(&self, user_id: &UserId) -> Result<Profile> {
        let url = self.endpoint(&["users", user_id.as_str(), "profile"])?;
        self.get_json(url).await
    }

    /// Replace the phone number of `user_id` and return the updated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, phone), fields(user_id = %user_id))]
    pub async fn update_phone(&self, user_id: &UserId, phone: &PhoneNumber) -> Result<Profile> {
        let url = self.endpoint(&["users", user_id.as_str(), "phone"])?;
        let body = PhoneUpdate {
            phone_number: phone.clone(),
        };

        let request = self.inner.client.put(url.clone()).json(&body);
        let profile: Profile = self.send(request, &url).await?;

        info!("Phone number updated");
        add_breadcrumb("profile", "Updated phone number", None);
        Ok(profile)
    }
}
