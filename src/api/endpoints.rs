//! Typed endpoint wrappers.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::client::ApiClient;
use super::envelope::{Page, PageQuery};
use super::error::ApiError;
use super::models::{
    BloodGroupInfo, BloodInventoryItem, BloodRequest, ComponentTypeInfo, CreateDonationAppointment,
    CreateEmergencyRequest, DonationAppointment, DonorProfile, Document, EntityId, Notification,
    RequestStatus, UpdateRequestStatus, UserInfo,
};

pub mod paths {
    pub const CURRENT_USER: &str = "auth/me";
    pub const BLOOD_GROUPS: &str = "blood-groups";
    pub const COMPONENT_TYPES: &str = "component-types";
    pub const INVENTORY: &str = "blood-inventory";
    pub const APPOINTMENTS: &str = "donation-appointments";
    pub const BLOOD_REQUESTS: &str = "blood-requests";
    pub const EMERGENCY_REQUESTS: &str = "blood-requests/emergency";
    pub const DONOR_PROFILE: &str = "donor-profiles/me";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const DOCUMENTS: &str = "documents";
}

/// Characters escaped in an id so it stays one path segment.
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `{collection}/{id}[/{tail}]` with `id` escaped as a single segment.
fn entity_path(collection: &str, id: &EntityId, tail: Option<&str>) -> Result<String, ApiError> {
    let raw = id.as_str();
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(ApiError::InvalidUrl(format!("invalid id {:?}", raw)));
    }
    let mut path = format!("{}/{}", collection, utf8_percent_encode(raw, ID_SEGMENT));
    if let Some(tail) = tail {
        path.push('/');
        path.push_str(tail);
    }
    Ok(path)
}

impl ApiClient {
    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        self.get(paths::CURRENT_USER, &[]).await
    }

    pub async fn list_blood_groups(&self) -> Result<Vec<BloodGroupInfo>, ApiError> {
        self.get(paths::BLOOD_GROUPS, &[]).await
    }

    pub async fn list_component_types(&self) -> Result<Vec<ComponentTypeInfo>, ApiError> {
        self.get(paths::COMPONENT_TYPES, &[]).await
    }

    pub async fn list_inventory(&self, query: &PageQuery) -> Result<Page<BloodInventoryItem>, ApiError> {
        self.get_page(paths::INVENTORY, query).await
    }

    pub async fn list_appointments(
        &self,
        query: &PageQuery,
    ) -> Result<Page<DonationAppointment>, ApiError> {
        self.get_page(paths::APPOINTMENTS, query).await
    }

    pub async fn create_appointment(
        &self,
        body: &CreateDonationAppointment,
    ) -> Result<DonationAppointment, ApiError> {
        self.post(paths::APPOINTMENTS, body).await
    }

    pub async fn cancel_appointment(&self, id: &EntityId) -> Result<(), ApiError> {
        self.delete(&entity_path(paths::APPOINTMENTS, id, None)?).await
    }

    pub async fn list_blood_requests(&self, query: &PageQuery) -> Result<Page<BloodRequest>, ApiError> {
        self.get_page(paths::BLOOD_REQUESTS, query).await
    }

    pub async fn create_emergency_request(
        &self,
        body: &CreateEmergencyRequest,
    ) -> Result<BloodRequest, ApiError> {
        self.post(paths::EMERGENCY_REQUESTS, body).await
    }

    pub async fn update_request_status(
        &self,
        id: &EntityId,
        status: RequestStatus,
    ) -> Result<BloodRequest, ApiError> {
        self.put(
            &entity_path(paths::BLOOD_REQUESTS, id, Some("status"))?,
            &UpdateRequestStatus { status },
        )
        .await
    }

    /// The caller's donor profile. `ApiError::NotFound` means none exists yet.
    pub async fn my_donor_profile(&self) -> Result<DonorProfile, ApiError> {
        self.get(paths::DONOR_PROFILE, &[]).await
    }

    pub async fn list_notifications(&self, query: &PageQuery) -> Result<Page<Notification>, ApiError> {
        self.get_page(paths::NOTIFICATIONS, query).await
    }

    pub async fn mark_notification_read(&self, id: &EntityId) -> Result<(), ApiError> {
        self.put_empty(&entity_path(paths::NOTIFICATIONS, id, Some("read"))?)
            .await
    }

    pub async fn list_documents(&self, query: &PageQuery) -> Result<Page<Document>, ApiError> {
        self.get_page(paths::DOCUMENTS, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_path_keeps_id_in_one_segment() {
        let path = entity_path(paths::NOTIFICATIONS, &EntityId::new("../../admin/users/1"), Some("read"))
            .unwrap();
        assert_eq!(path, "notifications/..%2F..%2Fadmin%2Fusers%2F1/read");

        let path = entity_path(paths::APPOINTMENTS, &EntityId::new("a?b#c%d"), None).unwrap();
        assert_eq!(path, "donation-appointments/a%3Fb%23c%25d");
    }

    #[test]
    fn entity_path_rejects_dot_ids() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                entity_path(paths::BLOOD_REQUESTS, &EntityId::new(id), Some("status")),
                Err(ApiError::InvalidUrl(_))
            ));
        }
    }
}
