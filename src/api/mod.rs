//! Backend REST API client.
//!
//! [`ApiClient`] sends JSON, decodes the `{success, data, message, statusCode}`
//! envelope and maps failures to [`ApiError`]. Typed endpoint methods live in
//! `endpoints`.

mod client;
mod endpoints;
mod envelope;
mod error;
mod models;

pub use client::ApiClient;
pub use endpoints::paths;
pub use envelope::{decode_envelope, ApiEnvelope, Page, PageMeta, PageQuery};
pub use error::ApiError;
pub use models::{
    AppointmentStatus, BloodGroupInfo, BloodInventoryItem, BloodRequest, BloodType,
    ComponentKind, ComponentTypeInfo, CreateDonationAppointment, CreateEmergencyRequest,
    DonationAppointment, DonorProfile, Document, EntityId, Notification, RequestStatus, TimeSlot,
    UpdateRequestStatus, Urgency, UserInfo,
};
