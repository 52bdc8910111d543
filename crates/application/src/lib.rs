//! Application services and ports.

#![forbid(unsafe_code)]

mod identity_cleanup;
mod identity_ports;
mod notification_service;
mod registration_service;
mod user_lifecycle_service;
mod user_store_ports;

pub use identity_cleanup::{CompensationResult, IdentityCleanup};
pub use identity_ports::{IdentityCreation, IdentityDeletion, IdentityProvider};
pub use notification_service::{
    EmailService, NotificationService, OutgoingEmail, TEST_SUBJECT, WELCOME_SUBJECT,
};
pub use registration_service::{
    ConflictReason, IdentityStatus, RegistrationOutcome, RegistrationService,
    RegistrationTimeouts, StepReport, StepState,
};
pub use user_lifecycle_service::{UserLifecycleService, UserUpdateRequest};
pub use user_store_ports::{
    CompanyRecord, CompanyUpdate, LocalUserRecord, NewCompany, NewLocalUser, PasswordHasher,
    UserStore, UserUpdate,
};
