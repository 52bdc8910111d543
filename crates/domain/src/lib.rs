//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identity;
mod registration;
mod user;

pub use identity::{
    AdminCredential, IdentityCredential, IdentityRecord, ProviderUserId, TokenIntrospection,
    TokenSet,
};
pub use registration::{
    CompanyDetails, RegistrationRequest, ValidatedCompany, ValidatedRegistration,
};
pub use user::{
    AccountType, EmailAddress, LocalUserId, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    PlainPassword, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH, Username, validate_password,
};
