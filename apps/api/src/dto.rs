mod common;
mod email;
mod registration;
mod tokens;
mod users;

pub use common::{GenericMessageResponse, HealthResponse};
pub use email::{EmailStatusResponse, SendEmailRequest, TestEmailQuery, WelcomeEmailQuery};
pub use registration::{RegisterUserRequest, RegistrationResponse};
pub use tokens::{
    AdminTokenResponse, IntrospectTokenRequest, LoginRequest, LogoutRequest,
    RefreshTokenRequest, TokenIntrospectionResponse, TokenResponse,
};
pub use users::{UpdateUserRequest, UserResponse};
