//! Registration input and its validated form.

use accountgate_core::{AppError, AppResult, NonEmptyString};
use serde::Deserialize;

use crate::user::{AccountType, EmailAddress, PlainPassword, Username, validate_password};

/// Company sub-record supplied with a business registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyDetails {
    /// Registered company name.
    pub company_name: String,
    /// Tax identification number.
    pub tax_id: Option<String>,
    /// Company phone number.
    pub phone_number: Option<String>,
    /// Company country.
    pub country: Option<String>,
    /// Company city.
    pub city: Option<String>,
    /// Company postal code.
    pub zip_code: Option<String>,
}

/// Raw registration payload as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationRequest {
    /// Requested username.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Plaintext password.
    pub password: PlainPassword,
    /// Account kind; defaults to personal.
    #[serde(default)]
    pub account_type: AccountType,
    /// Optional embedded company.
    pub company: Option<CompanyDetails>,
}

impl RegistrationRequest {
    /// Checks the local preconditions and produces a validated registration.
    ///
    /// No network call happens before this succeeds.
    pub fn validate(self) -> AppResult<ValidatedRegistration> {
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("email is required".to_owned()));
        }
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("username is required".to_owned()));
        }

        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        validate_password(&self.password)?;

        let company = self.company.map(ValidatedCompany::try_from).transpose()?;

        Ok(ValidatedRegistration {
            username,
            email,
            first_name: optional_trimmed(self.first_name),
            last_name: optional_trimmed(self.last_name),
            phone_number: optional_trimmed(self.phone_number),
            country: optional_trimmed(self.country),
            password: self.password,
            account_type: self.account_type,
            company,
        })
    }
}

/// Company sub-record after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCompany {
    company_name: NonEmptyString,
    tax_id: Option<String>,
    phone_number: Option<String>,
    country: Option<String>,
    city: Option<String>,
    zip_code: Option<String>,
}

impl TryFrom<CompanyDetails> for ValidatedCompany {
    type Error = AppError;

    fn try_from(details: CompanyDetails) -> AppResult<Self> {
        let company_name = NonEmptyString::new(details.company_name)
            .map_err(|_| AppError::Validation("company name must not be empty".to_owned()))?;

        Ok(Self {
            company_name,
            tax_id: optional_trimmed(details.tax_id),
            phone_number: optional_trimmed(details.phone_number),
            country: optional_trimmed(details.country),
            city: optional_trimmed(details.city),
            zip_code: optional_trimmed(details.zip_code),
        })
    }
}

impl ValidatedCompany {
    /// Returns the company name.
    #[must_use]
    pub fn company_name(&self) -> &str {
        self.company_name.as_str()
    }

    /// Returns the tax identification number.
    #[must_use]
    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    /// Returns the company phone number.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Returns the company country.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Returns the company city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns the company postal code.
    #[must_use]
    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }
}

/// Registration whose username, email and password passed local checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    username: Username,
    email: EmailAddress,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    country: Option<String>,
    password: PlainPassword,
    account_type: AccountType,
    company: Option<ValidatedCompany>,
}

impl ValidatedRegistration {
    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Returns the country.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Returns the plaintext password.
    #[must_use]
    pub fn password(&self) -> &PlainPassword {
        &self.password
    }

    /// Returns the account type.
    #[must_use]
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Returns the embedded company, if any.
    #[must_use]
    pub fn company(&self) -> Option<&ValidatedCompany> {
        self.company.as_ref()
    }
}

fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            username: "alice".to_owned(),
            email: "alice@x.com".to_owned(),
            first_name: Some(" Alice ".to_owned()),
            last_name: None,
            phone_number: Some("   ".to_owned()),
            country: None,
            password: PlainPassword::new("Secret123"),
            account_type: AccountType::Personal,
            company: None,
        }
    }

    #[test]
    fn blank_email_is_a_caller_error() {
        let mut payload = request();
        payload.email = "  ".to_owned();

        let error = payload.validate().err();
        assert!(matches!(error, Some(AppError::Validation(message)) if message == "email is required"));
    }

    #[test]
    fn blank_username_is_a_caller_error() {
        let mut payload = request();
        payload.username = String::new();

        assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn optional_fields_are_trimmed_and_blank_ones_dropped() -> AppResult<()> {
        let validated = request().validate()?;

        assert_eq!(validated.first_name(), Some("Alice"));
        assert_eq!(validated.phone_number(), None);
        Ok(())
    }

    #[test]
    fn company_without_name_is_rejected() {
        let mut payload = request();
        payload.account_type = AccountType::Business;
        payload.company = Some(CompanyDetails {
            company_name: " ".to_owned(),
            ..CompanyDetails::default()
        });

        assert!(payload.validate().is_err());
    }

    #[test]
    fn company_is_carried_through() -> AppResult<()> {
        let mut payload = request();
        payload.company = Some(CompanyDetails {
            company_name: "Acme".to_owned(),
            tax_id: Some("123456789".to_owned()),
            city: Some("Belgrade".to_owned()),
            ..CompanyDetails::default()
        });

        let validated = payload.validate()?;
        let company = validated.company();
        assert_eq!(company.map(ValidatedCompany::company_name), Some("Acme"));
        assert_eq!(company.and_then(ValidatedCompany::tax_id), Some("123456789"));
        Ok(())
    }
}
