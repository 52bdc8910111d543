use reqwest::header::LOCATION;
use serde::Serialize;

use super::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRepresentation<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    enabled: bool,
    email_verified: bool,
    credentials: Vec<CredentialRepresentation<'a>>,
}

#[derive(Serialize)]
struct CredentialRepresentation<'a> {
    #[serde(rename = "type")]
    credential_type: &'a str,
    value: &'a str,
    temporary: bool,
}

impl std::fmt::Debug for CredentialRepresentation<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CredentialRepresentation")
            .field("type", &self.credential_type)
            .field("temporary", &self.temporary)
            .finish_non_exhaustive()
    }
}

impl<'a> From<&'a IdentityRecord> for UserRepresentation<'a> {
    fn from(record: &'a IdentityRecord) -> Self {
        Self {
            username: record.username().as_str(),
            email: record.email().as_str(),
            first_name: record.first_name(),
            last_name: record.last_name(),
            enabled: record.enabled(),
            email_verified: record.email_verified(),
            credentials: record
                .credentials()
                .iter()
                .map(|credential| CredentialRepresentation {
                    credential_type: credential.credential_type(),
                    value: credential.value().expose(),
                    temporary: credential.temporary(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserSummary {
    id: String,
    username: String,
}

/// Extracts the trailing id segment from a `Location` header.
fn provider_id_from_location(response: &Response) -> Option<ProviderUserId> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    let segment = location.trim_end_matches('/').rsplit('/').next()?;
    ProviderUserId::new(segment).ok()
}

impl KeycloakIdentityProvider {
    pub(super) async fn create_identity_impl(
        &self,
        credential: &AdminCredential,
        record: &IdentityRecord,
    ) -> AppResult<IdentityCreation> {
        let operation = "create user";
        let response = self
            .http_client
            .post(self.admin_users_endpoint(&[])?)
            .bearer_auth(credential.access_token())
            .json(&UserRepresentation::from(record))
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;

        match response.status() {
            StatusCode::CREATED => Ok(IdentityCreation::Created {
                provider_id: provider_id_from_location(&response),
            }),
            StatusCode::CONFLICT => Ok(IdentityCreation::Conflict),
            _ => Err(unexpected_status(operation, response).await),
        }
    }

    pub(super) async fn delete_identity_impl(
        &self,
        credential: &AdminCredential,
        provider_id: &ProviderUserId,
    ) -> AppResult<IdentityDeletion> {
        let operation = "delete user";
        let response = self
            .http_client
            .delete(self.admin_users_endpoint(&[provider_id.as_str()])?)
            .bearer_auth(credential.access_token())
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;

        match response.status() {
            status if status.is_success() => Ok(IdentityDeletion::Deleted),
            StatusCode::NOT_FOUND => Ok(IdentityDeletion::NotFound),
            _ => Err(unexpected_status(operation, response).await),
        }
    }

    pub(super) async fn find_identity_by_username_impl(
        &self,
        credential: &AdminCredential,
        username: &Username,
    ) -> AppResult<Option<ProviderUserId>> {
        let operation = "user lookup";
        let response = self
            .http_client
            .get(self.admin_users_endpoint(&[])?)
            .bearer_auth(credential.access_token())
            .query(&[("username", username.as_str()), ("exact", "true")])
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;

        if !response.status().is_success() {
            return Err(unexpected_status(operation, response).await);
        }

        let users = response
            .json::<Vec<UserSummary>>()
            .await
            .map_err(|error| {
                AppError::Upstream(format!("failed to parse user lookup response: {error}"))
            })?;

        users
            .into_iter()
            .find(|user| user.username.eq_ignore_ascii_case(username.as_str()))
            .map(|user| ProviderUserId::new(user.id))
            .transpose()
    }
}
