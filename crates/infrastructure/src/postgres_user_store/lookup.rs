use super::*;

impl PostgresUserStore {
    pub(super) async fn find_by_email_impl(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<LocalUserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} WHERE LOWER(u.email) = LOWER($1) LIMIT 1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(LocalUserRecord::try_from).transpose()
    }

    pub(super) async fn find_by_id_impl(
        &self,
        user_id: LocalUserId,
    ) -> AppResult<Option<LocalUserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE u.id = $1 LIMIT 1"))
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(LocalUserRecord::try_from).transpose()
    }
}
