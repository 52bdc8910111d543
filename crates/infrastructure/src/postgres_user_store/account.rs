use sqlx::{Postgres, Transaction};

use super::*;

impl PostgresUserStore {
    pub(super) async fn create_user_and_company_impl(
        &self,
        user: NewLocalUser,
    ) -> AppResult<LocalUserRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start user create transaction for '{}': {error}",
                user.username
            ))
        })?;

        let company_id = match &user.company {
            Some(company) => Some(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO companies (company_name, tax_id, phone_number, country, city, zip_code)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id
                    "#,
                )
                .bind(company.company_name.as_str())
                .bind(company.tax_id.as_deref())
                .bind(company.phone_number.as_deref())
                .bind(company.country.as_deref())
                .bind(company.city.as_deref())
                .bind(company.zip_code.as_deref())
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| unique_conflict_or_internal(error, "create company"))?,
            ),
            None => None,
        };

        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                account_type, first_name, last_name, username, email,
                phone_number, country, password_hash, company_id
            )
            VALUES ($1, $2, $3, $4, LOWER($5), $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(user.account_type.as_str())
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.phone_number.as_deref())
        .bind(user.country.as_deref())
        .bind(user.password_hash.as_str())
        .bind(company_id)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| unique_conflict_or_internal(error, "create user"))?;

        let record = fetch_in_transaction(&mut transaction, user_id).await?;

        transaction.commit().await.map_err(|error| {
            unique_conflict_or_internal(error, "commit user create transaction")
        })?;

        Ok(record)
    }

    pub(super) async fn update_user_impl(
        &self,
        user_id: LocalUserId,
        update: UserUpdate,
    ) -> AppResult<LocalUserRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start user update transaction for user {user_id}: {error}"
            ))
        })?;

        let company_id = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT company_id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock user {user_id}: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

        sqlx::query(
            r#"
            UPDATE users
            SET account_type = COALESCE($2, account_type),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE(LOWER($5), email),
                phone_number = COALESCE($6, phone_number),
                country = COALESCE($7, country),
                disabled = COALESCE($8, disabled),
                password_hash = COALESCE($9, password_hash),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(update.account_type.map(|account_type| account_type.as_str()))
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.email.as_ref().map(EmailAddress::as_str))
        .bind(update.phone_number.as_deref())
        .bind(update.country.as_deref())
        .bind(update.disabled)
        .bind(update.password_hash.as_deref())
        .execute(&mut *transaction)
        .await
        .map_err(|error| unique_conflict_or_internal(error, "update user"))?;

        match (company_id, update.company.as_ref()) {
            (Some(company_id), Some(company)) => {
                sqlx::query(
                    r#"
                    UPDATE companies
                    SET company_name = COALESCE($2, company_name),
                        tax_id = COALESCE($3, tax_id),
                        phone_number = COALESCE($4, phone_number),
                        country = COALESCE($5, country),
                        city = COALESCE($6, city),
                        zip_code = COALESCE($7, zip_code),
                        updated_at = now()
                    WHERE id = $1
                    "#,
                )
                .bind(company_id)
                .bind(company.company_name.as_deref())
                .bind(company.tax_id.as_deref())
                .bind(company.phone_number.as_deref())
                .bind(company.country.as_deref())
                .bind(company.city.as_deref())
                .bind(company.zip_code.as_deref())
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to update company {company_id}: {error}"))
                })?;
            }
            (None, Some(company)) => {
                let company_name = company.company_name.as_deref().ok_or_else(|| {
                    AppError::Validation(format!(
                        "user {user_id} has no company; company name is required to add one"
                    ))
                })?;

                let company_id = sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO companies (company_name, tax_id, phone_number, country, city, zip_code)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id
                    "#,
                )
                .bind(company_name)
                .bind(company.tax_id.as_deref())
                .bind(company.phone_number.as_deref())
                .bind(company.country.as_deref())
                .bind(company.city.as_deref())
                .bind(company.zip_code.as_deref())
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| unique_conflict_or_internal(error, "create company"))?;

                sqlx::query("UPDATE users SET company_id = $2 WHERE id = $1")
                    .bind(user_id.as_i64())
                    .bind(company_id)
                    .execute(&mut *transaction)
                    .await
                    .map_err(|error| {
                        AppError::Internal(format!(
                            "failed to attach company {company_id} to user {user_id}: {error}"
                        ))
                    })?;
            }
            (_, None) => {}
        }

        let record = fetch_in_transaction(&mut transaction, user_id.as_i64()).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit user update transaction for user {user_id}: {error}"
            ))
        })?;

        Ok(record)
    }

    pub(super) async fn delete_by_id_impl(&self, user_id: LocalUserId) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start user delete transaction for user {user_id}: {error}"
            ))
        })?;

        let deleted = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING company_id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user {user_id}: {error}")))?;

        if let Some(Some(company_id)) = deleted {
            sqlx::query("DELETE FROM companies WHERE id = $1")
                .bind(company_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete company {company_id}: {error}"))
                })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit user delete transaction for user {user_id}: {error}"
            ))
        })?;

        Ok(deleted.is_some())
    }
}

async fn fetch_in_transaction(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> AppResult<LocalUserRecord> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE u.id = $1"))
        .bind(user_id)
        .fetch_one(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to reload user {user_id}: {error}")))?;

    LocalUserRecord::try_from(row)
}
