use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use workshop_auth_schema::{otp_codes, pending_signups, users};

use crate::domain::repository::{OtpRepository, SignupRepository};
use crate::domain::types::{OtpRecord, PendingSignup, Role, User};
use crate::error::AuthServiceError;

// ── OTP repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn latest_active(&self, email: &str) -> Result<Option<OtpRecord>, AuthServiceError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Consumed.eq(false))
            .order_by_desc(otp_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest active otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn invalidate_all(&self, email: &str) -> Result<(), AuthServiceError> {
        otp_codes::Entity::update_many()
            .col_expr(otp_codes::Column::Consumed, Expr::value(true))
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Consumed.eq(false))
            .exec(&self.db)
            .await
            .context("invalidate otps for email")?;
        Ok(())
    }

    async fn create(&self, record: &OtpRecord) -> Result<(), AuthServiceError> {
        otp_codes::ActiveModel {
            id: Set(record.id),
            email: Set(record.email.clone()),
            code_hash: Set(record.code_hash.clone()),
            expires_at: Set(record.expires_at),
            attempts: Set(record.attempts as i32),
            consumed: Set(record.consumed),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await
        .context("create otp record")?;
        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), AuthServiceError> {
        otp_codes::Entity::update_many()
            .col_expr(
                otp_codes::Column::Attempts,
                Expr::col(otp_codes::Column::Attempts).add(1),
            )
            .filter(otp_codes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment otp attempts")?;
        Ok(())
    }

    async fn mark_consumed(&self, id: Uuid) -> Result<(), AuthServiceError> {
        otp_codes::ActiveModel {
            id: Set(id),
            consumed: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark otp consumed")?;
        Ok(())
    }
}

fn otp_from_model(model: otp_codes::Model) -> OtpRecord {
    OtpRecord {
        id: model.id,
        email: model.email,
        code_hash: model.code_hash,
        expires_at: model.expires_at,
        attempts: model.attempts.max(0) as u32,
        consumed: model.consumed,
        created_at: model.created_at,
    }
}

// ── Signup repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSignupRepository {
    pub db: DatabaseConnection,
}

impl SignupRepository for DbSignupRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn upsert_pending(&self, pending: &PendingSignup) -> Result<(), AuthServiceError> {
        pending_signups::Entity::insert(pending_signups::ActiveModel {
            email: Set(pending.email.clone()),
            name: Set(pending.name.clone()),
            password_hash: Set(pending.password_hash.clone()),
            role: Set(pending.role.as_str().to_owned()),
            created_at: Set(pending.created_at),
            updated_at: Set(pending.updated_at),
        })
        .on_conflict(
            OnConflict::column(pending_signups::Column::Email)
                .update_columns([
                    pending_signups::Column::Name,
                    pending_signups::Column::PasswordHash,
                    pending_signups::Column::Role,
                    pending_signups::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert pending signup")?;
        Ok(())
    }

    async fn find_pending(&self, email: &str) -> Result<Option<PendingSignup>, AuthServiceError> {
        let model = pending_signups::Entity::find_by_id(email.to_owned())
            .one(&self.db)
            .await
            .context("find pending signup")?;
        model.map(pending_from_model).transpose()
    }

    async fn promote(&self, email: &str, otp_id: Uuid) -> Result<User, AuthServiceError> {
        let email = email.to_owned();
        let result = self
            .db
            .transaction::<_, User, AuthServiceError>(|txn| {
                Box::pin(async move {
                    let pending = pending_signups::Entity::find_by_id(email.clone())
                        .one(txn)
                        .await
                        .context("load pending signup in txn")?
                        .ok_or(AuthServiceError::NoPendingSignup)?;

                    // Re-check inside the transaction: two concurrent
                    // verifications for the same email must not both insert.
                    // The unique index on users.email is the last resort if
                    // isolation lets both past this point.
                    let existing = users::Entity::find()
                        .filter(users::Column::Email.eq(email.clone()))
                        .one(txn)
                        .await
                        .context("check existing user in txn")?;
                    if existing.is_some() {
                        return Err(AuthServiceError::AlreadyRegistered);
                    }

                    let user = insert_user_from_pending(txn, &pending).await?;

                    pending_signups::Entity::delete_by_id(email)
                        .exec(txn)
                        .await
                        .context("delete pending signup in txn")?;

                    otp_codes::ActiveModel {
                        id: Set(otp_id),
                        consumed: Set(true),
                        ..Default::default()
                    }
                    .update(txn)
                    .await
                    .context("consume otp in txn")?;

                    Ok(user)
                })
            })
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(TransactionError::Transaction(err)) => Err(err),
            Err(TransactionError::Connection(err)) => Err(AuthServiceError::Storage(
                anyhow::Error::new(err).context("promotion transaction"),
            )),
        }
    }
}

async fn insert_user_from_pending(
    txn: &DatabaseTransaction,
    pending: &pending_signups::Model,
) -> Result<User, AuthServiceError> {
    let role = parse_stored_role(&pending.role)?;
    let model = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(pending.email.clone()),
        name: Set(pending.name.clone()),
        password_hash: Set(pending.password_hash.clone()),
        role: Set(pending.role.clone()),
        active: Set(true),
        banned: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await
    .context("insert user in txn")?;
    Ok(User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        role,
        active: model.active,
        banned: model.banned,
        created_at: model.created_at,
    })
}

fn parse_stored_role(role: &str) -> Result<Role, AuthServiceError> {
    Role::parse(role)
        .ok_or_else(|| AuthServiceError::Internal(anyhow::anyhow!("unknown role in storage: {role}")))
}

fn user_from_model(model: users::Model) -> Result<User, AuthServiceError> {
    Ok(User {
        role: parse_stored_role(&model.role)?,
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        active: model.active,
        banned: model.banned,
        created_at: model.created_at,
    })
}

fn pending_from_model(model: pending_signups::Model) -> Result<PendingSignup, AuthServiceError> {
    Ok(PendingSignup {
        role: parse_stored_role(&model.role)?,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
