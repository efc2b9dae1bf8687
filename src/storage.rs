// ABOUTME: SeaORM storage layer for profiles, payment methods and social connections
// ABOUTME: Every query is scoped by owner except public profile reads; reorder runs in one transaction

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::entities::{payment_method, profile, social_connection};
use crate::error::{AppError, Result};
use crate::migration::Migrator;
use crate::payment::PaymentMethodDraft;
use crate::social::SocialLink;
use crate::types::{SocialConnectionRequest, UpdateProfileRequest};
use crate::username;

pub const USERNAME_TAKEN_MESSAGE: &str = "Username already taken";
pub const USERNAME_IMMUTABLE_MESSAGE: &str = "Username cannot be changed once set";
pub const REORDER_FAILED_MESSAGE: &str = "Failed to update some payment methods";

pub struct Storage {
    pub db: DatabaseConnection,
}

/// Result of a profile patch. `replaced_avatar` holds the previous URL when the avatar changed.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub profile: profile::Model,
    pub replaced_avatar: Option<String>,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Storage {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options.sqlx_logging(false);
        if database_url.contains(":memory:") {
            // Every pooled connection to sqlite::memory: would be a separate empty database
            options.max_connections(1).min_connections(1);
        }

        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;

        tracing::info!("Connected to database and applied migrations");
        Ok(Self { db })
    }

    // Profile operations

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<profile::Model>> {
        Ok(profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?)
    }

    pub async fn get_profile_by_username(&self, name: &str) -> Result<Option<profile::Model>> {
        Ok(profile::Entity::find()
            .filter(profile::Column::Username.eq(username::normalize(name)))
            .one(&self.db)
            .await?)
    }

    pub async fn username_exists(&self, name: &str) -> Result<bool> {
        Ok(self.get_profile_by_username(name).await?.is_some())
    }

    /// Create the profile row on first authentication; existing rows are returned as-is.
    pub async fn ensure_profile(&self, user_id: &str, email: &str) -> Result<profile::Model> {
        if let Some(existing) = self.get_profile(user_id).await? {
            return Ok(existing);
        }

        let timestamp = now();
        let profile = profile::ActiveModel {
            id: Set(user_id.to_string()),
            email: Set(email.to_string()),
            username: Set(None),
            display_name: Set(None),
            bio: Set(None),
            avatar_url: Set(None),
            social_links: Set("[]".to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        let created = profile.insert(&self.db).await?;
        tracing::info!("Created profile for user {}", user_id);
        Ok(created)
    }

    /// Upsert keyed by user id. The username must already be validated and lower-cased.
    pub async fn claim_username(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> Result<profile::Model> {
        let timestamp = now();

        let result = match self.get_profile(user_id).await? {
            Some(existing) => {
                if let Some(current) = existing.username.as_deref() {
                    if current != name {
                        return Err(AppError::Conflict(USERNAME_IMMUTABLE_MESSAGE.to_string()));
                    }
                }

                let mut active: profile::ActiveModel = existing.into();
                active.email = Set(email.to_string());
                active.username = Set(Some(name.to_string()));
                active.updated_at = Set(timestamp);
                active.update(&self.db).await
            }
            None => {
                profile::ActiveModel {
                    id: Set(user_id.to_string()),
                    email: Set(email.to_string()),
                    username: Set(Some(name.to_string())),
                    display_name: Set(None),
                    bio: Set(None),
                    avatar_url: Set(None),
                    social_links: Set("[]".to_string()),
                    created_at: Set(timestamp),
                    updated_at: Set(timestamp),
                }
                .insert(&self.db)
                .await
            }
        };

        match result {
            Ok(profile) => {
                tracing::info!("User {} claimed username {}", user_id, name);
                Ok(profile)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(AppError::Conflict(USERNAME_TAKEN_MESSAGE.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the stored social links. Links must already be normalized.
    pub async fn update_social_links(
        &self,
        user_id: &str,
        links: &[SocialLink],
    ) -> Result<profile::Model> {
        let existing = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        let mut active: profile::ActiveModel = existing.into();
        active.social_links = Set(serde_json::to_string(links)?);
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Apply only the fields present in `patch`; blank strings clear a field.
    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: &UpdateProfileRequest,
    ) -> Result<ProfileUpdate> {
        let existing = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        let previous_avatar = existing.avatar_url.clone();
        let mut active: profile::ActiveModel = existing.into();

        if let Some(display_name) = &patch.display_name {
            active.display_name = Set(blank_to_none(display_name));
        }
        if let Some(bio) = &patch.bio {
            active.bio = Set(blank_to_none(bio));
        }

        let mut avatar_changed = false;
        if let Some(avatar_url) = &patch.avatar_url {
            let new_avatar = blank_to_none(avatar_url);
            avatar_changed = new_avatar != previous_avatar;
            active.avatar_url = Set(new_avatar);
        }
        if let Some(links) = &patch.social_links {
            active.social_links = Set(serde_json::to_string(links)?);
        }
        active.updated_at = Set(now());

        let profile = active.update(&self.db).await?;

        Ok(ProfileUpdate {
            profile,
            replaced_avatar: if avatar_changed { previous_avatar } else { None },
        })
    }

    // Payment method operations

    pub async fn list_payment_methods(&self, user_id: &str) -> Result<Vec<payment_method::Model>> {
        Ok(payment_method::Entity::find()
            .filter(payment_method::Column::UserId.eq(user_id))
            .order_by_asc(payment_method::Column::DisplayOrder)
            .order_by_asc(payment_method::Column::CreatedAt)
            .order_by_asc(payment_method::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_payment_method(
        &self,
        user_id: &str,
        draft: &PaymentMethodDraft,
    ) -> Result<payment_method::Model> {
        let last = payment_method::Entity::find()
            .filter(payment_method::Column::UserId.eq(user_id))
            .order_by_desc(payment_method::Column::DisplayOrder)
            .one(&self.db)
            .await?;
        let display_order = last.map(|method| method.display_order).unwrap_or(0) + 1;

        let timestamp = now();
        let mut active = payment_method::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.to_string()),
            display_order: Set(display_order),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
            ..Default::default()
        };
        draft.apply_to(&mut active);

        let created = active.insert(&self.db).await?;
        tracing::info!(
            "Created {} payment method {} for user {}",
            created.category,
            created.id,
            user_id
        );
        Ok(created)
    }

    pub async fn update_payment_method(
        &self,
        user_id: &str,
        method_id: Uuid,
        draft: &PaymentMethodDraft,
    ) -> Result<payment_method::Model> {
        let existing = payment_method::Entity::find_by_id(method_id)
            .filter(payment_method::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment method not found".to_string()))?;

        let mut active: payment_method::ActiveModel = existing.into();
        draft.apply_to(&mut active);
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_payment_method(&self, user_id: &str, method_id: Uuid) -> Result<()> {
        let result = payment_method::Entity::delete_many()
            .filter(payment_method::Column::Id.eq(method_id))
            .filter(payment_method::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Payment method not found".to_string()));
        }

        tracing::info!("Deleted payment method {} for user {}", method_id, user_id);
        Ok(())
    }

    /// Assign `display_order = index + 1` to each id. All-or-nothing: an id the user
    /// does not own rolls back every write.
    pub async fn reorder_payment_methods(
        &self,
        user_id: &str,
        method_ids: &[Uuid],
    ) -> Result<Vec<payment_method::Model>> {
        let txn = self.db.begin().await?;
        let timestamp = now();

        for (index, method_id) in method_ids.iter().enumerate() {
            let result = payment_method::Entity::update_many()
                .col_expr(
                    payment_method::Column::DisplayOrder,
                    Expr::value(index as i32 + 1),
                )
                .col_expr(payment_method::Column::UpdatedAt, Expr::value(timestamp))
                .filter(payment_method::Column::Id.eq(*method_id))
                .filter(payment_method::Column::UserId.eq(user_id))
                .exec(&txn)
                .await?;

            if result.rows_affected != 1 {
                txn.rollback().await?;
                tracing::warn!(
                    "Reorder for user {} rejected: payment method {} not owned",
                    user_id,
                    method_id
                );
                return Err(AppError::BadRequest(REORDER_FAILED_MESSAGE.to_string()));
            }
        }

        txn.commit().await?;
        self.list_payment_methods(user_id).await
    }

    /// Profile plus its methods for the public page. No ownership filter.
    pub async fn get_public_profile(
        &self,
        name: &str,
    ) -> Result<Option<(profile::Model, Vec<payment_method::Model>)>> {
        let Some(profile) = self.get_profile_by_username(name).await? else {
            return Ok(None);
        };

        let methods = self.list_payment_methods(&profile.id).await?;
        Ok(Some((profile, methods)))
    }

    // Social connection operations

    pub async fn list_social_connections(
        &self,
        user_id: &str,
    ) -> Result<Vec<social_connection::Model>> {
        Ok(social_connection::Entity::find()
            .filter(social_connection::Column::UserId.eq(user_id))
            .order_by_asc(social_connection::Column::Platform)
            .all(&self.db)
            .await?)
    }

    /// Record a verified connection, replacing any previous one for the same platform.
    pub async fn upsert_social_connection(
        &self,
        user_id: &str,
        request: &SocialConnectionRequest,
    ) -> Result<social_connection::Model> {
        let claimed_elsewhere = social_connection::Entity::find()
            .filter(social_connection::Column::Platform.eq(request.platform.as_str()))
            .filter(social_connection::Column::PlatformUserId.eq(request.platform_user_id.as_str()))
            .filter(social_connection::Column::UserId.ne(user_id))
            .one(&self.db)
            .await?;
        if claimed_elsewhere.is_some() {
            return Err(AppError::Conflict(
                "This account is already connected to another profile".to_string(),
            ));
        }

        let existing = social_connection::Entity::find()
            .filter(social_connection::Column::UserId.eq(user_id))
            .filter(social_connection::Column::Platform.eq(request.platform.as_str()))
            .one(&self.db)
            .await?;

        let (mut active, is_new): (social_connection::ActiveModel, bool) = match existing {
            Some(model) => (model.into(), false),
            None => (
                social_connection::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id.to_string()),
                    platform: Set(request.platform.clone()),
                    ..Default::default()
                },
                true,
            ),
        };

        active.platform_user_id = Set(request.platform_user_id.clone());
        active.platform_username = Set(request.platform_username.clone());
        active.platform_display_name = Set(request.platform_display_name.clone());
        active.platform_avatar_url = Set(request.platform_avatar_url.clone());
        active.verified_at = Set(now());

        let saved = if is_new {
            active.insert(&self.db).await?
        } else {
            active.update(&self.db).await?
        };

        tracing::info!("Recorded {} connection for user {}", saved.platform, user_id);
        Ok(saved)
    }

    pub async fn delete_social_connection(&self, user_id: &str, platform: &str) -> Result<()> {
        let result = social_connection::Entity::delete_many()
            .filter(social_connection::Column::UserId.eq(user_id))
            .filter(social_connection::Column::Platform.eq(platform))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Social connection not found".to_string()));
        }

        Ok(())
    }
}
