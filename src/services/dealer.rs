//! Dealer lifecycle service (administrator only)
//!
//! Onboarding provisions the dealer together with its paired
//! dealer-member account; the generated temporary credential is returned
//! exactly once. Status transitions go through the typed methods on
//! `Dealer`, so an invalid transition cannot be expressed.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    db::{DealerRepository, UserRepository},
    models::{
        CreateDealerRequest, Dealer, DealerTransitionError, UpdateDealerRequest, User,
    },
    services::auth::AuthService,
    utils::{validation, AppError},
};

pub struct DealerService {
    pool: SqlitePool,
    auth: AuthConfig,
}

impl DealerService {
    pub fn new(pool: SqlitePool, auth: AuthConfig) -> Self {
        Self { pool, auth }
    }

    /// All dealers, newest first
    pub async fn list(&self) -> Result<Vec<Dealer>, AppError> {
        Ok(DealerRepository::new(&self.pool).list().await?)
    }

    pub async fn get(&self, dealer_id: Uuid) -> Result<Dealer, AppError> {
        DealerRepository::new(&self.pool)
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))
    }

    /// Onboard a dealer: the Dealer record plus a paired dealer-member
    /// account holding a freshly generated temporary credential.
    pub async fn onboard(
        &self,
        req: &CreateDealerRequest,
    ) -> Result<(Dealer, User, String), AppError> {
        req.validate()?;
        if !validation::validate_username(&req.username) {
            return Err(AppError::ValidationError(
                "Username must start with a letter and use only letters, digits, dots, dashes"
                    .to_string(),
            ));
        }
        if !validation::validate_phone(&req.primary_contact_phone) {
            return Err(AppError::ValidationError(
                "Contact phone must contain at least 6 digits".to_string(),
            ));
        }

        let dealer = Dealer::new(
            req.company_name.trim().to_string(),
            req.primary_contact_name.trim().to_string(),
            req.primary_contact_email.trim().to_string(),
            req.primary_contact_phone.trim().to_string(),
            req.address.trim().to_string(),
        );

        let temp_password = AuthService::generate_temp_password();
        let temp_hash = AuthService::hash_password(&temp_password)?;
        // The standing credential starts unusable: the account can only
        // come alive through the temporary credential and a forced change.
        let placeholder_hash = AuthService::hash_password(&AuthService::generate_temp_password())?;

        let mut user = User::new_dealer_member(
            dealer.id,
            req.username.trim().to_string(),
            req.primary_contact_email.trim().to_string(),
            req.primary_contact_name.trim().to_string(),
            placeholder_hash,
        );
        user.temp_password_hash = Some(temp_hash);
        user.temp_password_expiry =
            Some(Utc::now() + chrono::Duration::hours(self.auth.temp_password_expiry_hours as i64));
        user.force_password_change = true;

        let dealers = DealerRepository::new(&self.pool);
        let users = UserRepository::new(&self.pool);

        dealers.insert(&dealer).await?;
        if let Err(err) = users.insert(&user).await {
            // Roll the dealer row back so a username collision leaves no
            // half-provisioned tenant behind.
            if let Err(cleanup) = dealers.remove(dealer.id).await {
                tracing::error!(dealer = %dealer.id, error = %cleanup, "Failed to roll back dealer after account collision");
            }
            return Err(AppError::from_repo(
                err,
                AppError::DuplicateIdentity(format!(
                    "Username \"{}\" is already taken",
                    req.username.trim()
                )),
            ));
        }

        Ok((dealer, user, temp_password))
    }

    /// Update profile fields. Status is never writable here.
    pub async fn update(
        &self,
        dealer_id: Uuid,
        req: &UpdateDealerRequest,
    ) -> Result<Dealer, AppError> {
        let dealers = DealerRepository::new(&self.pool);
        let mut dealer = dealers
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        if let Some(ref v) = req.company_name {
            dealer.company_name = v.trim().to_string();
        }
        if let Some(ref v) = req.primary_contact_name {
            dealer.primary_contact_name = v.trim().to_string();
        }
        if let Some(ref v) = req.primary_contact_email {
            dealer.primary_contact_email = v.trim().to_string();
        }
        if let Some(ref v) = req.primary_contact_phone {
            dealer.primary_contact_phone = v.trim().to_string();
        }
        if let Some(ref v) = req.address {
            dealer.address = v.trim().to_string();
        }

        dealers.update(&dealer).await?;
        Ok(dealer)
    }

    /// Suspend membership; blocks login until reinstated
    pub async fn suspend(&self, dealer_id: Uuid, reason: &str) -> Result<Dealer, AppError> {
        if !validation::validate_reason(reason) {
            return Err(AppError::ValidationError(
                "Suspension reason is required".to_string(),
            ));
        }

        let dealers = DealerRepository::new(&self.pool);
        let mut dealer = dealers
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        dealer
            .suspend(reason.trim().to_string())
            .map_err(transition_error)?;
        dealers.update(&dealer).await?;
        Ok(dealer)
    }

    /// Reinstate a suspended dealer
    pub async fn activate(&self, dealer_id: Uuid) -> Result<Dealer, AppError> {
        let dealers = DealerRepository::new(&self.pool);
        let mut dealer = dealers
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        dealer.activate().map_err(transition_error)?;
        dealers.update(&dealer).await?;
        Ok(dealer)
    }

    /// Terminal deletion. The record stays for history and for the
    /// cross-tenant search join; only the status is final.
    pub async fn delete(&self, dealer_id: Uuid, reason: &str) -> Result<Dealer, AppError> {
        if !validation::validate_reason(reason) {
            return Err(AppError::ValidationError(
                "Deletion reason is required".to_string(),
            ));
        }

        let dealers = DealerRepository::new(&self.pool);
        let mut dealer = dealers
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        dealer
            .mark_deleted(reason.trim().to_string(), Utc::now().date_naive())
            .map_err(transition_error)?;
        dealers.update(&dealer).await?;
        Ok(dealer)
    }

    /// Regenerate the temporary credential for the dealer's paired
    /// account. The plaintext is returned exactly once.
    pub async fn reset_password(&self, dealer_id: Uuid) -> Result<(User, String), AppError> {
        // Resolve the dealer first so an unknown id is NotFound rather
        // than an account lookup miss.
        self.get(dealer_id).await?;

        let users = UserRepository::new(&self.pool);
        let user = users
            .get_by_dealer(dealer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account for dealer not found".to_string()))?;

        let auth = AuthService::new(self.pool.clone(), self.auth.clone());
        let temp = auth.issue_temp_password(user.id).await?;
        Ok((user, temp))
    }
}

fn transition_error(err: DealerTransitionError) -> AppError {
    match err {
        DealerTransitionError::Deleted => AppError::DealerDeleted,
        DealerTransitionError::AlreadyDeleted => AppError::AlreadyDeleted,
        DealerTransitionError::NotSuspended => {
            AppError::ValidationError("Dealer is not suspended".to_string())
        }
    }
}
