//! Profile preferences: service type and timezone

use std::sync::Arc;

use tracing::{info, instrument, warn};

use cleanclip_db::{DbError, ProfileRepository, UpsertProfile, UserRepository};
use cleanclip_types::{Identity, Profile, ServiceType, Timezone, UserId};

use crate::ProfileError;

/// Onboarding input as received from the client
#[derive(Debug, Clone)]
pub struct OnboardRequest {
    pub service_type: String,
    pub timezone: String,
}

/// Profile service
pub struct ProfileService<U: UserRepository, P: ProfileRepository> {
    users: Arc<U>,
    profiles: Arc<P>,
}

impl<U: UserRepository, P: ProfileRepository> ProfileService<U, P> {
    /// Create a new profile service
    pub fn new(users: Arc<U>, profiles: Arc<P>) -> Self {
        Self { users, profiles }
    }

    /// Stored profile, or defaults when the user has not onboarded yet
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: &UserId) -> Result<Profile, ProfileError> {
        let Some(row) = self.profiles.find_by_user_id(user_id.0).await? else {
            return Ok(Profile::default_for(*user_id));
        };

        let (profile, rejected) = row.into_profile()?;
        if let Some(name) = rejected {
            warn!(timezone = %name, "Stored timezone is invalid, reporting default");
        }
        Ok(profile)
    }

    /// Set service type and timezone and mark onboarding complete
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn onboard(
        &self,
        identity: &Identity,
        request: OnboardRequest,
    ) -> Result<Profile, ProfileError> {
        let service_type = parse_service_type(&request.service_type)?;
        let timezone = parse_timezone(&request.timezone)?;

        self.ensure_user(identity).await?;
        self.profiles
            .upsert(UpsertProfile {
                user_id: identity.id.0,
                service_type: service_type.as_str().to_string(),
                timezone: timezone.name().to_string(),
                onboarding_completed: true,
            })
            .await?;

        info!(%service_type, %timezone, "Onboarding completed");
        Ok(Profile {
            user_id: identity.id,
            service_type,
            timezone,
            onboarding_completed: true,
        })
    }

    /// Switch service type. Delivery history is kept.
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn update_service_type(
        &self,
        identity: &Identity,
        service_type: &str,
    ) -> Result<ServiceType, ProfileError> {
        let service_type = parse_service_type(service_type)?;

        match self
            .profiles
            .update_service_type(identity.id.0, service_type.as_str())
            .await
        {
            Ok(()) => {}
            Err(DbError::NotFound) => {
                let mut profile = Profile::default_for(identity.id);
                profile.service_type = service_type;
                self.create_profile(identity, profile).await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(service_type)
    }

    /// Change timezone; takes effect on the next daily content request
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn update_timezone(
        &self,
        identity: &Identity,
        timezone: &str,
    ) -> Result<Timezone, ProfileError> {
        let timezone = parse_timezone(timezone)?;

        match self
            .profiles
            .update_timezone(identity.id.0, timezone.name())
            .await
        {
            Ok(()) => {}
            Err(DbError::NotFound) => {
                let mut profile = Profile::default_for(identity.id);
                profile.timezone = timezone;
                self.create_profile(identity, profile).await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(timezone)
    }

    async fn create_profile(&self, identity: &Identity, profile: Profile) -> Result<(), ProfileError> {
        self.ensure_user(identity).await?;
        self.profiles
            .upsert(UpsertProfile {
                user_id: profile.user_id.0,
                service_type: profile.service_type.as_str().to_string(),
                timezone: profile.timezone.name().to_string(),
                onboarding_completed: profile.onboarding_completed,
            })
            .await?;
        Ok(())
    }

    /// Profiles reference users, so make sure the user row exists first
    async fn ensure_user(&self, identity: &Identity) -> Result<(), ProfileError> {
        if self.users.find_by_id(identity.id.0).await?.is_some() {
            return Ok(());
        }
        let email = identity.email.as_deref().ok_or(ProfileError::MissingEmail)?;
        self.users.ensure(identity.id.0, email).await?;
        Ok(())
    }
}

fn parse_service_type(value: &str) -> Result<ServiceType, ProfileError> {
    value
        .parse()
        .map_err(|_| ProfileError::InvalidServiceType(value.to_string()))
}

fn parse_timezone(value: &str) -> Result<Timezone, ProfileError> {
    if value.trim().is_empty() {
        return Err(ProfileError::InvalidTimezone("timezone required".to_string()));
    }
    Timezone::parse(value).map_err(|_| ProfileError::InvalidTimezone(value.to_string()))
}
