use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::engine::rating::{apply_rating, DEFAULT_RATING};
use crate::error::AppError;
use crate::models::profile::{UserProfile, UserRole};

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: String,
    pub document: String,
    pub vehicle_plate: Option<String>,
}

/// Partial field update; `None` leaves a field untouched. Role, balance and
/// rating are deliberately absent: role is fixed at registration, the other
/// two move only through their dedicated operations.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub avatar_url: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_verified: Option<bool>,
}

/// In-process stand-in for the remote profile/courier records. The courier
/// extension shares the profile id, so one map holds both.
#[derive(Default)]
pub struct ProfileStore {
    profiles: DashMap<Uuid, UserProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn create(&self, new: NewProfile) -> UserProfile {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            role: new.role,
            phone: new.phone,
            document: new.document,
            avatar_url: None,
            vehicle_plate: new.vehicle_plate,
            balance: 0.0,
            rating: DEFAULT_RATING,
            total_ratings: 0,
            is_verified: false,
            updated_at: Utc::now(),
        };

        self.profiles.insert(profile.id, profile.clone());
        profile
    }

    pub fn get(&self, id: Uuid) -> Option<UserProfile> {
        self.profiles.get(&id).map(|entry| entry.value().clone())
    }

    pub fn update_fields(&self, id: Uuid, update: ProfileUpdate) -> Result<UserProfile, AppError> {
        let mut profile = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))?;

        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(email) = update.email {
            profile.email = email;
        }
        if let Some(phone) = update.phone {
            profile.phone = phone;
        }
        if let Some(document) = update.document {
            profile.document = document;
        }
        if let Some(avatar_url) = update.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }
        if let Some(vehicle_plate) = update.vehicle_plate {
            profile.vehicle_plate = Some(vehicle_plate);
        }
        if let Some(is_verified) = update.is_verified {
            profile.is_verified = is_verified;
        }
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }

    /// Folds one star rating into the running average under the entry lock.
    pub fn apply_rating(&self, id: Uuid, stars: u8) -> Result<UserProfile, AppError> {
        let mut profile = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))?;

        let (rating, total_ratings) = apply_rating(profile.rating, profile.total_ratings, stars);
        profile.rating = rating;
        profile.total_ratings = total_ratings;
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }

    /// Adds finished-order earnings to the courier's balance. Called once
    /// per order, on the transition into FINISHED.
    pub fn accrue_earnings(&self, id: Uuid, amount: f64) -> Result<UserProfile, AppError> {
        let mut profile = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))?;

        profile.balance += amount;
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }
}
