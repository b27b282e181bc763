use std::sync::Arc;

use mongodb::bson::{self, doc, Document};
use serde_json::Value;

use crate::db::store::{DocumentStore, SERVER_TIMESTAMP, USERS, USER_ACTIVITIES};
use crate::error::ProfileError;
use crate::models::user::{
    activity_json, LoginRequest, Profile, ProfileUpdate, UserRecord, RECENT_ACTIVITY_LIMIT,
};

/// Per-user profile documents in the `users` collection.
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Records a sign-in, creating the user document on first login.
    pub async fn record_login(
        &self,
        user_id: &str,
        email: &str,
        login: LoginRequest,
    ) -> Result<(), ProfileError> {
        let existing = self
            .store
            .get(USERS, user_id)
            .await
            .map_err(ProfileError::Load)?;

        let mut fields = doc! {
            "email": email,
            "last_login": SERVER_TIMESTAMP,
            "updated_at": SERVER_TIMESTAMP,
        };
        if let Some(name) = non_blank(login.display_name) {
            fields.insert("display_name", name);
        }
        if let Some(photo_url) = non_blank(login.photo_url) {
            fields.insert("photo_url", photo_url);
        }
        if existing.is_none() {
            if !fields.contains_key("display_name") {
                fields.insert("display_name", email.split('@').next().unwrap_or_default());
            }
            fields.insert("created_at", SERVER_TIMESTAMP);
        }

        self.store
            .merge(USERS, user_id, fields)
            .await
            .map_err(ProfileError::Save)?;
        log::info!("Recorded login for user {}", user_id);
        Ok(())
    }

    /// Stored profile of `user_id` with its recent activity feed.
    pub async fn profile(&self, user_id: &str, email: &str) -> Result<Profile, ProfileError> {
        let document = self
            .store
            .get(USERS, user_id)
            .await
            .map_err(ProfileError::Load)?
            .ok_or_else(|| ProfileError::NotFound(user_id.to_string()))?;

        let record: UserRecord = bson::from_document(document)
            .map_err(|err| ProfileError::Validation(format!("Stored profile is invalid: {}", err)))?;
        let activities = self.recent_activities(user_id).await;

        Ok(Profile::from_record(user_id, email, record, activities))
    }

    /// Overwrites the provided profile fields and stamps `updated_at`.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<(), ProfileError> {
        if update.display_name.is_none() && update.bio.is_none() {
            return Err(ProfileError::Validation(
                "Provide a display name or bio to update".to_string(),
            ));
        }

        let mut fields = Document::new();
        if let Some(display_name) = update.display_name {
            let display_name = display_name.trim();
            if display_name.is_empty() {
                return Err(ProfileError::Validation(
                    "Display name cannot be empty".to_string(),
                ));
            }
            fields.insert("display_name", display_name);
        }
        if let Some(bio) = update.bio {
            fields.insert("bio", bio);
        }
        fields.insert("updated_at", SERVER_TIMESTAMP);

        self.store
            .merge(USERS, user_id, fields)
            .await
            .map_err(ProfileError::Save)?;
        log::info!("Updated profile for user {}", user_id);
        Ok(())
    }

    /// Latest activities of a user, newest first. Read failures yield an empty feed.
    pub async fn recent_activities(&self, user_id: &str) -> Vec<Value> {
        match self
            .store
            .recent_by_user(USER_ACTIVITIES, user_id, "timestamp", RECENT_ACTIVITY_LIMIT)
            .await
        {
            Ok(documents) => documents.into_iter().map(activity_json).collect(),
            Err(err) => {
                log::error!("Error getting recent activities: {}", err);
                Vec::new()
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::db::store::{is_server_timestamp, StoreError};

    #[derive(Default)]
    struct UsersStore {
        users: Mutex<HashMap<String, Document>>,
        merges: Mutex<Vec<Document>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl DocumentStore for UsersStore {
        async fn add(&self, _collection: &str, _fields: Document) -> Result<String, StoreError> {
            Ok("unused".to_string())
        }

        async fn find_by_user(
            &self,
            _collection: &str,
            _user_id: &str,
        ) -> Result<Vec<Document>, StoreError> {
            Ok(Vec::new())
        }

        async fn get(&self, _collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Read("offline".into()));
            }
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn merge(&self, _collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
            self.merges.lock().unwrap().push(fields.clone());
            let mut users = self.users.lock().unwrap();
            let user = users.entry(id.to_string()).or_default();
            for (key, value) in fields {
                user.insert(key, value);
            }
            Ok(())
        }

        async fn recent_by_user(
            &self,
            _collection: &str,
            _user_id: &str,
            _order_by: &str,
            _limit: i64,
        ) -> Result<Vec<Document>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Read("offline".into()));
            }
            Ok(vec![doc! { "_id": "a1", "user_id": "u1", "description": "Saved Paris" }])
        }
    }

    fn service() -> (ProfileService, Arc<UsersStore>) {
        let store = Arc::new(UsersStore::default());
        (ProfileService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_first_login_creates_user() {
        let (service, store) = service();
        service
            .record_login("u1", "ada@example.com", LoginRequest::default())
            .await
            .unwrap();

        let merges = store.merges.lock().unwrap();
        let fields = &merges[0];
        assert_eq!(fields.get_str("email").unwrap(), "ada@example.com");
        assert_eq!(fields.get_str("display_name").unwrap(), "ada");
        assert!(is_server_timestamp(fields.get("last_login").unwrap()));
        assert!(is_server_timestamp(fields.get("updated_at").unwrap()));
        assert!(is_server_timestamp(fields.get("created_at").unwrap()));
    }

    #[tokio::test]
    async fn test_repeat_login_keeps_name_and_creation() {
        let (service, store) = service();
        service
            .record_login("u1", "ada@example.com", LoginRequest::default())
            .await
            .unwrap();
        service
            .update_profile(
                "u1",
                ProfileUpdate {
                    display_name: Some("Ada L.".into()),
                    bio: None,
                },
            )
            .await
            .unwrap();
        service
            .record_login("u1", "ada@example.com", LoginRequest::default())
            .await
            .unwrap();

        let merges = store.merges.lock().unwrap();
        let second_login = &merges[2];
        assert!(!second_login.contains_key("display_name"));
        assert!(!second_login.contains_key("created_at"));
        let user = store.users.lock().unwrap()["u1"].clone();
        assert_eq!(user.get_str("display_name").unwrap(), "Ada L.");
    }

    #[tokio::test]
    async fn test_update_writes_only_given_fields() {
        let (service, store) = service();
        service
            .update_profile(
                "u1",
                ProfileUpdate {
                    display_name: None,
                    bio: Some("Slow traveler".into()),
                },
            )
            .await
            .unwrap();

        let merges = store.merges.lock().unwrap();
        let keys: Vec<&str> = merges[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["bio", "updated_at"]);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let (service, store) = service();
        for update in [
            ProfileUpdate::default(),
            ProfileUpdate {
                display_name: Some("  ".into()),
                bio: None,
            },
        ] {
            let result = service.update_profile("u1", update).await;
            assert!(matches!(result, Err(ProfileError::Validation(_))));
        }
        assert!(store.merges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_requires_stored_user() {
        let (service, _) = service();
        let result = service.profile("nobody", "x@example.com").await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_includes_activity_feed() {
        let (service, store) = service();
        store
            .users
            .lock()
            .unwrap()
            .insert("u1".into(), doc! { "_id": "u1", "bio": "Hiker" });

        let profile = service.profile("u1", "ada@example.com").await.unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.bio, "Hiker");
        assert_eq!(profile.recent_activities.len(), 1);
        assert_eq!(profile.recent_activities[0]["description"], "Saved Paris");
    }

    #[tokio::test]
    async fn test_activity_failure_is_empty_feed() {
        let store = Arc::new(UsersStore {
            fail_reads: true,
            ..Default::default()
        });
        let service = ProfileService::new(store);
        assert!(service.recent_activities("u1").await.is_empty());
    }
}
