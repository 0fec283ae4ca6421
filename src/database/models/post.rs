use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

pub const POST_TYPE_LOST: &str = "Lost";
pub const POST_TYPE_FOUND: &str = "Found";

/// The only status value a post can carry; unset means "still lost/found"
pub const STATUS_RECOVERED: &str = "recovered";

/// A lost-or-found listing. JSON field names are part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub thumbnail: String,
    pub post_type: String,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    /// Owner email, taken from the verified token at creation time
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Normalized insert payload for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub thumbnail: String,
    pub post_type: String,
    pub date: Option<NaiveDate>,
    pub email: String,
    pub name: Option<String>,
}

/// Incoming body for `POST /posts`. The email field is checked against the
/// authenticated identity but never stored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub post_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub email: Option<String>,
    pub name: Option<String>,
}

fn validate_post_type(raw: &str) -> Result<String, ApiError> {
    let post_type = raw.trim();
    if post_type != POST_TYPE_LOST && post_type != POST_TYPE_FOUND {
        return Err(ApiError::bad_request(format!(
            "postType must be either '{}' or '{}'",
            POST_TYPE_LOST, POST_TYPE_FOUND
        )));
    }
    Ok(post_type.to_string())
}

impl CreatePostRequest {
    /// Validate required fields and normalize the payload into an insertable
    /// post owned by `owner_email`. Text fields are trimmed and the category
    /// is stored lowercased.
    pub fn into_new_post(self, owner_email: &str) -> Result<NewPost, ApiError> {
        let mut errors = Vec::new();
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("category", &self.category),
            ("thumbnail", &self.thumbnail),
            ("postType", &self.post_type),
        ];
        for (field, value) in required {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                errors.push(format!("{} is required", field));
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Missing required fields", errors));
        }

        let post_type = validate_post_type(self.post_type.as_deref().unwrap_or_default())?;

        Ok(NewPost {
            title: self.title.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default().trim().to_string(),
            location: self.location.unwrap_or_default().trim().to_string(),
            category: self.category.unwrap_or_default().trim().to_lowercase(),
            thumbnail: self.thumbnail.unwrap_or_default().trim().to_string(),
            post_type,
            date: self.date,
            email: owner_email.to_string(),
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

/// Incoming body for `PATCH /update-post/:id`. Only these fields may be
/// modified; anything else in the body is dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub date: Option<NaiveDate>,
    pub post_type: Option<String>,
}

/// Whitelisted, normalized field updates ready to be applied to a post
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub date: Option<NaiveDate>,
    pub post_type: Option<String>,
}

impl UpdatePostRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.thumbnail.is_none()
            && self.date.is_none()
            && self.post_type.is_none()
    }

    /// Normalize the update the same way creation does (trimmed text,
    /// lowercased category) and reject unusable values. A body that carries
    /// no whitelisted field at all is rejected here.
    pub fn normalize(self) -> Result<PostChanges, ApiError> {
        if self.is_empty() {
            return Err(ApiError::bad_request("No valid updates provided"));
        }

        let title = match self.title {
            Some(raw) => {
                let title = raw.trim().to_string();
                if title.is_empty() {
                    return Err(ApiError::bad_request("Title cannot be empty"));
                }
                Some(title)
            }
            None => None,
        };

        let description = match self.description {
            Some(raw) => {
                let description = raw.trim().to_string();
                if description.is_empty() {
                    return Err(ApiError::bad_request("Description cannot be empty"));
                }
                Some(description)
            }
            None => None,
        };

        let post_type = match self.post_type {
            Some(raw) => Some(validate_post_type(&raw)?),
            None => None,
        };

        Ok(PostChanges {
            title,
            description,
            location: self.location.map(|v| v.trim().to_string()),
            category: self.category.map(|v| v.trim().to_lowercase()),
            thumbnail: self.thumbnail.map(|v| v.trim().to_string()),
            date: self.date,
            post_type,
        })
    }
}

impl PostChanges {
    /// Drop every field whose value matches the stored document, leaving
    /// only updates that would actually change something.
    pub fn diff(self, post: &Post) -> PostChanges {
        PostChanges {
            title: self.title.filter(|v| *v != post.title),
            description: self.description.filter(|v| *v != post.description),
            location: self.location.filter(|v| *v != post.location),
            category: self.category.filter(|v| *v != post.category),
            thumbnail: self.thumbnail.filter(|v| *v != post.thumbnail),
            date: self.date.filter(|v| Some(*v) != post.date),
            post_type: self.post_type.filter(|v| *v != post.post_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.thumbnail.is_none()
            && self.date.is_none()
            && self.post_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreatePostRequest {
        CreatePostRequest {
            title: Some("  Lost keys  ".to_string()),
            description: Some("Set of house keys".to_string()),
            location: Some(" Central Park ".to_string()),
            category: Some("Electronics".to_string()),
            thumbnail: Some("https://img.example.com/keys.png".to_string()),
            post_type: Some("Lost".to_string()),
            ..Default::default()
        }
    }

    fn stored_post() -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Lost keys".to_string(),
            description: "Set of house keys".to_string(),
            location: "Central Park".to_string(),
            category: "electronics".to_string(),
            thumbnail: "https://img.example.com/keys.png".to_string(),
            post_type: POST_TYPE_LOST.to_string(),
            date: None,
            status: None,
            email: "a@x.com".to_string(),
            name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_normalizes_text_and_category() {
        let new_post = valid_create().into_new_post("a@x.com").unwrap();
        assert_eq!(new_post.title, "Lost keys");
        assert_eq!(new_post.location, "Central Park");
        assert_eq!(new_post.category, "electronics");
        assert_eq!(new_post.email, "a@x.com");
    }

    #[test]
    fn create_ignores_body_email_for_storage() {
        let mut request = valid_create();
        request.email = Some("a@x.com".to_string());
        let new_post = request.into_new_post("owner@x.com").unwrap();
        assert_eq!(new_post.email, "owner@x.com");
    }

    #[test]
    fn create_reports_all_missing_fields_together() {
        let request = CreatePostRequest {
            title: Some("Keys".to_string()),
            description: Some("   ".to_string()),
            ..Default::default()
        };
        let err = request.into_new_post("a@x.com").unwrap_err();
        assert_eq!(err.status_code(), 400);
        match err {
            ApiError::ValidationError { errors, .. } => {
                assert_eq!(errors.len(), 5);
                assert!(errors.iter().any(|e| e.contains("description")));
                assert!(errors.iter().any(|e| e.contains("postType")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_rejects_unknown_post_type() {
        let mut request = valid_create();
        request.post_type = Some("Misplaced".to_string());
        let err = request.into_new_post("a@x.com").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("postType"));
    }

    #[test]
    fn update_with_no_whitelisted_keys_is_rejected() {
        // A body like {"owner":"x"} deserializes to an empty update
        let request: UpdatePostRequest = serde_json::from_str(r#"{"owner":"x"}"#).unwrap();
        let err = request.normalize().unwrap_err();
        assert_eq!(err.message(), "No valid updates provided");
    }

    #[test]
    fn update_rejects_blank_title_and_description() {
        let request = UpdatePostRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.normalize().unwrap_err().message(), "Title cannot be empty");

        let request = UpdatePostRequest {
            description: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.normalize().unwrap_err().message(),
            "Description cannot be empty"
        );
    }

    #[test]
    fn update_lowercases_category() {
        let request = UpdatePostRequest {
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        let changes = request.normalize().unwrap();
        assert_eq!(changes.category.as_deref(), Some("electronics"));
    }

    #[test]
    fn diff_drops_fields_equal_to_stored_values() {
        let post = stored_post();

        // Whitespace-padded title normalizes to the stored value: no change
        let request = UpdatePostRequest {
            title: Some("  Lost keys  ".to_string()),
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        let changes = request.normalize().unwrap().diff(&post);
        assert!(changes.is_empty());

        let request = UpdatePostRequest {
            title: Some("Found keys".to_string()),
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        let changes = request.normalize().unwrap().diff(&post);
        assert_eq!(changes.title.as_deref(), Some("Found keys"));
        assert!(changes.category.is_none());
    }

    #[test]
    fn post_serializes_with_contractual_field_names() {
        let value = serde_json::to_value(stored_post()).unwrap();
        assert!(value.get("postType").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value["status"].is_null());
        assert!(value.get("post_type").is_none());
    }
}
