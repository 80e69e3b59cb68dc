use db::{types::DbId, Store};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::error::FormErrors;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_GROUP: &str = "Select a valid choice. That choice is not one of the available choices.";
pub const IMAGE_MAX_LENGTH: usize = 100;

#[serde_as]
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    /// Group id, empty for "no group"
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub group: Option<String>,
    /// Path of an already stored image
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub text: String,
    pub group_id: Option<DbId>,
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl PostForm {
    pub async fn validate(self, store: &dyn Store) -> anyhow::Result<Result<ValidPost, FormErrors>> {
        let mut errors = FormErrors::default();

        let text = self.text.trim().to_string();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group_id = match self.group.map(|group| group.trim().to_string()) {
            Some(group) if !group.is_empty() => {
                let id = DbId::from(group);
                if store.group_by_id(&id).await?.is_none() {
                    errors.add("group", INVALID_GROUP);
                }
                Some(id)
            }
            _ => None,
        };

        if let Some(image) = &self.image {
            if image.chars().count() > IMAGE_MAX_LENGTH {
                errors.add(
                    "image",
                    format!("Ensure this filename has at most {IMAGE_MAX_LENGTH} characters."),
                );
            }
        }

        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        Ok(Ok(ValidPost {
            text,
            group_id,
            image: self.image,
        }))
    }
}

impl CommentForm {
    pub fn validate(self) -> Result<String, FormErrors> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            let mut errors = FormErrors::default();
            errors.add("text", REQUIRED);
            return Err(errors);
        }
        Ok(text)
    }
}
