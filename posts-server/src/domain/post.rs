use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::error::{DomainError, FieldErrors};

const TEXT_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Like {
    pub(crate) id: Uuid,
    pub(crate) user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Comment {
    pub(crate) id: Uuid,
    pub(crate) text: String,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) user: Uuid,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) text: String,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) user: Uuid,
    pub(crate) likes: Vec<Like>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) date: DateTime<Utc>,
}

impl Post {
    pub(crate) fn new(id: Uuid, input: ValidPostInput, user: Uuid, date: DateTime<Utc>) -> Self {
        Self {
            id,
            text: input.text,
            name: input.name,
            avatar: input.avatar,
            user,
            likes: Vec::new(),
            comments: Vec::new(),
            date,
        }
    }

    pub(crate) fn is_owned_by(&self, user: Uuid) -> bool {
        self.user == user
    }

    pub(crate) fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Prepends a like for `user`; a user may like a post once.
    pub(crate) fn like(&mut self, user: Uuid) -> Result<(), DomainError> {
        if self.is_liked_by(user) {
            return Err(DomainError::AlreadyLiked);
        }
        self.likes.insert(
            0,
            Like {
                id: Uuid::new_v4(),
                user,
            },
        );
        Ok(())
    }

    pub(crate) fn unlike(&mut self, user: Uuid) -> Result<(), DomainError> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user)
            .ok_or(DomainError::NotLiked)?;
        self.likes.remove(index);
        Ok(())
    }

    /// Prepends a comment and returns its id.
    pub(crate) fn add_comment(
        &mut self,
        input: ValidPostInput,
        user: Uuid,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.comments.insert(
            0,
            Comment {
                id,
                text: input.text,
                name: input.name,
                avatar: input.avatar,
                user,
                created_at,
            },
        );
        id
    }

    pub(crate) fn remove_comment(&mut self, comment_id: Uuid) -> Result<Comment, DomainError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or(DomainError::CommentNotExists)?;
        Ok(self.comments.remove(index))
    }
}

/// Body accepted by create-post and add-comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub(crate) struct PostInput {
    #[validate(
        required(message = "Text field is required"),
        custom(function = "validate_text")
    )]
    pub(crate) text: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
}

/// Input that passed [`PostInput::checked`], with `text` trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidPostInput {
    text: String,
    name: Option<String>,
    avatar: Option<String>,
}

/// Outcome of [`validate_post_input`]; `errors` is empty iff `is_valid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostInputValidation {
    pub(crate) errors: FieldErrors,
    pub(crate) is_valid: bool,
}

pub(crate) fn validate_post_input(input: &PostInput) -> PostInputValidation {
    match input.validate() {
        Ok(()) => PostInputValidation {
            errors: FieldErrors::new(),
            is_valid: true,
        },
        Err(errors) => PostInputValidation {
            errors: first_messages(&errors),
            is_valid: false,
        },
    }
}

impl PostInput {
    pub(crate) fn checked(self) -> Result<ValidPostInput, DomainError> {
        let outcome = validate_post_input(&self);
        if !outcome.is_valid {
            return Err(DomainError::Validation(outcome.errors));
        }
        Ok(ValidPostInput {
            text: self
                .text
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
            name: self.name,
            avatar: self.avatar,
        })
    }
}

fn validate_text(text: &str) -> Result<(), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Text field is required")));
    }

    if text.chars().count() > TEXT_MAX_CHARS {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Post must be at most 300 characters")));
    }
    Ok(())
}

fn first_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}
