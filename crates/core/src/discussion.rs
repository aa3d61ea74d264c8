//! Discussion and comment constants and validation functions.
//!
//! Used by the API layer before anything is written to the database.

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a discussion title.
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum length for a discussion body.
pub const MAX_BODY_LENGTH: usize = 40_000;

/// Maximum length for a comment.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate a discussion title: non-blank and within [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Discussion title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Discussion title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional discussion body.
pub fn validate_body(body: &Option<String>) -> Result<(), CoreError> {
    if let Some(b) = body {
        if b.chars().count() > MAX_BODY_LENGTH {
            return Err(CoreError::Validation(format!(
                "Discussion body exceeds maximum length of {MAX_BODY_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate comment content: non-blank and within [`MAX_COMMENT_LENGTH`].
pub fn validate_comment_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A reply must stay inside the discussion of the comment it replies to.
pub fn validate_reply_parent(
    discussion_id: DbId,
    parent_discussion_id: DbId,
) -> Result<(), CoreError> {
    if discussion_id != parent_discussion_id {
        return Err(CoreError::Validation(
            "Parent comment belongs to a different discussion".to_string(),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
