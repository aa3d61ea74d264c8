//! Vote directions, targets, records, and request validation.
//!
//! A vote belongs to exactly one user and exactly one target (a discussion or
//! a comment). Its `value` mirrors the direction (+1 / -1) so scores can be
//! summed without looking at `vote_type`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const VOTE_TYPE_UPVOTE: &str = "upvote";
pub const VOTE_TYPE_DOWNVOTE: &str = "downvote";

/// All valid vote type values.
pub const VALID_VOTE_TYPES: &[&str] = &[VOTE_TYPE_UPVOTE, VOTE_TYPE_DOWNVOTE];

pub const TARGET_TYPE_DISCUSSION: &str = "discussion";
pub const TARGET_TYPE_COMMENT: &str = "comment";

/// All valid target type values.
pub const VALID_TARGET_TYPES: &[&str] = &[TARGET_TYPE_DISCUSSION, TARGET_TYPE_COMMENT];

/* --------------------------------------------------------------------------
Vote direction
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    /// Signed value stored alongside the vote.
    pub fn value(self) -> i16 {
        match self {
            VoteType::Upvote => 1,
            VoteType::Downvote => -1,
        }
    }

    pub fn opposite(self) -> VoteType {
        match self {
            VoteType::Upvote => VoteType::Downvote,
            VoteType::Downvote => VoteType::Upvote,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Upvote => VOTE_TYPE_UPVOTE,
            VoteType::Downvote => VOTE_TYPE_DOWNVOTE,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VOTE_TYPE_UPVOTE => Ok(VoteType::Upvote),
            VOTE_TYPE_DOWNVOTE => Ok(VoteType::Downvote),
            other => Err(CoreError::Validation(format!(
                "Invalid vote type '{other}'. Must be one of: {}",
                VALID_VOTE_TYPES.join(", ")
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Vote target
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Discussion,
    Comment,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Discussion => TARGET_TYPE_DISCUSSION,
            TargetType::Comment => TARGET_TYPE_COMMENT,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TARGET_TYPE_DISCUSSION => Ok(TargetType::Discussion),
            TARGET_TYPE_COMMENT => Ok(TargetType::Comment),
            other => Err(CoreError::Validation(format!(
                "Invalid target type '{other}'. Must be one of: {}",
                VALID_TARGET_TYPES.join(", ")
            ))),
        }
    }
}

/// The entity a vote applies to. Exactly one kind of id is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Discussion(DbId),
    Comment(DbId),
}

impl VoteTarget {
    pub fn new(kind: TargetType, id: DbId) -> Self {
        match kind {
            TargetType::Discussion => VoteTarget::Discussion(id),
            TargetType::Comment => VoteTarget::Comment(id),
        }
    }

    pub fn kind(self) -> TargetType {
        match self {
            VoteTarget::Discussion(_) => TargetType::Discussion,
            VoteTarget::Comment(_) => TargetType::Comment,
        }
    }

    pub fn id(self) -> DbId {
        match self {
            VoteTarget::Discussion(id) | VoteTarget::Comment(id) => id,
        }
    }

    pub fn discussion_id(self) -> Option<DbId> {
        match self {
            VoteTarget::Discussion(id) => Some(id),
            VoteTarget::Comment(_) => None,
        }
    }

    pub fn comment_id(self) -> Option<DbId> {
        match self {
            VoteTarget::Comment(id) => Some(id),
            VoteTarget::Discussion(_) => None,
        }
    }

    /// Rebuild a target from the two nullable columns of a vote row.
    ///
    /// Rejects rows where both or neither column is set.
    pub fn from_columns(
        discussion_id: Option<DbId>,
        comment_id: Option<DbId>,
    ) -> Result<Self, CoreError> {
        match (discussion_id, comment_id) {
            (Some(id), None) => Ok(VoteTarget::Discussion(id)),
            (None, Some(id)) => Ok(VoteTarget::Comment(id)),
            (Some(_), Some(_)) => Err(CoreError::Internal(
                "Vote row references both a discussion and a comment".to_string(),
            )),
            (None, None) => Err(CoreError::Internal(
                "Vote row references neither a discussion nor a comment".to_string(),
            )),
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// A persisted vote ("interaction").
#[derive(Debug, Clone, PartialEq)]
pub struct VoteRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub target: VoteTarget,
    pub vote_type: VoteType,
    pub value: i16,
    pub created_at: Timestamp,
}

/// A vote about to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewVote {
    pub user_id: DbId,
    pub target: VoteTarget,
    pub vote_type: VoteType,
}

impl NewVote {
    pub fn value(&self) -> i16 {
        self.vote_type.value()
    }
}

/// What [`crate::reconciler::apply_vote`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    /// The same direction was already held and has been removed.
    Removed,
    /// No vote was held; a new one was created.
    Added,
    /// The opposite direction was held and has been replaced.
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub vote_type: VoteType,
}

/* --------------------------------------------------------------------------
Tally
-------------------------------------------------------------------------- */

/// Aggregated votes for one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

impl VoteTally {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self {
            upvotes,
            downvotes,
            score: upvotes - downvotes,
        }
    }
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Parse a target id, rejecting missing or blank values.
pub fn validate_target_id(target_id: Option<&str>) -> Result<DbId, CoreError> {
    let raw = target_id.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(CoreError::Validation("targetId is required".to_string()));
    }
    raw.parse::<DbId>()
        .map_err(|_| CoreError::Validation(format!("Invalid targetId '{raw}'")))
}

/// Parse a target type, rejecting missing values and unknown kinds.
pub fn validate_target_type(target_type: Option<&str>) -> Result<TargetType, CoreError> {
    match target_type.map(str::trim) {
        None | Some("") => Err(CoreError::Validation("targetType is required".to_string())),
        Some(raw) => raw.parse(),
    }
}

/// Parse a vote type, rejecting missing values and unknown directions.
pub fn validate_vote_type(vote_type: Option<&str>) -> Result<VoteType, CoreError> {
    match vote_type.map(str::trim) {
        None | Some("") => Err(CoreError::Validation("voteType is required".to_string())),
        Some(raw) => raw.parse(),
    }
}

/// Validate a full vote request before any storage is touched.
pub fn validate_vote_request(
    target_id: Option<&str>,
    target_type: Option<&str>,
    vote_type: Option<&str>,
) -> Result<(VoteTarget, VoteType), CoreError> {
    let id = validate_target_id(target_id)?;
    let kind = validate_target_type(target_type)?;
    let vote_type = validate_vote_type(vote_type)?;
    Ok((VoteTarget::new(kind, id), vote_type))
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_vote_values_and_opposites() {
        assert_eq!(VoteType::Upvote.value(), 1);
        assert_eq!(VoteType::Downvote.value(), -1);
        assert_eq!(VoteType::Upvote.opposite(), VoteType::Downvote);
        assert_eq!(VoteType::Downvote.opposite(), VoteType::Upvote);
    }

    #[test]
    fn test_vote_type_parses_known_values_only() {
        assert_eq!("upvote".parse::<VoteType>().unwrap(), VoteType::Upvote);
        assert_eq!("downvote".parse::<VoteType>().unwrap(), VoteType::Downvote);
        assert_matches!("sidevote".parse::<VoteType>(), Err(CoreError::Validation(_)));
        assert_matches!("Upvote".parse::<VoteType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_vote_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(VoteType::Downvote).unwrap(), "downvote");
        assert_eq!(serde_json::to_value(VoteAction::Changed).unwrap(), "changed");
    }

    #[test]
    fn test_target_exposes_exactly_one_column() {
        let id = Uuid::new_v4();
        let discussion = VoteTarget::new(TargetType::Discussion, id);
        assert_eq!(discussion.discussion_id(), Some(id));
        assert_eq!(discussion.comment_id(), None);

        let comment = VoteTarget::new(TargetType::Comment, id);
        assert_eq!(comment.discussion_id(), None);
        assert_eq!(comment.comment_id(), Some(id));
        assert_eq!(comment.kind(), TargetType::Comment);
    }

    #[test]
    fn test_target_from_columns_rejects_ambiguous_rows() {
        let id = Uuid::new_v4();
        assert_eq!(
            VoteTarget::from_columns(Some(id), None).unwrap(),
            VoteTarget::Discussion(id)
        );
        assert_matches!(
            VoteTarget::from_columns(Some(id), Some(id)),
            Err(CoreError::Internal(_))
        );
        assert_matches!(VoteTarget::from_columns(None, None), Err(CoreError::Internal(_)));
    }

    #[test]
    fn test_validate_request_accepts_well_formed_input() {
        let id = Uuid::new_v4();
        let raw = id.to_string();
        let (target, vote_type) =
            validate_vote_request(Some(&raw), Some("comment"), Some("downvote")).unwrap();
        assert_eq!(target, VoteTarget::Comment(id));
        assert_eq!(vote_type, VoteType::Downvote);
    }

    #[test]
    fn test_validate_request_rejects_missing_fields() {
        let raw = Uuid::new_v4().to_string();
        assert_matches!(
            validate_vote_request(None, Some("comment"), Some("upvote")),
            Err(CoreError::Validation(msg)) if msg.contains("targetId")
        );
        assert_matches!(
            validate_vote_request(Some("  "), Some("comment"), Some("upvote")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_vote_request(Some(&raw), None, Some("upvote")),
            Err(CoreError::Validation(msg)) if msg.contains("targetType")
        );
        assert_matches!(
            validate_vote_request(Some(&raw), Some("discussion"), Some("")),
            Err(CoreError::Validation(msg)) if msg.contains("voteType")
        );
    }

    #[test]
    fn test_validate_request_rejects_unknown_enumerations() {
        let raw = Uuid::new_v4().to_string();
        assert_matches!(
            validate_vote_request(Some(&raw), Some("event"), Some("upvote")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_vote_request(Some("not-a-uuid"), Some("comment"), Some("upvote")),
            Err(CoreError::Validation(_))
        );
    }
}
