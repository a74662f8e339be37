use serde::{Deserialize, Serialize};

/// The like state of a single user on a target.
///
/// Serialized as `1` (liked), `-1` (disliked) or `0` (unknown).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum UserLikeStatus {
    Liked,
    Disliked,
    Unknown,
}

impl UserLikeStatus {
    /// Derives the status from the user's average like rating.
    pub fn from_average(average: f64) -> Self {
        if average > 0.0 {
            UserLikeStatus::Liked
        } else if average < 0.0 {
            UserLikeStatus::Disliked
        } else {
            UserLikeStatus::Unknown
        }
    }
}

impl From<UserLikeStatus> for i8 {
    fn from(status: UserLikeStatus) -> Self {
        match status {
            UserLikeStatus::Liked => 1,
            UserLikeStatus::Disliked => -1,
            UserLikeStatus::Unknown => 0,
        }
    }
}

impl TryFrom<i8> for UserLikeStatus {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UserLikeStatus::Liked),
            -1 => Ok(UserLikeStatus::Disliked),
            0 => Ok(UserLikeStatus::Unknown),
            other => Err(format!("invalid like status: {other}")),
        }
    }
}

/// Like and dislike counts of a target, optionally with one user's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub activity_object: String,
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub username: Option<String>,
    pub user_like_status: UserLikeStatus,
}

impl LikeStatus {
    pub fn new(activity_object: impl Into<String>, likes_count: u64, dislikes_count: u64) -> Self {
        Self {
            activity_object: activity_object.into(),
            likes_count,
            dislikes_count,
            username: None,
            user_like_status: UserLikeStatus::Unknown,
        }
    }

    pub fn for_user(
        activity_object: impl Into<String>,
        likes_count: u64,
        dislikes_count: u64,
        username: impl Into<String>,
        user_like_status: UserLikeStatus,
    ) -> Self {
        Self {
            username: Some(username.into()),
            user_like_status,
            ..Self::new(activity_object, likes_count, dislikes_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_average() {
        assert_eq!(UserLikeStatus::from_average(1.0), UserLikeStatus::Liked);
        assert_eq!(UserLikeStatus::from_average(0.5), UserLikeStatus::Liked);
        assert_eq!(UserLikeStatus::from_average(-1.0), UserLikeStatus::Disliked);
        assert_eq!(UserLikeStatus::from_average(0.0), UserLikeStatus::Unknown);
    }

    #[test]
    fn test_like_status_serialization() {
        let status = LikeStatus::for_user("doc:default:1", 2, 1, "robin", UserLikeStatus::Disliked);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "activityObject": "doc:default:1",
                "likesCount": 2,
                "dislikesCount": 1,
                "username": "robin",
                "userLikeStatus": -1
            })
        );
    }

    #[test]
    fn test_user_like_status_rejects_unknown_code() {
        let parsed: Result<UserLikeStatus, _> = serde_json::from_str("2");
        assert!(parsed.is_err());
        let parsed: UserLikeStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, UserLikeStatus::Liked);
    }
}
