//! Like/dislike façade over the rating service.
//!
//! A like is a rating of `1` and a dislike a rating of `-1` on the `like` aspect.
//! At most one of them is active per user and target.
use std::sync::Arc;

use rating_ledger_shared::types::{
    DISLIKE_RATING, LIKE_ASPECT, LIKE_RATING, LikeStatus, RankedEntry, UserLikeStatus,
};
use tracing::instrument;

use crate::config::RankingConfig;
use crate::errors::RatingError;
use crate::ranking::{MostLikedRanker, MostLikedRequest};
use crate::rating::RatingService;

pub struct LikeService {
    ratings: Arc<RatingService>,
    ranker: MostLikedRanker,
}

impl LikeService {
    pub fn new(ratings: Arc<RatingService>) -> Self {
        Self::with_ranking_config(ratings, RankingConfig::default())
    }

    pub fn with_ranking_config(ratings: Arc<RatingService>, config: RankingConfig) -> Self {
        let ranker = MostLikedRanker::with_config(ratings.ledger().clone(), config);
        Self { ratings, ranker }
    }

    /// Likes `target` on behalf of `actor`, replacing any previous like or dislike.
    ///
    /// The cancellation and the new rating are two separate ledger writes; the
    /// de-duplication pass removes what concurrent calls may leave behind.
    ///
    /// # Returns
    ///
    /// The id of the new primary like event.
    #[instrument(skip_all, fields(actor = %actor, target = %target))]
    pub async fn like(&self, actor: &str, target: &str) -> Result<i64, RatingError> {
        self.replace(actor, target, LIKE_RATING).await
    }

    /// Dislikes `target` on behalf of `actor`, replacing any previous like or dislike.
    #[instrument(skip_all, fields(actor = %actor, target = %target))]
    pub async fn dislike(&self, actor: &str, target: &str) -> Result<i64, RatingError> {
        self.replace(actor, target, DISLIKE_RATING).await
    }

    /// Removes the like or dislike of `actor` on `target`, companions included.
    pub async fn cancel(&self, actor: &str, target: &str) -> Result<u64, RatingError> {
        self.ratings.cancel_rate(actor, target, LIKE_ASPECT).await
    }

    async fn replace(&self, actor: &str, target: &str, rating: i64) -> Result<i64, RatingError> {
        self.ratings.cancel_rate(actor, target, LIKE_ASPECT).await?;
        self.ratings.rate(actor, rating, target, LIKE_ASPECT).await
    }

    pub async fn has_user_liked(&self, actor: &str, target: &str) -> Result<bool, RatingError> {
        Ok(self.user_status(actor, target).await? == UserLikeStatus::Liked)
    }

    pub async fn has_user_disliked(&self, actor: &str, target: &str) -> Result<bool, RatingError> {
        Ok(self.user_status(actor, target).await? == UserLikeStatus::Disliked)
    }

    pub async fn get_likes_count(&self, target: &str) -> Result<u64, RatingError> {
        self.ratings
            .get_rates_count_with_value(target, LIKE_RATING, LIKE_ASPECT)
            .await
    }

    pub async fn get_dislikes_count(&self, target: &str) -> Result<u64, RatingError> {
        self.ratings
            .get_rates_count_with_value(target, DISLIKE_RATING, LIKE_ASPECT)
            .await
    }

    pub async fn get_like_status(&self, target: &str) -> Result<LikeStatus, RatingError> {
        Ok(LikeStatus::new(
            target,
            self.get_likes_count(target).await?,
            self.get_dislikes_count(target).await?,
        ))
    }

    /// Like and dislike counts of `target` together with the state of `actor`.
    pub async fn get_like_status_for_user(
        &self,
        actor: &str,
        target: &str,
    ) -> Result<LikeStatus, RatingError> {
        Ok(LikeStatus::for_user(
            target,
            self.get_likes_count(target).await?,
            self.get_dislikes_count(target).await?,
            actor,
            self.user_status(actor, target).await?,
        ))
    }

    /// Ranks the documents and posts of a container by like count.
    ///
    /// See [`MostLikedRanker::most_liked`].
    pub async fn get_most_liked(
        &self,
        request: &MostLikedRequest,
    ) -> Result<Vec<RankedEntry>, RatingError> {
        self.ranker.most_liked(request).await
    }

    /// Sign of the user's average like rating on the target.
    async fn user_status(&self, actor: &str, target: &str) -> Result<UserLikeStatus, RatingError> {
        let average = self
            .ratings
            .get_average_rating_for_user(actor, target, LIKE_ASPECT)
            .await?;
        Ok(UserLikeStatus::from_average(average))
    }
}
