//! End-to-end scenarios of the rating engine over the in-memory ledger and
//! containment tree.
//!
//! Run with: `cargo test --test rating_scenarios`

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rating_ledger_engine::{
    LikeService, MostLikedRequest, QueryParameters, QueryType, RatingService, RollupPropagator,
};
use rating_ledger_repository::{EventLedger, InMemoryContainment, InMemoryLedger};
use rating_ledger_shared::types::{
    DateWindow, LIKE_ASPECT, NewEvent, QueryOptions, TargetKind, UserLikeStatus, activity_object,
};

const DOMAIN: &str = "doc:default:domain";
const WORKSPACES: &str = "doc:default:workspaces";
const FOLDER: &str = "doc:default:folder";
const LOVELY_DOC: &str = "doc:default:lovely";

struct Fixture {
    ledger: Arc<InMemoryLedger>,
    ratings: Arc<RatingService>,
    likes: LikeService,
}

/// Documents live in a plain folder inside the `workspaces` rollup container,
/// itself inside the `domain` rollup container.
fn fixture(documents: &[&str]) -> Fixture {
    let containment = documents.iter().fold(
        InMemoryContainment::new()
            .container(DOMAIN, None, true)
            .container(WORKSPACES, Some(DOMAIN), true)
            .container(FOLDER, Some(WORKSPACES), false),
        |tree, document| tree.item(*document, FOLDER),
    );

    let ledger = Arc::new(InMemoryLedger::new());
    let rollup = RollupPropagator::new(ledger.clone(), Arc::new(containment));
    let ratings = Arc::new(RatingService::with_rollup(ledger.clone(), rollup));
    let likes = LikeService::new(ratings.clone());

    Fixture {
        ledger,
        ratings,
        likes,
    }
}

fn document(n: usize) -> String {
    format!("doc:default:doc{n}")
}

async fn likes_in_context(fixture: &Fixture, context: &str) -> usize {
    let params = QueryParameters::new().context(context).aspect(LIKE_ASPECT).rating(1);
    fixture
        .ratings
        .execute(QueryType::RatedChildrenForContext, &params, &QueryOptions::default())
        .await
        .unwrap()
        .len()
}

async fn like_at(fixture: &Fixture, actor: &str, target: &str, at: DateTime<Utc>) {
    fixture
        .ratings
        .record(NewEvent::rating(actor, LIKE_ASPECT, target, 1).published_at(at))
        .await
        .unwrap();
}

async fn post_in(fixture: &Fixture, scope: &str) -> String {
    let id = fixture
        .ledger
        .append(&NewEvent::new("lily", "minimessage", "Hello").with_context(scope))
        .await
        .unwrap();
    activity_object(id)
}

// ============================================================================
// Rating Aggregation
// ============================================================================

#[tokio::test]
async fn test_count_equals_sum_of_counts_per_value() {
    let fixture = fixture(&[LOVELY_DOC]);
    for (actor, stars) in [("robin", 5), ("ted", 2), ("barney", 5), ("lily", 1)] {
        fixture.ratings.rate(actor, stars, LOVELY_DOC, "stars").await.unwrap();
    }

    let total = fixture.ratings.get_rates_count(LOVELY_DOC, "stars").await.unwrap();
    let mut per_value = 0;
    for value in 1..=5 {
        per_value += fixture
            .ratings
            .get_rates_count_with_value(LOVELY_DOC, value, "stars")
            .await
            .unwrap();
    }

    assert_eq!(total, 4);
    assert_eq!(per_value, total);
}

#[tokio::test]
async fn test_average_of_stars() {
    let fixture = fixture(&[LOVELY_DOC]);
    for (actor, stars) in [("robin", 5), ("ted", 2), ("barney", 3)] {
        fixture.ratings.rate(actor, stars, LOVELY_DOC, "stars").await.unwrap();
    }

    let average = fixture.ratings.get_average_rating(LOVELY_DOC, "stars").await.unwrap();
    assert!((average - 10.0 / 3.0).abs() < 1e-9);

    let average = fixture
        .ratings
        .get_average_rating_for_user("ted", LOVELY_DOC, "stars")
        .await
        .unwrap();
    assert_eq!(average, 2.0);
}

#[tokio::test]
async fn test_companions_never_double_count() {
    let fixture = fixture(&[LOVELY_DOC]);
    fixture.likes.like("robin", LOVELY_DOC).await.unwrap();

    assert_eq!(fixture.ledger.events().await.len(), 3);
    assert_eq!(fixture.likes.get_likes_count(LOVELY_DOC).await.unwrap(), 1);
    assert_eq!(
        fixture.ratings.get_rates_count_for_user("robin", LOVELY_DOC, LIKE_ASPECT).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_deleting_a_document_drops_its_ratings() {
    let fixture = fixture(&[LOVELY_DOC]);
    fixture.likes.like("robin", LOVELY_DOC).await.unwrap();
    fixture.ratings.rate("ted", 4, LOVELY_DOC, "stars").await.unwrap();

    fixture.ratings.cancel_rates(LOVELY_DOC, None).await.unwrap();

    assert_eq!(fixture.ratings.get_rates_count(LOVELY_DOC, LIKE_ASPECT).await.unwrap(), 0);
    assert_eq!(fixture.ratings.get_rates_count(LOVELY_DOC, "stars").await.unwrap(), 0);
    assert_eq!(likes_in_context(&fixture, WORKSPACES).await, 0);
    assert!(fixture.ledger.events().await.is_empty());
}

#[tokio::test]
async fn test_latest_rated_documents_newest_first() {
    let fixture = fixture(&[]);
    let now = Utc::now();
    like_at(&fixture, "robin", &document(1), now - Duration::days(2)).await;
    like_at(&fixture, "robin", &document(2), now).await;
    like_at(&fixture, "robin", &document(3), now - Duration::days(1)).await;
    like_at(&fixture, "robin", "activity:12", now).await;
    like_at(&fixture, "ted", &document(4), now).await;

    let latest = fixture
        .ratings
        .get_latest_rated_by_user("robin", LIKE_ASPECT, 2)
        .await
        .unwrap();

    assert_eq!(latest, vec![document(2), document(3)]);
}

// ============================================================================
// Like/Dislike Façade
// ============================================================================

#[tokio::test]
async fn test_three_users_like_a_document() {
    let fixture = fixture(&[LOVELY_DOC]);
    for actor in ["bender", "leela", "fry"] {
        fixture.likes.like(actor, LOVELY_DOC).await.unwrap();
    }

    assert_eq!(fixture.likes.get_likes_count(LOVELY_DOC).await.unwrap(), 3);
    assert_eq!(fixture.likes.get_dislikes_count(LOVELY_DOC).await.unwrap(), 0);
    assert!(fixture.likes.has_user_liked("leela", LOVELY_DOC).await.unwrap());

    let status = fixture.likes.get_like_status(LOVELY_DOC).await.unwrap();
    assert_eq!(status.user_like_status, UserLikeStatus::Unknown);
    assert_eq!(status.username, None);
}

#[tokio::test]
async fn test_like_then_dislike_leaves_one_dislike() {
    let fixture = fixture(&[LOVELY_DOC]);
    fixture.likes.like("robin", LOVELY_DOC).await.unwrap();
    fixture.likes.dislike("robin", LOVELY_DOC).await.unwrap();

    let params = QueryParameters::new()
        .actor("robin")
        .target(LOVELY_DOC)
        .aspect(LIKE_ASPECT);
    let active = fixture
        .ratings
        .execute(QueryType::ActorRatingsForObject, &params, &QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].value, "-1");
    assert_eq!(likes_in_context(&fixture, WORKSPACES).await, 0);
}

#[tokio::test]
async fn test_cancel_twice_is_idempotent() {
    let fixture = fixture(&[LOVELY_DOC]);
    fixture.likes.like("robin", LOVELY_DOC).await.unwrap();

    assert_eq!(fixture.likes.cancel("robin", LOVELY_DOC).await.unwrap(), 3);
    assert_eq!(fixture.likes.cancel("robin", LOVELY_DOC).await.unwrap(), 0);
    assert!(fixture.ledger.events().await.is_empty());
}

// ============================================================================
// Container Rollup
// ============================================================================

#[tokio::test]
async fn test_rollup_counts_per_container() {
    let fixture = fixture(&[LOVELY_DOC]);
    fixture.likes.like("robin", LOVELY_DOC).await.unwrap();
    fixture.likes.like("barney", LOVELY_DOC).await.unwrap();
    fixture.likes.dislike("ted", LOVELY_DOC).await.unwrap();

    assert_eq!(likes_in_context(&fixture, FOLDER).await, 0);
    assert_eq!(likes_in_context(&fixture, WORKSPACES).await, 2);
    assert_eq!(likes_in_context(&fixture, DOMAIN).await, 2);

    fixture.likes.cancel("robin", LOVELY_DOC).await.unwrap();

    assert_eq!(likes_in_context(&fixture, WORKSPACES).await, 1);
    assert_eq!(likes_in_context(&fixture, DOMAIN).await, 1);
}

#[tokio::test]
async fn test_rated_children_of_a_container() {
    let documents: Vec<String> = (1..=2).map(document).collect();
    let fixture = fixture(&documents.iter().map(String::as_str).collect::<Vec<_>>());
    fixture.likes.like("robin", &documents[0]).await.unwrap();
    fixture.likes.like("robin", &documents[1]).await.unwrap();
    fixture.likes.like("ted", &documents[1]).await.unwrap();

    let children = fixture
        .ratings
        .get_rated_children(WORKSPACES, 1, LIKE_ASPECT)
        .await
        .unwrap();

    let scores: Vec<_> = children.iter().map(|c| (c.target.clone(), c.score)).collect();
    assert_eq!(scores, vec![(documents[1].clone(), 2), (documents[0].clone(), 1)]);
    assert!(fixture
        .ratings
        .get_rated_children(FOLDER, 1, LIKE_ASPECT)
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Most-Liked Ranking
// ============================================================================

#[tokio::test]
async fn test_most_liked_documents() {
    let documents: Vec<String> = (1..=4).map(document).collect();
    let fixture = fixture(&documents.iter().map(String::as_str).collect::<Vec<_>>());
    let actors = ["robin", "ted", "barney", "lily"];
    for (document, count) in documents.iter().zip([1, 1, 3, 4]) {
        for actor in &actors[..count] {
            fixture.likes.like(actor, document).await.unwrap();
        }
    }

    let request = MostLikedRequest::new(WORKSPACES, 10).for_caller("barney");
    let ranking = fixture.likes.get_most_liked(&request).await.unwrap();

    let scores: Vec<_> = ranking.iter().map(|entry| entry.score).collect();
    assert_eq!(scores, vec![4, 3, 1, 1]);
    assert_eq!(ranking[0].target, documents[3]);
    assert_eq!(ranking[1].target, documents[2]);
    assert_eq!(ranking[2].target, documents[0]);
    assert!(ranking[0].caller_has_rated && ranking[1].caller_has_rated);
    assert!(!ranking[2].caller_has_rated && !ranking[3].caller_has_rated);
}

#[tokio::test]
async fn test_most_liked_merges_documents_and_posts() {
    let fixture = fixture(&[LOVELY_DOC]);
    let first = post_in(&fixture, WORKSPACES).await;
    let second = post_in(&fixture, WORKSPACES).await;
    let third = post_in(&fixture, WORKSPACES).await;

    for actor in ["robin", "ted", "barney", "lily"] {
        fixture.likes.like(actor, &first).await.unwrap();
    }
    for actor in ["robin", "ted", "barney"] {
        fixture.likes.like(actor, LOVELY_DOC).await.unwrap();
    }
    for actor in ["robin", "ted"] {
        fixture.likes.like(actor, &second).await.unwrap();
    }
    fixture.likes.like("robin", &third).await.unwrap();

    let ranking = fixture
        .likes
        .get_most_liked(&MostLikedRequest::new(WORKSPACES, 3))
        .await
        .unwrap();

    let entries: Vec<_> = ranking
        .iter()
        .map(|entry| (entry.target.as_str(), entry.kind, entry.score))
        .collect();
    assert_eq!(
        entries,
        vec![
            (first.as_str(), TargetKind::Post, 4),
            (LOVELY_DOC, TargetKind::Document, 3),
            (second.as_str(), TargetKind::Post, 2),
        ]
    );
}

#[tokio::test]
async fn test_most_liked_within_date_window() {
    let documents: Vec<String> = (1..=3).map(document).collect();
    let fixture = fixture(&documents.iter().map(String::as_str).collect::<Vec<_>>());
    let now = Utc::now();
    let yesterday = now - Duration::days(1);
    let tomorrow = now + Duration::days(1);

    like_at(&fixture, "robin", &documents[0], yesterday).await;
    like_at(&fixture, "ted", &documents[0], yesterday).await;
    like_at(&fixture, "robin", &documents[1], now).await;
    like_at(&fixture, "robin", &documents[2], tomorrow).await;

    let around = |day: DateTime<Utc>| DateWindow::new(day - Duration::hours(6), day + Duration::hours(6));

    let ranking = fixture
        .likes
        .get_most_liked(&MostLikedRequest::new(WORKSPACES, 10).within(around(yesterday)))
        .await
        .unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0].target, documents[0]);
    assert_eq!(ranking[0].score, 2);

    let ranking = fixture
        .likes
        .get_most_liked(&MostLikedRequest::new(WORKSPACES, 10).within(DateWindow::new(now, tomorrow)))
        .await
        .unwrap();
    let targets: Vec<_> = ranking.iter().map(|entry| entry.target.clone()).collect();
    assert_eq!(targets, vec![documents[1].clone(), documents[2].clone()]);

    let ranking = fixture
        .likes
        .get_most_liked(&MostLikedRequest::new(WORKSPACES, 10))
        .await
        .unwrap();
    assert_eq!(ranking.len(), 3);
}

// ============================================================================
// Removal of Activities
// ============================================================================

#[tokio::test]
async fn test_purging_a_post_and_its_replies() {
    let fixture = fixture(&[]);
    let post = post_in(&fixture, WORKSPACES).await;
    let reply = format!("{post}-reply-1");
    fixture.likes.like("robin", &post).await.unwrap();
    fixture.likes.like("ted", &reply).await.unwrap();

    let removed = fixture
        .ratings
        .purge_targets(&[post.clone(), reply.clone()])
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(fixture.likes.get_likes_count(&post).await.unwrap(), 0);
    assert_eq!(fixture.likes.get_likes_count(&reply).await.unwrap(), 0);
    assert!(fixture
        .likes
        .get_most_liked(&MostLikedRequest::new(WORKSPACES, 10))
        .await
        .unwrap()
        .is_empty());
}
