//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use reel_core::{
  Error as CoreError,
  aggregator::RatingAggregator,
  movie::NewMovie,
  rating::{RatingSummary, Score},
  store::MovieStore,
  user::{NewUser, User, UserUpdate},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn movie(s: &SqliteStore, title: &str) -> Uuid {
  s.add_movie(NewMovie::new(title)).await.unwrap().movie_id
}

async fn user(s: &SqliteStore, name: &str) -> User {
  s.add_user(NewUser {
    username:        name.into(),
    email:           format!("{name}@example.com"),
    password_hash:   "not-a-real-hash".into(),
    display_name:    None,
    favorite_genres: vec![],
  })
  .await
  .unwrap()
}

fn summary(aggregate_rating: f64, rating_count: u32) -> RatingSummary {
  RatingSummary { aggregate_rating, rating_count }
}

fn core_err(e: crate::Error) -> CoreError { e.into() }

// ─── Movies ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_movie_has_empty_rating_state() {
  let s = store().await;
  let id = movie(&s, "Alien").await;

  let m = s.get_movie(id).await.unwrap().unwrap();
  assert_eq!(m.title, "Alien");
  assert_eq!(m.aggregate_rating, 0.0);
  assert_eq!(m.rating_count, 0);
}

#[tokio::test]
async fn movie_fields_round_trip() {
  let s = store().await;
  let mut input = NewMovie::new("  Heat ");
  input.genres = vec!["Crime".into(), "Thriller".into()];
  input.release_year = Some(1995);
  input.cast = vec!["Al Pacino".into(), "Robert De Niro".into()];
  let created = s.add_movie(input).await.unwrap();

  let fetched = s.get_movie(created.movie_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Heat");
  assert_eq!(fetched.genres, vec!["Crime", "Thriller"]);
  assert_eq!(fetched.release_year, Some(1995));
  assert_eq!(fetched.cast.len(), 2);
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn list_movies_in_creation_order() {
  let s = store().await;
  movie(&s, "First").await;
  movie(&s, "Second").await;

  let all = s.list_movies().await.unwrap();
  let titles: Vec<_> = all.iter().map(|m| m.title.as_str()).collect();
  assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn get_movie_missing_returns_none() {
  let s = store().await;
  assert!(s.get_movie(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Rating aggregation ──────────────────────────────────────────────────────

#[tokio::test]
async fn aggregate_tracks_apply_replace_and_withdraw() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Arrival").await;
  let a = user(&s, "alice").await.user_id;
  let b = user(&s, "bob").await.user_id;

  let first = agg.apply_rating(m, a, 5, None).await.unwrap();
  assert!(first.created);
  assert_eq!(first.summary, summary(5.0, 1));

  let second = agg.apply_rating(m, b, 3, None).await.unwrap();
  assert_eq!(second.summary, summary(4.0, 2));

  // Re-rating replaces rather than adds.
  let replaced = agg.apply_rating(m, a, 1, None).await.unwrap();
  assert!(!replaced.created);
  assert_eq!(replaced.review.review_id, first.review.review_id);
  assert_eq!(replaced.summary, summary(2.0, 2));

  let after = agg.withdraw_rating(m, b).await.unwrap();
  assert_eq!(after, summary(1.0, 1));

  let stored = s.get_movie(m).await.unwrap().unwrap();
  assert_eq!(stored.rating_summary(), summary(1.0, 1));
}

#[tokio::test]
async fn aggregate_rounds_to_one_decimal() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Tenet").await;

  for (name, score) in [("u1", 4), ("u2", 4), ("u3", 5)] {
    let u = user(&s, name).await.user_id;
    agg.apply_rating(m, u, score, None).await.unwrap();
  }
  // 13 / 3 = 4.333...
  assert_eq!(s.get_movie(m).await.unwrap().unwrap().aggregate_rating, 4.3);
}

#[tokio::test]
async fn invalid_score_leaves_state_unchanged() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Dune").await;
  let a = user(&s, "alice").await.user_id;
  agg.apply_rating(m, a, 4, None).await.unwrap();

  for bad in [0, 6, -1] {
    let err = agg.apply_rating(m, a, bad, None).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)), "{bad}: {err:?}");
  }

  let stored = s.get_movie(m).await.unwrap().unwrap();
  assert_eq!(stored.rating_summary(), summary(4.0, 1));
  assert_eq!(s.review_history(m, a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn rating_unknown_movie_or_user_writes_nothing() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Up").await;
  let a = user(&s, "alice").await.user_id;

  let err = agg.apply_rating(Uuid::new_v4(), a, 3, None).await.unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));

  let err = agg.apply_rating(m, Uuid::new_v4(), 3, None).await.unwrap_err();
  assert!(matches!(err, CoreError::UserNotFound(_)));

  assert_eq!(s.get_movie(m).await.unwrap().unwrap().rating_count, 0);
}

#[tokio::test]
async fn failed_aggregate_write_rolls_back_the_review() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Solaris").await;
  let a = user(&s, "alice").await.user_id;
  let b = user(&s, "bob").await.user_id;
  agg.apply_rating(m, a, 2, None).await.unwrap();

  s.execute_batch(
    "CREATE TRIGGER reject_aggregate BEFORE UPDATE OF aggregate_rating ON movies
     BEGIN SELECT RAISE(ABORT, 'aggregate write refused'); END;",
  )
  .await
  .unwrap();

  let err = agg.apply_rating(m, b, 5, None).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)), "{err:?}");
  assert!(s.review_history(m, b).await.unwrap().is_empty());

  let err = agg.withdraw_rating(m, a).await.unwrap_err();
  assert!(matches!(err, CoreError::Persistence(_)), "{err:?}");
  let history = s.review_history(m, a).await.unwrap();
  assert_eq!(history.len(), 1);
  assert!(history[0].withdrawn_at.is_none());

  let stored = s.get_movie(m).await.unwrap().unwrap();
  assert_eq!(stored.rating_summary(), summary(2.0, 1));
}

#[tokio::test]
async fn recompute_unknown_movie_is_not_found() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let err = agg.recompute(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));
}

#[tokio::test]
async fn recompute_is_idempotent() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Brazil").await;
  let a = user(&s, "alice").await.user_id;
  agg.apply_rating(m, a, 2, None).await.unwrap();

  let once = agg.recompute(m).await.unwrap();
  let twice = agg.recompute(m).await.unwrap();
  assert_eq!(once, summary(2.0, 1));
  assert_eq!(once, twice);
}

#[tokio::test]
async fn withdraw_without_review_changes_nothing() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Memento").await;
  let a = user(&s, "alice").await.user_id;
  let b = user(&s, "bob").await.user_id;
  agg.apply_rating(m, a, 3, None).await.unwrap();

  assert_eq!(agg.withdraw_rating(m, b).await.unwrap(), summary(3.0, 1));
  agg.withdraw_rating(m, a).await.unwrap();
  assert_eq!(agg.withdraw_rating(m, a).await.unwrap(), RatingSummary::EMPTY);
}

#[tokio::test]
async fn withdraw_unknown_movie_is_not_found() {
  let s = store().await;
  let err = s.withdraw_review(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::MovieNotFound(_)));
}

#[tokio::test]
async fn rerating_after_withdraw_keeps_history() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Her").await;
  let a = user(&s, "alice").await.user_id;

  let first = agg.apply_rating(m, a, 2, Some("meh".into())).await.unwrap();
  agg.withdraw_rating(m, a).await.unwrap();
  let second = agg.apply_rating(m, a, 5, None).await.unwrap();

  assert!(second.created);
  assert_ne!(first.review.review_id, second.review.review_id);
  assert_eq!(second.summary, summary(5.0, 1));

  let history = s.review_history(m, a).await.unwrap();
  assert_eq!(history.len(), 2);
  assert!(!history[0].is_active());
  assert_eq!(history[0].content.as_deref(), Some("meh"));
  assert!(history[1].is_active());

  let withdrawn = s.get_review(first.review.review_id).await.unwrap().unwrap();
  assert!(withdrawn.withdrawn_at.is_some());
}

#[tokio::test]
async fn replaced_review_is_readable() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Rope").await;
  let a = user(&s, "alice").await.user_id;

  agg.apply_rating(m, a, 2, Some("slow".into())).await.unwrap();
  let replaced = agg.apply_rating(m, a, 4, Some("grew on me".into())).await.unwrap();

  let fetched = s.get_review(replaced.review.review_id).await.unwrap().unwrap();
  assert_eq!(fetched, replaced.review);
  assert!(fetched.updated_at.is_some());
}

#[tokio::test]
async fn movie_reviews_are_newest_first_with_usernames() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Nope").await;
  let a = user(&s, "alice").await.user_id;
  let b = user(&s, "bob").await.user_id;
  agg.apply_rating(m, a, 3, None).await.unwrap();
  agg.apply_rating(m, b, 4, None).await.unwrap();

  let reviews = s.list_movie_reviews(m).await.unwrap();
  let names: Vec<_> = reviews.iter().map(|r| r.username.as_str()).collect();
  assert_eq!(names, ["bob", "alice"]);

  let mine = s.list_user_reviews(a).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].movie_id, m);
}

#[tokio::test]
async fn distribution_counts_active_reviews() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Jaws").await;
  for (name, score) in [("u1", 5), ("u2", 5), ("u3", 1)] {
    let u = user(&s, name).await.user_id;
    agg.apply_rating(m, u, score, None).await.unwrap();
  }

  let dist = s.rating_distribution(m).await.unwrap();
  assert_eq!(dist.count_for(Score::new(5).unwrap()), 2);
  assert_eq!(dist.count_for(Score::new(1).unwrap()), 1);
  assert_eq!(dist.total(), 3);

  let err = s.rating_distribution(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::MovieNotFound(_)));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ratings_lose_no_update() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m = movie(&s, "Heat").await;

  let mut users = Vec::new();
  for i in 0..20 {
    users.push(user(&s, &format!("user{i}")).await.user_id);
  }

  let tasks: Vec<_> = users
    .iter()
    .enumerate()
    .map(|(i, &u)| {
      let agg = agg.clone();
      let score = (i % 5) as i64 + 1;
      tokio::spawn(async move { agg.apply_rating(m, u, score, None).await })
    })
    .collect();
  for t in tasks {
    t.await.unwrap().unwrap();
  }

  // Each score 1..=5 four times: mean 3.0.
  let stored = s.get_movie(m).await.unwrap().unwrap();
  assert_eq!(stored.rating_summary(), summary(3.0, 20));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_connections_to_one_file_stay_consistent() {
  let path = std::env::temp_dir().join(format!("reel-test-{}.db", Uuid::new_v4()));
  let first = Arc::new(SqliteStore::open(&path).await.unwrap());
  let second = Arc::new(SqliteStore::open(&path).await.unwrap());
  let m = movie(&first, "Ran").await;

  let mut users = Vec::new();
  for i in 0..10 {
    users.push(user(&first, &format!("viewer{i}")).await.user_id);
  }

  let tasks: Vec<_> = users
    .iter()
    .enumerate()
    .map(|(i, &u)| {
      let agg = if i % 2 == 0 {
        RatingAggregator::new(first.clone())
      } else {
        RatingAggregator::new(second.clone())
      };
      tokio::spawn(async move { agg.apply_rating(m, u, 4, None).await })
    })
    .collect();
  for t in tasks {
    t.await.unwrap().unwrap();
  }

  let via_second = second.get_movie(m).await.unwrap().unwrap();
  assert_eq!(via_second.rating_summary(), summary(4.0, 10));

  drop((first, second));
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.clone().into_os_string();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;

  let err = s
    .add_user(NewUser {
      username:        "alice2".into(),
      email:           "alice@example.com".into(),
      password_hash:   "x".into(),
      display_name:    None,
      favorite_genres: vec![],
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::EmailTaken(_)));
}

#[tokio::test]
async fn credentials_lookup_by_email() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let creds = s
    .find_credentials("alice@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.user.user_id, alice.user_id);
  assert_eq!(creds.password_hash, "not-a-real-hash");

  assert!(s.find_credentials("nobody@example.com".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_user_sets_and_clears_fields() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let updated = s
    .update_user(alice.user_id, UserUpdate {
      display_name:    Some("Alice L.".into()),
      bio:             Some("Film nerd".into()),
      favorite_genres: Some(vec!["Drama".into()]),
      ..UserUpdate::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.display_name.as_deref(), Some("Alice L."));
  assert_eq!(updated.favorite_genres, vec!["Drama"]);

  let cleared = s
    .update_user(alice.user_id, UserUpdate {
      bio: Some(String::new()),
      ..UserUpdate::default()
    })
    .await
    .unwrap();
  assert_eq!(cleared.bio, None);
  assert_eq!(cleared.display_name.as_deref(), Some("Alice L."));

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, cleared);
}

#[tokio::test]
async fn purge_withdraws_reviews_and_recomputes() {
  let s = Arc::new(store().await);
  let agg = RatingAggregator::new(s.clone());
  let m1 = movie(&s, "Solaris").await;
  let m2 = movie(&s, "Stalker").await;
  let a = user(&s, "alice").await;
  let b = user(&s, "bob").await.user_id;

  agg.apply_rating(m1, a.user_id, 1, None).await.unwrap();
  agg.apply_rating(m2, a.user_id, 1, None).await.unwrap();
  agg.apply_rating(m1, b, 5, None).await.unwrap();
  s.add_to_watchlist(a.user_id, m1).await.unwrap();

  let mut affected = agg.purge_actor(a.user_id).await.unwrap();
  affected.sort();
  let mut expected = vec![m1, m2];
  expected.sort();
  assert_eq!(affected, expected);

  assert_eq!(s.get_movie(m1).await.unwrap().unwrap().rating_summary(), summary(5.0, 1));
  assert_eq!(s.get_movie(m2).await.unwrap().unwrap().rating_summary(), RatingSummary::EMPTY);
  assert!(s.get_user(a.user_id).await.unwrap().is_none());
  assert!(s.find_credentials(a.email.clone()).await.unwrap().is_none());
  assert!(s.list_watchlist(a.user_id).await.unwrap().is_empty());

  // The email is free again once the account is gone.
  user(&s, "alice").await;

  let err = agg.purge_actor(a.user_id).await.unwrap_err();
  assert!(matches!(err, CoreError::UserNotFound(_)));
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let expires = chrono::Utc::now() + chrono::Duration::hours(1);

  let session = s
    .create_session(alice.user_id, "abc123".into(), expires)
    .await
    .unwrap();
  assert_eq!(session.user_id, alice.user_id);

  let found = s.find_session("abc123".into()).await.unwrap().unwrap();
  assert_eq!(found.user_id, alice.user_id);
  assert!(!found.is_expired(chrono::Utc::now()));

  assert!(s.delete_session("abc123".into()).await.unwrap());
  assert!(!s.delete_session("abc123".into()).await.unwrap());
  assert!(s.find_session("abc123".into()).await.unwrap().is_none());
}

// ─── Watchlist ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn watchlist_add_list_mark_remove() {
  let s = store().await;
  let alice = user(&s, "alice").await.user_id;
  let m1 = movie(&s, "Vertigo").await;
  let m2 = movie(&s, "Psycho").await;

  let entry = s.add_to_watchlist(alice, m1).await.unwrap();
  assert!(!entry.watched);
  s.add_to_watchlist(alice, m2).await.unwrap();

  let items = s.list_watchlist(alice).await.unwrap();
  let titles: Vec<_> = items.iter().map(|i| i.movie.title.as_str()).collect();
  assert_eq!(titles, ["Vertigo", "Psycho"]);

  let marked = s.set_watched(alice, m1, true).await.unwrap().unwrap();
  assert!(marked.watched);
  assert!(s.set_watched(alice, Uuid::new_v4(), true).await.unwrap().is_none());

  assert!(s.remove_from_watchlist(alice, m1).await.unwrap());
  assert!(!s.remove_from_watchlist(alice, m1).await.unwrap());
  assert_eq!(s.list_watchlist(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn watchlist_rejects_duplicates_and_unknown_movies() {
  let s = store().await;
  let alice = user(&s, "alice").await.user_id;
  let m = movie(&s, "Rear Window").await;
  s.add_to_watchlist(alice, m).await.unwrap();

  let err = s.add_to_watchlist(alice, m).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::AlreadyInWatchlist { .. }));

  let err = s.add_to_watchlist(alice, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::MovieNotFound(_)));
}
