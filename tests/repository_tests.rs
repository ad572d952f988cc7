//! Storage-level tests running against a throwaway SQLite file.

use movie_api::config::SecurityConfig;
use movie_api::db::Store;
use movie_api::domain::{MovieId, ReferenceKind, UserId};
use movie_api::models::movie::MovieDraft;
use movie_api::models::review::ReviewDraft;
use movie_api::models::seed::SeedData;
use movie_api::services::{AuthError, MovieError, ReviewError, TokenService};

const TEST_SECRET: &str = "repository-test-signing-key-0123456789";

fn cheap_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    }
}

async fn fresh_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("movie-api-repo-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store");

    let seed = SeedData {
        genres: vec!["Drama".to_string(), "Thriller".to_string()],
        countries: vec!["France".to_string()],
        languages: vec!["French".to_string()],
        people: vec!["Agnès Varda".to_string()],
    };
    store.apply_seed(&seed).await.expect("failed to seed");
    store
}

async fn user(store: &Store, name: &str) -> UserId {
    store
        .create_user(name, "secret1", &cheap_security())
        .await
        .expect("failed to create user")
        .id
}

async fn movie(store: &Store, title: &str) -> MovieId {
    let draft = MovieDraft {
        title: title.to_string(),
        year: 1962,
        genre_ids: vec![1],
        ..MovieDraft::default()
    };
    MovieId::new(store.create_movie(&draft).await.expect("failed to create movie").id)
}

fn review(movie_id: MovieId, rating: Option<f64>, text: Option<&str>) -> ReviewDraft {
    ReviewDraft {
        movie_id,
        rating,
        text: text.map(str::to_string),
    }
}

#[tokio::test]
async fn register_verify_and_token_round_trip() {
    let store = fresh_store().await;
    let security = cheap_security();
    let tokens = TokenService::new(TEST_SECRET, 24).unwrap();

    let created = store.create_user("alice", "secret1", &security).await.unwrap();

    let verified = store
        .verify_user_password("alice", "secret1", &security)
        .await
        .unwrap()
        .expect("password should verify");
    assert_eq!(verified.id, created.id);

    assert!(
        store
            .verify_user_password("alice", "wrong1", &security)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_user_password("nobody", "secret1", &security)
            .await
            .unwrap()
            .is_none()
    );

    let token = tokens.issue(verified.id).unwrap();
    let user_id = tokens.validate(&token).unwrap();
    let resolved = store.get_user(user_id).await.unwrap().unwrap();
    assert_eq!(resolved.username, "alice");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let store = fresh_store().await;
    user(&store, "alice").await;

    let err = store
        .create_user("alice", "other-password", &cheap_security())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken(name) if name == "alice"));
}

#[tokio::test]
async fn unresolved_reference_leaves_no_movie_behind() {
    let store = fresh_store().await;
    let before = store.movie_count().await.unwrap();

    let draft = MovieDraft {
        title: "Cléo from 5 to 7".to_string(),
        year: 1962,
        genre_ids: vec![1, 2],
        director_ids: vec![1, 77],
        ..MovieDraft::default()
    };
    let err = store.create_movie(&draft).await.unwrap_err();

    assert!(matches!(
        err,
        MovieError::UnresolvedReference {
            kind: ReferenceKind::Person,
            id: 77
        }
    ));
    assert_eq!(store.movie_count().await.unwrap(), before);
}

#[tokio::test]
async fn duplicate_ids_in_draft_are_collapsed() {
    let store = fresh_store().await;
    let draft = MovieDraft {
        title: "Le Bonheur".to_string(),
        year: 1965,
        genre_ids: vec![1, 1, 2],
        actor_ids: vec![1, 1],
        ..MovieDraft::default()
    };
    let created = store.create_movie(&draft).await.unwrap();

    let detail = store
        .get_movie_detail(MovieId::new(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.genres.len(), 2);
    assert_eq!(detail.actors.len(), 1);
}

#[tokio::test]
async fn mean_rating_ignores_text_only_reviews() {
    let store = fresh_store().await;
    let movie_id = movie(&store, "Vagabond").await;

    let a = user(&store, "ann").await;
    let b = user(&store, "ben").await;
    let c = user(&store, "cat").await;

    store.create_review(a, &review(movie_id, Some(3.0), None)).await.unwrap();
    store.create_review(b, &review(movie_id, Some(5.0), None)).await.unwrap();
    store
        .create_review(c, &review(movie_id, None, Some("no score, just vibes")))
        .await
        .unwrap();

    let mean = store.mean_rating(movie_id).await.unwrap();
    assert!((mean - 4.0).abs() < f64::EPSILON);

    let listing = store.list_movies().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert!((listing[0].average_rating - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn movie_without_reviews_averages_zero() {
    let store = fresh_store().await;
    let rated = movie(&store, "Rated").await;
    let unrated = movie(&store, "Unrated").await;

    let u = user(&store, "dora").await;
    store.create_review(u, &review(rated, Some(9.0), None)).await.unwrap();

    assert_eq!(store.mean_rating(unrated).await.unwrap(), 0.0);

    let listing = store.list_movies().await.unwrap();
    assert_eq!(listing.len(), 2);
    let unrated_row = listing.iter().find(|m| m.id == unrated.value()).unwrap();
    let rated_row = listing.iter().find(|m| m.id == rated.value()).unwrap();
    assert_eq!(unrated_row.average_rating, 0.0);
    assert_eq!(rated_row.average_rating, 9.0);
}

#[tokio::test]
async fn second_review_by_same_user_conflicts() {
    let store = fresh_store().await;
    let movie_id = movie(&store, "One Sings").await;
    let u = user(&store, "eve").await;

    store.create_review(u, &review(movie_id, Some(6.0), None)).await.unwrap();
    let err = store
        .create_review(u, &review(movie_id, Some(7.0), None))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::Duplicate(id) if id == movie_id));
    assert_eq!(store.review_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_reviews_yield_one_success() {
    let store = fresh_store().await;
    let movie_id = movie(&store, "Jacquot de Nantes").await;
    let u = user(&store, "gil").await;

    let mut tasks = tokio::task::JoinSet::new();
    for rating in [4.0, 5.0, 6.0, 7.0] {
        let store = store.clone();
        tasks.spawn(async move {
            store
                .create_review(u, &review(movie_id, Some(rating), None))
                .await
        });
    }

    let mut created = 0;
    let mut duplicates = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => created += 1,
            Err(ReviewError::Duplicate(id)) if id == movie_id => duplicates += 1,
            Err(other) => panic!("unexpected review error: {other:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 3);
    assert_eq!(store.review_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reviews_by_different_users_all_land() {
    let store = fresh_store().await;
    let movie_id = movie(&store, "Daguerréotypes").await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(user(&store, &format!("viewer{i}")).await);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for u in users {
        let store = store.clone();
        tasks.spawn(async move {
            store
                .create_review(u, &review(movie_id, Some(8.0), None))
                .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().expect("every distinct user review should be stored");
    }

    assert_eq!(store.review_count().await.unwrap(), 8);
    assert_eq!(store.mean_rating(movie_id).await.unwrap(), 8.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_movie_creations_with_references_all_commit() {
    let store = fresh_store().await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let store = store.clone();
        tasks.spawn(async move {
            let draft = MovieDraft {
                title: format!("Short film {i}"),
                year: 1958,
                genre_ids: vec![1],
                director_ids: vec![1],
                country_id: Some(1),
                ..MovieDraft::default()
            };
            store.create_movie(&draft).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let created = joined.unwrap().expect("valid movie should be created");
        assert_eq!(created.country_id, Some(1));
    }

    assert_eq!(store.movie_count().await.unwrap(), 8);
}

#[tokio::test]
async fn review_for_unknown_movie_is_rejected() {
    let store = fresh_store().await;
    let u = user(&store, "fay").await;

    let err = store
        .create_review(u, &review(MovieId::new(404), Some(5.0), None))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::MovieNotFound(id) if id == MovieId::new(404)));
    assert_eq!(store.review_count().await.unwrap(), 0);
}

#[tokio::test]
async fn seeding_twice_adds_nothing_new() {
    let store = fresh_store().await;
    let seed = SeedData {
        genres: vec!["Drama".to_string(), "Comedy".to_string()],
        people: vec!["Agnès Varda".to_string(), "Jacques Demy".to_string()],
        ..SeedData::default()
    };

    let first = store.apply_seed(&seed).await.unwrap();
    assert_eq!(first.genres, 1);
    assert_eq!(first.people, 1);

    let second = store.apply_seed(&seed).await.unwrap();
    assert_eq!(second.total(), 0);
}
