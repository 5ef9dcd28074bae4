//! Runs against a real database: `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`

use sqlx::postgres::PgPoolOptions;
use visage_core::models::{AnalysisResult, Likelihood, StoredObject};
use visage_db::{AnalysisStore, PostgresAnalysisRepository};

async fn repository() -> PostgresAnalysisRepository {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    PostgresAnalysisRepository::new(pool)
}

#[tokio::test]
#[ignore]
async fn test_upsert_keeps_one_row_per_key() {
    let repo = repository().await;
    let key = format!("it-{}.jpg", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());
    let stored = StoredObject {
        key: key.clone(),
        public_url: format!("https://storage.googleapis.com/test/{}", key),
    };

    let first = AnalysisResult {
        object_key: key.clone(),
        joy: Likelihood::Unlikely,
    };
    repo.record(&stored, &first).await.unwrap();
    repo.record(&stored, &first).await.unwrap();

    let second = AnalysisResult {
        object_key: key.clone(),
        joy: Likelihood::VeryLikely,
    };
    repo.record(&stored, &second).await.unwrap();

    let record = repo.get(&key).await.unwrap().unwrap();
    assert_eq!(record.joy, Likelihood::VeryLikely);

    let many = repo
        .get_many(&[key.clone(), "never-uploaded.jpg".to_string()])
        .await
        .unwrap();
    assert_eq!(many.len(), 1);

    repo.ping().await.unwrap();
}
