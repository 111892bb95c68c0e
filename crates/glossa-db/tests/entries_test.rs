//! Integration tests for the PostgreSQL repositories.
//!
//! These need a reachable, migrated database (`DATABASE_URL`, falling back to
//! `test_fixtures::DEFAULT_TEST_DATABASE_URL`) and are ignored by default:
//!
//! ```sh
//! cargo test -p glossa-db -- --ignored
//! ```

use glossa_db::test_fixtures::{connect_test_database, unique_keyword};
use glossa_db::{CreateUserRequest, EntryRepository, Error, StarRepository, UserRepository, WriteEntryRequest};

fn write(keyword: &str, description: &str) -> WriteEntryRequest {
    WriteEntryRequest {
        keyword: keyword.to_string(),
        description: description.to_string(),
        author_id: 1,
    }
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_insert_duplicate_keyword_is_reported_as_conflict() {
    let db = connect_test_database().await;
    let keyword = unique_keyword("dup");

    db.entries.insert(&write(&keyword, "first")).await.unwrap();
    let err = db.entries.insert(&write(&keyword, "second")).await.unwrap_err();

    assert!(
        matches!(err, Error::DuplicateKeyword(ref k) if k == &keyword),
        "expected DuplicateKeyword, got {:?}",
        err
    );

    let entry = db.entries.get(&keyword).await.unwrap().unwrap();
    assert_eq!(entry.description, "first");
    db.entries.delete(&keyword).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_concurrent_inserts_leave_one_row() {
    let db = connect_test_database().await;
    let keyword = unique_keyword("race");

    let a = write(&keyword, "from a");
    let b = write(&keyword, "from b");
    let (ra, rb) = tokio::join!(db.entries.insert(&a), db.entries.insert(&b));

    let outcomes = [ra, rb];
    let ok = outcomes.iter().filter(|r| r.is_ok()).count();
    let dup = outcomes
        .iter()
        .filter(|r| matches!(r, Err(Error::DuplicateKeyword(_))))
        .count();
    assert_eq!((ok, dup), (1, 1));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry WHERE keyword = $1")
        .bind(&keyword)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
    db.entries.delete(&keyword).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_update_rewrites_description() {
    let db = connect_test_database().await;
    let keyword = unique_keyword("upd");

    assert!(!db.entries.update(&write(&keyword, "nothing")).await.unwrap());

    db.entries.insert(&write(&keyword, "desc1")).await.unwrap();
    let before = db.entries.get(&keyword).await.unwrap().unwrap();
    assert!(db.entries.update(&write(&keyword, "desc2")).await.unwrap());
    let after = db.entries.get(&keyword).await.unwrap().unwrap();

    assert_eq!(after.description, "desc2");
    assert_eq!(after.id, before.id);
    assert!(after.updated_at >= before.updated_at);
    db.entries.delete(&keyword).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_keywords_mentioning_escapes_wildcards() {
    let db = connect_test_database().await;
    let plain = unique_keyword("plain");
    let percent = unique_keyword("percent");

    db.entries.insert(&write(&plain, "nothing special")).await.unwrap();
    db.entries.insert(&write(&percent, "costs 100% more")).await.unwrap();

    let hits = db.entries.keywords_mentioning("0%").await.unwrap();
    assert!(hits.contains(&percent));
    assert!(!hits.contains(&plain));

    let hits = db.entries.keywords_mentioning("_").await.unwrap();
    assert!(!hits.contains(&plain));

    db.entries.delete(&plain).await.unwrap();
    db.entries.delete(&percent).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_all_keywords_longest_first() {
    let db = connect_test_database().await;
    let short = unique_keyword("s");
    let long = format!("{}-much-longer", unique_keyword("l"));

    db.entries.insert(&write(&short, "")).await.unwrap();
    db.entries.insert(&write(&long, "")).await.unwrap();

    let keywords = db.entries.all_keywords().await.unwrap();
    let lengths: Vec<usize> = keywords.iter().map(|k| k.chars().count()).collect();
    assert!(lengths.windows(2).all(|w| w[0] >= w[1]));

    let long_pos = keywords.iter().position(|k| k == &long).unwrap();
    let short_pos = keywords.iter().position(|k| k == &short).unwrap();
    assert!(long_pos < short_pos);

    db.entries.delete(&short).await.unwrap();
    db.entries.delete(&long).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_stars_read_back_in_insertion_order() {
    let db = connect_test_database().await;
    let keyword = unique_keyword("star");

    db.stars.append(&keyword, "alice").await.unwrap();
    db.stars.append(&keyword, "bob").await.unwrap();
    db.stars.append(&keyword, "alice").await.unwrap();

    let names: Vec<String> =
        sqlx::query_scalar("SELECT user_name FROM star WHERE keyword = $1 ORDER BY id")
            .bind(&keyword)
            .fetch_all(db.pool())
            .await
            .unwrap();
    assert_eq!(names, vec!["alice", "bob", "alice"]);
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_duplicate_user_name_rejected() {
    let db = connect_test_database().await;
    let name = unique_keyword("user");
    let req = || CreateUserRequest {
        name: name.clone(),
        salt: "salt".to_string(),
        password_hash: "hash".to_string(),
    };

    let id = db.users.create(req()).await.unwrap();
    let found = db.users.find_by_name(&name).await.unwrap().unwrap();
    assert_eq!(found.id, id);

    let err = db.users.create(req()).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateUser(_)));
}
