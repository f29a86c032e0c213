//! LinkStore / AccessLog behavior against a real SQLite file

mod common;

use std::collections::HashSet;

use tinyhop::errors::TinyhopError;

use common::{at, new_mapping, test_store};

#[tokio::test]
async fn test_insert_and_lookup() {
    let store = test_store().await;
    let created = store
        .storage
        .insert(new_mapping("abc2345", at(10, 0, 0), 1))
        .await
        .expect("insert should succeed");

    assert_eq!(created.access_count, 0);

    let found = store.storage.lookup("abc2345").await.unwrap();
    assert_eq!(found, created);
    assert_eq!(found.expires_at, at(11, 0, 0));
    assert!(found.password_hash.is_none());
}

#[tokio::test]
async fn test_lookup_unknown_token() {
    let store = test_store().await;
    let result = store.storage.lookup("nothere").await;
    assert!(matches!(result, Err(TinyhopError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_insert_is_conflict() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("dup2345", at(10, 0, 0), 1))
        .await
        .unwrap();

    let mut second = new_mapping("dup2345", at(12, 0, 0), 5);
    second.destination = "https://other.example".to_string();
    let result = store.storage.insert(second).await;
    assert!(matches!(result, Err(TinyhopError::Conflict(_))));

    // 原记录未被覆盖
    let kept = store.storage.lookup("dup2345").await.unwrap();
    assert_eq!(kept.destination, "https://example.com/dup2345");
    assert_eq!(kept.created_at, at(10, 0, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_same_token_one_wins() {
    let store = test_store().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let storage = store.storage.clone();
        handles.push(tokio::spawn(async move {
            let mut m = new_mapping("race234", at(10, 0, 0), 1);
            m.destination = format!("https://example.com/{}", i);
            storage.insert(m).await
        }));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_increment_access_count() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("inc2345", at(10, 0, 0), 1))
        .await
        .unwrap();

    for _ in 0..3 {
        store.storage.increment_access_count("inc2345").await.unwrap();
    }
    assert_eq!(store.storage.lookup("inc2345").await.unwrap().access_count, 3);

    let missing = store.storage.increment_access_count("ghost23").await;
    assert!(matches!(missing, Err(TinyhopError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("hot2345", at(10, 0, 0), 1))
        .await
        .unwrap();

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let storage = store.storage.clone();
            tokio::spawn(async move { storage.increment_access_count("hot2345").await })
        })
        .collect();
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(store.storage.lookup("hot2345").await.unwrap().access_count, 25);
}

#[tokio::test]
async fn test_read_all_is_ordered_oldest_first() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("log2345", at(9, 0, 0), 5))
        .await
        .unwrap();

    store.storage.append("log2345", at(10, 30, 0), "3.3.3.3").await.unwrap();
    store.storage.append("log2345", at(10, 10, 0), "1.1.1.1").await.unwrap();
    store.storage.append("log2345", at(10, 20, 0), "2.2.2.2").await.unwrap();
    store.storage.append("other23", at(10, 15, 0), "9.9.9.9").await.unwrap();

    let records = store.storage.read_all("log2345").await.unwrap();
    let callers: Vec<_> = records.iter().map(|r| r.caller_address.as_str()).collect();
    assert_eq!(callers, ["1.1.1.1", "2.2.2.2", "3.3.3.3"]);
    assert!(records.iter().all(|r| r.token == "log2345"));
    assert_eq!(records[0].accessed_at, at(10, 10, 0));

    // append 不修改计数
    assert_eq!(store.storage.lookup("log2345").await.unwrap().access_count, 0);
}

#[tokio::test]
async fn test_read_all_same_timestamp_uses_insertion_order() {
    let store = test_store().await;
    for caller in ["a", "b", "c"] {
        store.storage.append("tie2345", at(10, 0, 0), caller).await.unwrap();
    }
    let callers: Vec<_> = store
        .storage
        .read_all("tie2345")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.caller_address)
        .collect();
    assert_eq!(callers, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_record_access_updates_both_tables() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("rec2345", at(10, 0, 0), 1))
        .await
        .unwrap();

    let record = store
        .storage
        .record_access("rec2345", at(10, 5, 0), "203.0.113.7")
        .await
        .unwrap();
    assert_eq!(record.token, "rec2345");
    assert_eq!(record.caller_address, "203.0.113.7");

    assert_eq!(store.storage.lookup("rec2345").await.unwrap().access_count, 1);
    assert_eq!(store.storage.read_all("rec2345").await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_record_access_unknown_token_writes_nothing() {
    let store = test_store().await;
    let result = store
        .storage
        .record_access("ghost23", at(10, 0, 0), "1.2.3.4")
        .await;
    assert!(matches!(result, Err(TinyhopError::NotFound(_))));
    assert!(store.storage.read_all("ghost23").await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_record_access_counts_match_records() {
    let store = test_store().await;
    store
        .storage
        .insert(new_mapping("par2345", at(10, 0, 0), 1))
        .await
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let storage = store.storage.clone();
            tokio::spawn(async move {
                storage
                    .record_access("par2345", at(10, 0, i), &format!("10.0.0.{}", i))
                    .await
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let mapping = store.storage.lookup("par2345").await.unwrap();
    let records = store.storage.read_all("par2345").await.unwrap();
    assert_eq!(mapping.access_count, 20);
    assert_eq!(records.len(), 20);

    let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_count_and_backend_name() {
    let store = test_store().await;
    assert_eq!(store.storage.count().await.unwrap(), 0);
    store
        .storage
        .insert(new_mapping("cnt2345", at(10, 0, 0), 1))
        .await
        .unwrap();
    assert_eq!(store.storage.count().await.unwrap(), 1);
    assert_eq!(store.storage.get_backend_name(), "sqlite");
}

#[tokio::test]
async fn test_closed_store_reports_unavailable() {
    let store = test_store().await;
    store.storage.close().await.unwrap();

    let result = store.storage.lookup("abc2345").await;
    assert!(matches!(result, Err(TinyhopError::StoreUnavailable(_))));
}
