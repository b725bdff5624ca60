use std::sync::Arc;

use tokio::task::JoinSet;

use codestore::domain::repository::ExpiringCodeStore;
use codestore::error::CodeStoreError;

use crate::helpers::{
    CountCodes, FixedCodeGenerator, default_zone, in_a_minute, memory_store, random, test_clock,
    zone,
};

#[tokio::test]
async fn should_fail_with_conflict_when_generator_repeats_code() {
    let clock = test_clock();
    let store = memory_store(&clock, FixedCodeGenerator("duplicate"));
    let expires_at = in_a_minute(&clock);

    let first = store
        .generate(Some("{}"), Some(expires_at), None, &default_zone())
        .await;
    assert!(first.is_ok(), "first generate should succeed, got {first:?}");

    let second = store
        .generate(Some("{}"), Some(expires_at), None, &default_zone())
        .await;
    assert!(
        matches!(second, Err(CodeStoreError::Conflict)),
        "expected Conflict, got {second:?}"
    );
    assert_eq!(store.count_codes().await, 1);
}

#[tokio::test]
async fn should_allow_same_code_in_different_zones() {
    let clock = test_clock();
    let store = memory_store(&clock, FixedCodeGenerator("shared"));
    let expires_at = in_a_minute(&clock);

    store
        .generate(Some("a"), Some(expires_at), None, &zone("a"))
        .await
        .unwrap();
    store
        .generate(Some("b"), Some(expires_at), None, &zone("b"))
        .await
        .unwrap();

    let a = store.retrieve(Some("shared"), &zone("a")).await.unwrap();
    let b = store.retrieve(Some("shared"), &zone("b")).await.unwrap();
    assert_eq!(a.map(|c| c.data), Some("a".to_owned()));
    assert_eq!(b.map(|c| c.data), Some("b".to_owned()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_hand_code_to_exactly_one_of_many_threads() {
    let clock = test_clock();
    let store = Arc::new(memory_store(&clock, random()));
    let code = store
        .generate(Some("secret"), Some(in_a_minute(&clock)), None, &default_zone())
        .await
        .unwrap()
        .code;

    let mut tasks = JoinSet::new();
    for _ in 0..32 {
        let store = Arc::clone(&store);
        let code = code.clone();
        tasks.spawn(async move { store.retrieve(Some(&code), &default_zone()).await });
    }

    let mut winners = 0;
    while let Some(joined) = tasks.join_next().await {
        if joined.unwrap().unwrap().is_some() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(store.count_codes().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_let_exactly_one_concurrent_generate_claim_a_code() {
    let clock = test_clock();
    let store = Arc::new(memory_store(&clock, FixedCodeGenerator("contended")));
    let expires_at = in_a_minute(&clock);

    let mut tasks = JoinSet::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let data = i.to_string();
            store
                .generate(Some(&data), Some(expires_at), None, &default_zone())
                .await
        });
    }

    let (mut ok, mut conflicts) = (0, 0);
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => ok += 1,
            Err(CodeStoreError::Conflict) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }
    assert_eq!((ok, conflicts), (1, 15));
}
