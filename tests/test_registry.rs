//! Tests for connection admission

use turnstile::admission::{ConnectionId, ConnectionRegistry, ConnectionState};

#[tokio::test]
async fn test_register_assigns_increasing_ids() {
    let registry = ConnectionRegistry::default();

    let a = registry.register().await;
    let b = registry.register().await;
    let c = registry.register().await;

    assert_eq!(a, ConnectionId(1));
    assert_eq!(b, ConnectionId(2));
    assert_eq!(c, ConnectionId(3));
    assert_eq!(registry.count_live().await, 3);
}

#[tokio::test]
async fn test_ids_are_never_reused() {
    let registry = ConnectionRegistry::default();

    let a = registry.register().await;
    registry.mark_dead(a).await;
    let b = registry.register().await;

    assert_eq!(b, ConnectionId(2));
    assert_eq!(registry.entries().await.len(), 2);
}

#[tokio::test]
async fn test_mark_dead_is_terminal() {
    let registry = ConnectionRegistry::default();
    let id = registry.register().await;

    registry.mark_dead(id).await;
    registry.mark_dead(id).await;

    assert_eq!(registry.state(id).await, Some(ConnectionState::Dead));
    assert_eq!(registry.count_live().await, 0);
    assert_eq!(registry.state(ConnectionId(99)).await, None);
}

#[tokio::test]
async fn test_first_five_live_are_admitted() {
    let registry = ConnectionRegistry::default();
    let mut ids = Vec::new();
    for _ in 0..7 {
        ids.push(registry.register().await);
    }

    for id in &ids[..5] {
        assert!(registry.is_admitted(*id).await, "{} should be admitted", id);
    }
    for id in &ids[5..] {
        assert!(!registry.is_admitted(*id).await, "{} should be refused", id);
    }
}

#[tokio::test]
async fn test_capacity_frees_when_early_connection_dies() {
    let registry = ConnectionRegistry::default();
    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(registry.register().await);
    }
    assert!(!registry.is_admitted(ids[5]).await);

    registry.mark_dead(ids[1]).await;

    assert!(registry.is_admitted(ids[5]).await);
    assert!(!registry.is_admitted(ids[1]).await);
    assert_eq!(registry.count_live().await, 5);
}

#[tokio::test]
async fn test_later_connection_waits_behind_earlier_refused_one() {
    let registry = ConnectionRegistry::new(2);
    let a = registry.register().await;
    let _b = registry.register().await;
    let c = registry.register().await;
    let d = registry.register().await;

    registry.mark_dead(a).await;

    // First come, first served: c gets the freed slot, d still waits.
    assert!(registry.is_admitted(c).await);
    assert!(!registry.is_admitted(d).await);
}

#[tokio::test]
async fn test_unknown_connection_not_admitted() {
    let registry = ConnectionRegistry::default();
    registry.register().await;
    assert!(!registry.is_admitted(ConnectionId(42)).await);
}

#[tokio::test]
async fn test_clones_share_state() {
    let registry = ConnectionRegistry::new(3);
    let clone = registry.clone();

    let id = clone.register().await;

    assert_eq!(registry.count_live().await, 1);
    assert!(registry.is_admitted(id).await);
    assert_eq!(registry.max_live(), 3);
}

#[tokio::test]
async fn test_concurrent_registration_has_no_lost_updates() {
    let registry = ConnectionRegistry::default();

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move { registry.register().await }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 50);
    assert_eq!(registry.count_live().await, 50);

    let mut admitted = 0;
    for id in ids {
        if registry.is_admitted(id).await {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 5);
}
