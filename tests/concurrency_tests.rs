//! Concurrency integration tests
//!
//! Drive a shared `PointCoordinator` from many tokio tasks and check that
//! balance changes for one user serialize, that different users proceed
//! independently, and that waiters are served in arrival order.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use point_ledger::types::Result;
use point_ledger::{
    BalanceStore, HistoryLog, InMemoryBalanceStore, InMemoryHistoryLog, Point, PointCoordinator,
    PointError, PointHistory, TransactionType, UserId,
};
use rstest::rstest;

/// History log that refuses every append for one user
struct RefusingHistoryLog {
    inner: InMemoryHistoryLog,
    refused: UserId,
}

impl HistoryLog for RefusingHistoryLog {
    fn list_by_user(&self, user: UserId) -> Vec<PointHistory> {
        self.inner.list_by_user(user)
    }

    fn append(
        &self,
        user: UserId,
        amount: Point,
        tx_type: Option<TransactionType>,
        timestamp: DateTime<Utc>,
    ) -> Result<PointHistory> {
        if user == self.refused {
            return Err(PointError::Io {
                message: format!("history unavailable for user {}", user),
            });
        }
        self.inner.append(user, amount, tx_type, timestamp)
    }

    fn all(&self) -> Vec<PointHistory> {
        self.inner.all()
    }
}

async fn seeded(users: &[(UserId, i64)]) -> PointCoordinator {
    let coordinator = PointCoordinator::in_memory();
    for &(user, point) in users {
        coordinator.register(user).await.unwrap();
        if point > 0 {
            coordinator.charge(user, point).await.unwrap();
        }
    }
    coordinator
}

async fn run_concurrently(
    coordinator: &PointCoordinator,
    requests: Vec<(UserId, TransactionType, i64)>,
) -> Vec<Result<point_ledger::UserPoint>> {
    let handles: Vec<_> = requests
        .into_iter()
        .map(|(user, tx_type, amount)| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                match tx_type {
                    TransactionType::Charge => coordinator.charge(user, amount).await,
                    TransactionType::Use => coordinator.use_points(user, amount).await,
                }
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[rstest]
#[case::charge(TransactionType::Charge, 0, 100)]
#[case::use_points(TransactionType::Use, 500, 400)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hundred_concurrent_requests_on_one_user(
    #[case] tx_type: TransactionType,
    #[case] initial: i64,
    #[case] expected: Point,
) {
    let coordinator = seeded(&[(1, initial)]).await;
    let requests = (0..100).map(|_| (1, tx_type, 1)).collect();

    let results = run_concurrently(&coordinator, requests).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(coordinator.get_balance(1).unwrap().point, expected);
    let history = coordinator.get_history(1);
    let expected_entries = if initial > 0 { 101 } else { 100 };
    assert_eq!(history.len(), expected_entries);
}

#[rstest]
#[case::charge(TransactionType::Charge, 0, 50)]
#[case::use_points(TransactionType::Use, 500, 450)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_split_across_users(
    #[case] tx_type: TransactionType,
    #[case] initial: i64,
    #[case] expected: Point,
) {
    let coordinator = seeded(&[(1, initial), (2, initial)]).await;
    let requests = (0..100).map(|i| (1 + i % 2, tx_type, 1)).collect();

    let results = run_concurrently(&coordinator, requests).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(coordinator.get_balance(1).unwrap().point, expected);
    assert_eq!(coordinator.get_balance(2).unwrap().point, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uses_never_overdraw() {
    let coordinator = seeded(&[(1, 50)]).await;
    let requests = (0..100).map(|_| (1, TransactionType::Use, 1)).collect();

    let results = run_concurrently(&coordinator, requests).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 50);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.code() == "POINT_BALANCE_INSUFFICIENT"));
    assert_eq!(coordinator.get_balance(1).unwrap().point, 0);
    // One charge from seeding plus 50 uses
    assert_eq!(coordinator.get_history(1).len(), 51);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_waiters_are_served_in_arrival_order() {
    let coordinator = seeded(&[(1, 0)]).await;

    let lock = coordinator.lock_registry().lock_for(1);
    let guard = lock.lock().await;

    let charge = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.charge(1, 100).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let use_points = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.use_points(1, 50).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Nothing commits while the lock is held
    assert_eq!(coordinator.get_balance(1).unwrap().point, 0);
    drop(guard);

    // The use would fail against a zero balance if it ran first
    assert_eq!(charge.await.unwrap().unwrap().point, 100);
    assert_eq!(use_points.await.unwrap().unwrap().point, 50);

    let types: Vec<_> = coordinator
        .get_history(1)
        .iter()
        .map(|entry| entry.tx_type)
        .collect();
    assert_eq!(types, vec![TransactionType::Charge, TransactionType::Use]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_held_lock_does_not_block_other_users() {
    let coordinator = seeded(&[(1, 0), (2, 0)]).await;

    let lock = coordinator.lock_registry().lock_for(1);
    let _guard = lock.lock().await;

    let result = tokio::time::timeout(Duration::from_secs(1), coordinator.charge(2, 10)).await;

    assert_eq!(result.unwrap().unwrap().point, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rollback_under_concurrency_keeps_other_users_intact() {
    let balances = Arc::new(InMemoryBalanceStore::new());
    let history = Arc::new(RefusingHistoryLog {
        inner: InMemoryHistoryLog::new(),
        refused: 13,
    });
    balances.put(13, 100);
    balances.put(14, 100);
    let coordinator = PointCoordinator::new(balances, history);

    let requests = (0..40)
        .map(|i| {
            let user = if i % 2 == 0 { 13 } else { 14 };
            let tx_type = if i % 4 < 2 {
                TransactionType::Charge
            } else {
                TransactionType::Use
            };
            (user, tx_type, 5)
        })
        .collect::<Vec<_>>();

    let handles: Vec<_> = requests
        .into_iter()
        .map(|(user, tx_type, amount)| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                match tx_type {
                    TransactionType::Charge => coordinator.charge(user, amount).await,
                    TransactionType::Use => coordinator.use_points(user, amount).await,
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    // Every change to user 13 was rolled back
    assert_eq!(coordinator.get_balance(13).unwrap().point, 100);
    assert!(coordinator.get_history(13).is_empty());

    // User 14 saw 10 charges and 10 uses of 5
    assert_eq!(coordinator.get_balance(14).unwrap().point, 100);
    assert_eq!(coordinator.get_history(14).len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_for_unknown_user_create_nothing() {
    let coordinator = PointCoordinator::in_memory();
    let requests = (0..20)
        .map(|i| {
            let tx_type = if i % 2 == 0 {
                TransactionType::Charge
            } else {
                TransactionType::Use
            };
            (99, tx_type, 1)
        })
        .collect();

    let results = run_concurrently(&coordinator, requests).await;

    assert!(results
        .iter()
        .all(|r| r.as_ref().unwrap_err() == &PointError::user_not_exist(99)));
    assert!(coordinator.get_balance(99).unwrap_err().is_not_found());
    assert!(coordinator.histories().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_creates_one_record() {
    let coordinator = PointCoordinator::in_memory();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.register(7).await.unwrap() })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().point, 0);
    }

    assert_eq!(coordinator.balances().len(), 1);
    assert_eq!(coordinator.lock_registry().len(), 1);
}
