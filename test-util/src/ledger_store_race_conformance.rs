use contract_ledger_core::{
    fingerprint_bytes, DocumentId, Fingerprint, LedgerEvent, LedgerRecord, Principal,
};
use contract_ledger_store::{Error, LedgerStore, Result};
use std::sync::Arc;

const WRITER_COUNT: usize = 8;
const ROUND_COUNT: usize = 5;

/// Writers racing on one document from separate tasks.  Call this from a multi-thread runtime
/// so that the writers really overlap.  Every write either commits or fails with
/// Error::HeadChanged; a backend that reports lock contention as an error fails this.
pub async fn ledger_store_race_conformance(ledger_store: LedgerStore) {
    for round in 0..ROUND_COUNT {
        racing_conditional_updates(&ledger_store, round).await;
        racing_unconditional_updates(&ledger_store, round).await;
        racing_creates(&ledger_store, round).await;
    }
}

fn alice() -> Principal {
    Principal::new("0xA11CE").expect("pass")
}

async fn create_racing_document(ledger_store: &LedgerStore, label: &str) -> (DocumentId, Fingerprint) {
    let genesis_fingerprint = fingerprint_bytes(format!("{} genesis", label).as_bytes());
    let document_id = DocumentId::from_genesis_fingerprint(genesis_fingerprint);
    ledger_store
        .create_document(None, &document_id, &genesis_fingerprint, &alice())
        .await
        .expect("pass");
    (document_id, genesis_fingerprint)
}

fn new_fingerprints(label: &str) -> Vec<Fingerprint> {
    (0..WRITER_COUNT)
        .map(|i| fingerprint_bytes(format!("{} writer {}", label, i).as_bytes()))
        .collect()
}

/// Run one task per new fingerprint, all released at once by a barrier, and collect the
/// results in fingerprint order.
async fn race<F, Fut>(new_fingerprint_v: &[Fingerprint], write: F) -> Vec<Result<LedgerEvent>>
where
    F: Fn(Fingerprint) -> Fut,
    Fut: std::future::Future<Output = Result<LedgerEvent>> + Send + 'static,
{
    let barrier_a = Arc::new(tokio::sync::Barrier::new(new_fingerprint_v.len()));
    let join_handle_v = new_fingerprint_v
        .iter()
        .map(|new_fingerprint| {
            let barrier_a = barrier_a.clone();
            let write_future = write(*new_fingerprint);
            tokio::spawn(async move {
                barrier_a.wait().await;
                write_future.await
            })
        })
        .collect::<Vec<_>>();
    futures::future::join_all(join_handle_v)
        .await
        .into_iter()
        .map(|join_result| join_result.expect("pass"))
        .collect()
}

async fn racing_conditional_updates(ledger_store: &LedgerStore, round: usize) {
    let label = format!("racing_conditional_updates {}", round);
    let (document_id, genesis_fingerprint) = create_racing_document(ledger_store, &label).await;
    let new_fingerprint_v = new_fingerprints(&label);

    let result_v = race(&new_fingerprint_v, |new_fingerprint| {
        let ledger_store = ledger_store.clone();
        async move {
            ledger_store
                .update_document_if_head(
                    None,
                    &document_id,
                    &genesis_fingerprint,
                    &new_fingerprint,
                    &alice(),
                )
                .await
        }
    })
    .await;

    let winner_v = result_v
        .iter()
        .zip(new_fingerprint_v.iter())
        .filter(|(result, _)| result.is_ok())
        .map(|(_, new_fingerprint)| *new_fingerprint)
        .collect::<Vec<_>>();
    assert_eq!(winner_v.len(), 1, "results were {:?}", result_v);
    for result in result_v.iter() {
        match result {
            Ok(_) => {}
            Err(Error::HeadChanged {
                expected, actual, ..
            }) => {
                assert_eq!(*expected, genesis_fingerprint);
                assert_eq!(*actual, winner_v[0]);
            }
            Err(err) => panic!("expected HeadChanged, got {:?}", err),
        }
    }
    let history = ledger_store
        .get_history(None, &document_id)
        .await
        .expect("pass");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].version_record.fingerprint, winner_v[0]);
}

async fn racing_unconditional_updates(ledger_store: &LedgerStore, round: usize) {
    let label = format!("racing_unconditional_updates {}", round);
    let (document_id, _) = create_racing_document(ledger_store, &label).await;
    let new_fingerprint_v = new_fingerprints(&label);

    let result_v = race(&new_fingerprint_v, |new_fingerprint| {
        let ledger_store = ledger_store.clone();
        async move {
            ledger_store
                .update_document(None, &document_id, &new_fingerprint, &alice())
                .await
        }
    })
    .await;

    // A writer that read a head which moved before its append lands loses; any other writer
    // appends after whatever the head was when it read it.
    let mut committed_v = Vec::new();
    for (result, new_fingerprint) in result_v.iter().zip(new_fingerprint_v.iter()) {
        match result {
            Ok(LedgerEvent::DocumentUpdated {
                new_fingerprint: event_fingerprint,
                ..
            }) => {
                assert_eq!(event_fingerprint, new_fingerprint);
                committed_v.push(*new_fingerprint);
            }
            Ok(ledger_event) => panic!("expected DocumentUpdated, got {:?}", ledger_event),
            Err(Error::HeadChanged { .. }) => {}
            Err(err) => panic!("expected HeadChanged, got {:?}", err),
        }
    }
    assert!(!committed_v.is_empty());

    // get_history checks the chain's linking rules, so a fork or a lost link fails here.
    let history = ledger_store
        .get_history(None, &document_id)
        .await
        .expect("pass");
    assert_eq!(history.len(), committed_v.len() + 1);
    let mut recorded_v = history[1..]
        .iter()
        .map(|ledger_record: &LedgerRecord| ledger_record.version_record.fingerprint)
        .collect::<Vec<_>>();
    recorded_v.sort();
    committed_v.sort();
    assert_eq!(recorded_v, committed_v);
}

async fn racing_creates(ledger_store: &LedgerStore, round: usize) {
    let genesis_fingerprint =
        fingerprint_bytes(format!("racing_creates {} genesis", round).as_bytes());
    let document_id = DocumentId::from_genesis_fingerprint(genesis_fingerprint);
    let genesis_fingerprint_v = vec![genesis_fingerprint; WRITER_COUNT];

    let result_v = race(&genesis_fingerprint_v, |genesis_fingerprint| {
        let ledger_store = ledger_store.clone();
        async move {
            ledger_store
                .create_document(None, &document_id, &genesis_fingerprint, &alice())
                .await
        }
    })
    .await;

    let mut created_count = 0;
    for result in result_v.iter() {
        match result {
            Ok(_) => created_count += 1,
            Err(Error::AlreadyExists(d)) if *d == document_id => {}
            Err(err) => panic!("expected AlreadyExists, got {:?}", err),
        }
    }
    assert_eq!(created_count, 1);
    assert_eq!(
        ledger_store
            .get_history(None, &document_id)
            .await
            .expect("pass")
            .len(),
        1
    );
}
