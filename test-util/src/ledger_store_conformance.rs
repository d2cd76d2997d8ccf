use contract_ledger_core::{
    fingerprint_bytes, DocumentId, Fingerprint, LedgerEvent, MissingIdentityPolicy, Principal,
};
use contract_ledger_store::{Error, LedgerStore};

fn principal(s: &str) -> Principal {
    Principal::new(s).expect("pass")
}

fn fingerprint_of(s: &str) -> Fingerprint {
    fingerprint_bytes(s.as_bytes())
}

/// Behavior every LedgerStorage backend must exhibit through LedgerStore.  The store must be
/// empty and use MissingIdentityPolicy::Fail.
pub async fn ledger_store_conformance(ledger_store: LedgerStore) {
    assert_eq!(
        ledger_store.missing_identity_policy(),
        MissingIdentityPolicy::Fail
    );
    create_then_latest(&ledger_store).await;
    update_links_to_previous_head(&ledger_store).await;
    duplicate_create_leaves_head_unchanged(&ledger_store).await;
    no_op_update_appends_nothing(&ledger_store).await;
    absent_document_is_not_found(&ledger_store).await;
    revert_to_earlier_content_is_a_new_version(&ledger_store).await;
    stale_expected_heads_see_head_changed(&ledger_store).await;
    caller_supplied_transaction(&ledger_store).await;
    find_records_with_fingerprint_across_documents(&ledger_store).await;
}

async fn create_then_latest(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("create_then_latest A");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    let ledger_event = ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    assert_eq!(
        ledger_event,
        LedgerEvent::DocumentCreated {
            document_id,
            fingerprint: fingerprint_a,
            creator: alice.clone(),
        }
    );
    assert_eq!(
        ledger_store
            .get_latest_hash(None, &document_id)
            .await
            .expect("pass"),
        fingerprint_a
    );
    let genesis_record = ledger_store
        .get_history_at(None, &document_id, 0)
        .await
        .expect("pass");
    assert_eq!(genesis_record.version_index, 0);
    assert_eq!(genesis_record.version_record.fingerprint, fingerprint_a);
    assert!(genesis_record.version_record.previous_fingerprint.is_zero());
    assert_eq!(genesis_record.version_record.recorded_by, alice);
}

async fn update_links_to_previous_head(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let bob = principal("0xB0B");
    let fingerprint_a = fingerprint_of("update_links A");
    let fingerprint_b = fingerprint_of("update_links B");
    let fingerprint_c = fingerprint_of("update_links C");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    let ledger_event = ledger_store
        .update_document(None, &document_id, &fingerprint_b, &bob)
        .await
        .expect("pass");
    assert_eq!(
        ledger_event,
        LedgerEvent::DocumentUpdated {
            document_id,
            new_fingerprint: fingerprint_b,
            previous_fingerprint: fingerprint_a,
        }
    );
    ledger_store
        .update_document_if_head(None, &document_id, &fingerprint_b, &fingerprint_c, &alice)
        .await
        .expect("pass");

    assert_eq!(
        ledger_store
            .get_latest_hash(None, &document_id)
            .await
            .expect("pass"),
        fingerprint_c
    );
    let history = ledger_store
        .get_history(None, &document_id)
        .await
        .expect("pass");
    assert_eq!(history.len(), 3);
    let fingerprint_v = history
        .iter()
        .map(|ledger_record| ledger_record.version_record.fingerprint)
        .collect::<Vec<_>>();
    assert_eq!(fingerprint_v, vec![fingerprint_a, fingerprint_b, fingerprint_c]);
    for (i, ledger_record) in history.iter().enumerate() {
        assert_eq!(ledger_record.version_index, i as u64);
        assert_eq!(ledger_record.document_id, document_id);
    }
    assert_eq!(history[1].version_record.previous_fingerprint, fingerprint_a);
    assert_eq!(history[1].version_record.recorded_by, bob);
    assert_eq!(history[2].version_record.previous_fingerprint, fingerprint_b);
    assert!(history[1].version_record.timestamp >= history[0].version_record.timestamp);
    assert!(history[2].version_record.timestamp >= history[1].version_record.timestamp);

    let middle_record = ledger_store
        .get_history_at(None, &document_id, 1)
        .await
        .expect("pass");
    assert_eq!(middle_record, history[1]);
    match ledger_store.get_history_at(None, &document_id, 3).await {
        Err(Error::VersionNotFound {
            document_id: d,
            version_index: 3,
        }) if d == document_id => {}
        other => panic!("expected VersionNotFound, got {:?}", other),
    }
}

async fn duplicate_create_leaves_head_unchanged(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("duplicate_create A");
    let fingerprint_b = fingerprint_of("duplicate_create B");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    ledger_store
        .update_document(None, &document_id, &fingerprint_b, &alice)
        .await
        .expect("pass");
    match ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
    {
        Err(Error::AlreadyExists(d)) if d == document_id => {}
        other => panic!("expected AlreadyExists, got {:?}", other),
    }
    assert_eq!(
        ledger_store
            .get_latest_hash(None, &document_id)
            .await
            .expect("pass"),
        fingerprint_b
    );
    assert_eq!(
        ledger_store
            .get_history(None, &document_id)
            .await
            .expect("pass")
            .len(),
        2
    );
}

async fn no_op_update_appends_nothing(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("no_op_update A");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    match ledger_store
        .update_document(None, &document_id, &fingerprint_a, &alice)
        .await
    {
        Err(Error::NoOpUpdate { fingerprint, .. }) if fingerprint == fingerprint_a => {}
        other => panic!("expected NoOpUpdate, got {:?}", other),
    }
    assert_eq!(
        ledger_store
            .get_history(None, &document_id)
            .await
            .expect("pass")
            .len(),
        1
    );
}

async fn absent_document_is_not_found(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let document_id =
        DocumentId::from_genesis_fingerprint(fingerprint_of("absent_document never created"));
    let fingerprint_b = fingerprint_of("absent_document B");

    assert!(matches!(
        ledger_store.get_latest_hash(None, &document_id).await,
        Err(Error::DocumentNotFound(_))
    ));
    assert!(matches!(
        ledger_store
            .update_document(None, &document_id, &fingerprint_b, &alice)
            .await,
        Err(Error::DocumentNotFound(_))
    ));
    assert!(matches!(
        ledger_store.get_history(None, &document_id).await,
        Err(Error::DocumentNotFound(_))
    ));
    assert!(matches!(
        ledger_store.get_history_at(None, &document_id, 0).await,
        Err(Error::DocumentNotFound(_))
    ));
    assert!(ledger_store
        .get_latest_record(None, &document_id)
        .await
        .expect("pass")
        .is_none());
    // The failed update must not have created the document as a side effect.
    assert!(matches!(
        ledger_store.get_latest_hash(None, &document_id).await,
        Err(Error::DocumentNotFound(_))
    ));
}

async fn revert_to_earlier_content_is_a_new_version(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("revert A");
    let fingerprint_b = fingerprint_of("revert B");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    ledger_store
        .update_document(None, &document_id, &fingerprint_b, &alice)
        .await
        .expect("pass");
    ledger_store
        .update_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    let history = ledger_store
        .get_history(None, &document_id)
        .await
        .expect("pass");
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].version_record.fingerprint, fingerprint_a);
    assert_eq!(history[2].version_record.previous_fingerprint, fingerprint_b);
}

async fn stale_expected_heads_see_head_changed(ledger_store: &LedgerStore) {
    const WRITER_COUNT: usize = 8;

    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("stale_expected_heads A");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);
    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");

    let new_fingerprint_v = (0..WRITER_COUNT)
        .map(|i| fingerprint_of(&format!("stale_expected_heads B{}", i)))
        .collect::<Vec<_>>();
    let result_v = futures::future::join_all(new_fingerprint_v.iter().map(|new_fingerprint| {
        ledger_store.update_document_if_head(
            None,
            &document_id,
            &fingerprint_a,
            new_fingerprint,
            &alice,
        )
    }))
    .await;

    let winner_v = result_v
        .iter()
        .zip(new_fingerprint_v.iter())
        .filter(|(result, _)| result.is_ok())
        .map(|(_, new_fingerprint)| *new_fingerprint)
        .collect::<Vec<_>>();
    assert_eq!(winner_v.len(), 1, "exactly one conditional update must succeed");
    for result in result_v.iter() {
        match result {
            Ok(_) => {}
            Err(Error::HeadChanged {
                expected, actual, ..
            }) => {
                assert_eq!(*expected, fingerprint_a);
                assert_eq!(*actual, winner_v[0]);
            }
            Err(err) => panic!("expected HeadChanged, got {:?}", err),
        }
    }
    assert_eq!(
        ledger_store
            .get_latest_hash(None, &document_id)
            .await
            .expect("pass"),
        winner_v[0]
    );
    assert_eq!(
        ledger_store
            .get_history(None, &document_id)
            .await
            .expect("pass")
            .len(),
        2
    );
}

async fn caller_supplied_transaction(ledger_store: &LedgerStore) {
    use storage_traits::StorageDynT;

    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("caller_supplied_transaction A");
    let fingerprint_b = fingerprint_of("caller_supplied_transaction B");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    let mut transaction_b = ledger_store.begin_transaction().await.expect("pass");
    ledger_store
        .create_document(
            Some(transaction_b.as_mut()),
            &document_id,
            &fingerprint_a,
            &alice,
        )
        .await
        .expect("pass");
    ledger_store
        .update_document(
            Some(transaction_b.as_mut()),
            &document_id,
            &fingerprint_b,
            &alice,
        )
        .await
        .expect("pass");
    assert_eq!(
        ledger_store
            .get_latest_hash(Some(transaction_b.as_mut()), &document_id)
            .await
            .expect("pass"),
        fingerprint_b
    );
    transaction_b.commit().await.expect("pass");

    assert_eq!(
        ledger_store
            .get_latest_hash(None, &document_id)
            .await
            .expect("pass"),
        fingerprint_b
    );
}

async fn find_records_with_fingerprint_across_documents(ledger_store: &LedgerStore) {
    let alice = principal("0xA11CE");
    let fingerprint_a = fingerprint_of("find_records A");
    let fingerprint_x = fingerprint_of("find_records X");
    let fingerprint_shared = fingerprint_of("find_records shared");
    let document_id_a = DocumentId::from_genesis_fingerprint(fingerprint_a);
    let document_id_x = DocumentId::from_genesis_fingerprint(fingerprint_x);

    for (document_id, fingerprint) in [(document_id_a, fingerprint_a), (document_id_x, fingerprint_x)]
    {
        ledger_store
            .create_document(None, &document_id, &fingerprint, &alice)
            .await
            .expect("pass");
        ledger_store
            .update_document(None, &document_id, &fingerprint_shared, &alice)
            .await
            .expect("pass");
    }
    let ledger_record_v = ledger_store
        .find_records_with_fingerprint(None, &fingerprint_shared)
        .await
        .expect("pass");
    assert_eq!(ledger_record_v.len(), 2);
    let mut document_id_v = ledger_record_v
        .iter()
        .map(|ledger_record| ledger_record.document_id)
        .collect::<Vec<_>>();
    document_id_v.sort();
    let mut expected_document_id_v = vec![document_id_a, document_id_x];
    expected_document_id_v.sort();
    assert_eq!(document_id_v, expected_document_id_v);
    assert!(ledger_record_v
        .iter()
        .all(|ledger_record| ledger_record.version_index == 1));
}
