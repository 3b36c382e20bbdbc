//! Scripted test doubles for the engine.
//!
//! [`MockClient`] replays queued results per operation and records every
//! call it receives; [`MemoryStore`] is an in-memory record store with
//! one-shot failure injection. Both live in the library (not behind
//! `cfg(test)`) so downstream adapter crates can drive the engine against
//! them in their own tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use steward_id::{ExternalId, RecordId};
use steward_managed::{
    compare, late_init, LifecycleStatus, ManagedRecord, ManagedResource, TagSet,
};

use crate::client::{AdapterError, ExternalClient};
use crate::store::{RecordStore, StoreError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One recorded adapter call, with the arguments that matter for
/// assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Describe(ExternalId),
    Create,
    Modify(ExternalId),
    Destroy(ExternalId),
    ListTags(ExternalId),
    AddTags(ExternalId, TagSet),
    RemoveTags(ExternalId, TagSet),
    Renew(ExternalId),
    Disable(ExternalId),
    Grant(ExternalId),
}

impl MockCall {
    /// The operation name, for order-of-calls assertions that do not care
    /// about arguments.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            MockCall::Describe(_) => "describe",
            MockCall::Create => "create",
            MockCall::Modify(_) => "modify",
            MockCall::Destroy(_) => "destroy",
            MockCall::ListTags(_) => "list_tags",
            MockCall::AddTags(_, _) => "add_tags",
            MockCall::RemoveTags(_, _) => "remove_tags",
            MockCall::Renew(_) => "renew",
            MockCall::Disable(_) => "disable",
            MockCall::Grant(_) => "grant",
        }
    }
}

/// A scripted adapter: each operation pops the next queued result, or
/// fails with an "unscripted" remote error when the queue is empty.
pub struct MockClient<R: ManagedResource> {
    describe_results: Mutex<VecDeque<Result<R::Observed, AdapterError>>>,
    create_results: Mutex<VecDeque<Result<ExternalId, AdapterError>>>,
    list_tags_results: Mutex<VecDeque<Result<TagSet, AdapterError>>>,
    modify_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    destroy_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    add_tags_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    remove_tags_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    renew_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    disable_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    grant_results: Mutex<VecDeque<Result<(), AdapterError>>>,
    calls: Mutex<Vec<MockCall>>,
    delay: Option<Duration>,
}

impl<R: ManagedResource> Default for MockClient<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ManagedResource> MockClient<R> {
    pub fn new() -> Self {
        Self {
            describe_results: Mutex::new(VecDeque::new()),
            create_results: Mutex::new(VecDeque::new()),
            list_tags_results: Mutex::new(VecDeque::new()),
            modify_results: Mutex::new(VecDeque::new()),
            destroy_results: Mutex::new(VecDeque::new()),
            add_tags_results: Mutex::new(VecDeque::new()),
            remove_tags_results: Mutex::new(VecDeque::new()),
            renew_results: Mutex::new(VecDeque::new()),
            disable_results: Mutex::new(VecDeque::new()),
            grant_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Makes every operation sleep before answering, so deadline handling
    /// can be exercised deterministically under a paused tokio clock.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_describe(&self, result: Result<R::Observed, AdapterError>) {
        lock(&self.describe_results).push_back(result);
    }

    pub fn expect_create(&self, result: Result<ExternalId, AdapterError>) {
        lock(&self.create_results).push_back(result);
    }

    pub fn expect_list_tags(&self, result: Result<TagSet, AdapterError>) {
        lock(&self.list_tags_results).push_back(result);
    }

    pub fn expect_modify(&self, result: Result<(), AdapterError>) {
        lock(&self.modify_results).push_back(result);
    }

    pub fn expect_destroy(&self, result: Result<(), AdapterError>) {
        lock(&self.destroy_results).push_back(result);
    }

    pub fn expect_add_tags(&self, result: Result<(), AdapterError>) {
        lock(&self.add_tags_results).push_back(result);
    }

    pub fn expect_remove_tags(&self, result: Result<(), AdapterError>) {
        lock(&self.remove_tags_results).push_back(result);
    }

    pub fn expect_renew(&self, result: Result<(), AdapterError>) {
        lock(&self.renew_results).push_back(result);
    }

    pub fn expect_disable(&self, result: Result<(), AdapterError>) {
        lock(&self.disable_results).push_back(result);
    }

    pub fn expect_grant(&self, result: Result<(), AdapterError>) {
        lock(&self.grant_results).push_back(result);
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Operation names received so far, in order.
    #[must_use]
    pub fn call_ops(&self) -> Vec<&'static str> {
        lock(&self.calls).iter().map(MockCall::op).collect()
    }

    async fn answer<T>(
        &self,
        call: MockCall,
        queue: &Mutex<VecDeque<Result<T, AdapterError>>>,
    ) -> Result<T, AdapterError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let op = call.op();
        lock(&self.calls).push(call);
        lock(queue)
            .pop_front()
            .unwrap_or_else(|| Err(AdapterError::remote(format!("unscripted {op} call"))))
    }
}

#[async_trait]
impl<R: ManagedResource> ExternalClient<R> for MockClient<R> {
    async fn describe(&self, id: &ExternalId) -> Result<R::Observed, AdapterError> {
        self.answer(MockCall::Describe(id.clone()), &self.describe_results)
            .await
    }

    async fn create(&self, _desired: &R::Desired) -> Result<ExternalId, AdapterError> {
        self.answer(MockCall::Create, &self.create_results).await
    }

    async fn modify(&self, id: &ExternalId, _desired: &R::Desired) -> Result<(), AdapterError> {
        self.answer(MockCall::Modify(id.clone()), &self.modify_results)
            .await
    }

    async fn destroy(&self, id: &ExternalId) -> Result<(), AdapterError> {
        self.answer(MockCall::Destroy(id.clone()), &self.destroy_results)
            .await
    }

    async fn list_tags(&self, id: &ExternalId) -> Result<TagSet, AdapterError> {
        self.answer(MockCall::ListTags(id.clone()), &self.list_tags_results)
            .await
    }

    async fn add_tags(&self, id: &ExternalId, tags: &TagSet) -> Result<(), AdapterError> {
        self.answer(
            MockCall::AddTags(id.clone(), tags.clone()),
            &self.add_tags_results,
        )
        .await
    }

    async fn remove_tags(&self, id: &ExternalId, tags: &TagSet) -> Result<(), AdapterError> {
        self.answer(
            MockCall::RemoveTags(id.clone(), tags.clone()),
            &self.remove_tags_results,
        )
        .await
    }

    async fn renew(&self, id: &ExternalId) -> Result<(), AdapterError> {
        self.answer(MockCall::Renew(id.clone()), &self.renew_results)
            .await
    }

    async fn disable(&self, id: &ExternalId) -> Result<(), AdapterError> {
        self.answer(MockCall::Disable(id.clone()), &self.disable_results)
            .await
    }

    async fn grant(&self, id: &ExternalId) -> Result<(), AdapterError> {
        self.answer(MockCall::Grant(id.clone()), &self.grant_results)
            .await
    }
}

/// In-memory record store with one-shot failure injection.
pub struct MemoryStore<D> {
    records: Mutex<HashMap<RecordId, ManagedRecord<D>>>,
    fail_next_persist: Mutex<Option<StoreError>>,
}

impl<D: Clone> Default for MemoryStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> MemoryStore<D> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_next_persist: Mutex::new(None),
        }
    }

    /// Fails the next `persist` call with the given error.
    pub fn fail_next_persist(&self, err: StoreError) {
        *lock(&self.fail_next_persist) = Some(err);
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

#[async_trait]
impl<D: Clone + Send + Sync + 'static> RecordStore<D> for MemoryStore<D> {
    async fn persist(&self, record: &ManagedRecord<D>) -> Result<(), StoreError> {
        if let Some(err) = lock(&self.fail_next_persist).take() {
            return Err(err);
        }
        lock(&self.records).insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<ManagedRecord<D>>, StoreError> {
        Ok(lock(&self.records).get(&id).cloned())
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        lock(&self.records).remove(&id);
        Ok(())
    }
}

/// A private-certificate-authority-shaped sample kind that exercises every
/// capability hook. Used by the engine's own tests and usable as a template
/// for real adapter crates.
pub struct SigningAuthority;

/// Desired state for [`SigningAuthority`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SigningAuthoritySpec {
    pub common_name: String,
    /// Provider-defaulted when unset; filled by late initialization.
    pub key_algorithm: Option<String>,
    /// One-shot renewal request, cleared by the engine once acted on.
    pub renew_requested: bool,
    /// Issue a usage grant right after create.
    pub grant_issuance: bool,
    pub tags: TagSet,
}

/// Observed state for [`SigningAuthority`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SigningAuthorityState {
    pub status: String,
    pub key_algorithm: Option<String>,
    pub eligible_for_renewal: bool,
}

impl ManagedResource for SigningAuthority {
    const KIND: &'static str = "SigningAuthority";

    type Desired = SigningAuthoritySpec;
    type Observed = SigningAuthorityState;

    fn lifecycle_status(observed: &Self::Observed) -> LifecycleStatus {
        LifecycleStatus::from_provider(&observed.status)
    }

    fn is_up_to_date(
        desired: &Self::Desired,
        observed: &Self::Observed,
        observed_tags: &TagSet,
    ) -> bool {
        compare::str_eq_ci(
            desired.key_algorithm.as_deref(),
            observed.key_algorithm.as_deref(),
        ) && desired.tags.matches(observed_tags)
            && !desired.renew_requested
    }

    fn late_initialize(desired: &mut Self::Desired, observed: &Self::Observed) {
        late_init::late_init_string(
            &mut desired.key_algorithm,
            observed.key_algorithm.as_deref(),
        );
    }

    fn desired_tags(desired: &Self::Desired) -> &TagSet {
        &desired.tags
    }

    fn renewal_requested(desired: &Self::Desired) -> bool {
        desired.renew_requested
    }

    fn clear_renewal_request(desired: &mut Self::Desired) {
        desired.renew_requested = false;
    }

    fn renewal_eligible(observed: &Self::Observed) -> bool {
        observed.eligible_for_renewal
    }

    fn disable_before_destroy(observed: &Self::Observed) -> bool {
        // An authority that never issued a certificate can be destroyed
        // directly.
        observed.status != "PENDING_CERTIFICATE"
    }

    fn grant_on_create(desired: &Self::Desired) -> bool {
        desired.grant_issuance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ExternalId {
        ExternalId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_client_replays_scripted_results() {
        let client: MockClient<SigningAuthority> = MockClient::new();
        client.expect_describe(Ok(SigningAuthorityState {
            status: "ACTIVE".to_string(),
            ..Default::default()
        }));

        let observed = client.describe(&id("ca-1")).await.unwrap();
        assert_eq!(observed.status, "ACTIVE");
        assert_eq!(client.call_ops(), vec!["describe"]);
    }

    #[tokio::test]
    async fn test_mock_client_fails_unscripted_calls() {
        let client: MockClient<SigningAuthority> = MockClient::new();
        let err = client.destroy(&id("ca-1")).await.unwrap_err();
        assert!(err.to_string().contains("unscripted destroy"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store: MemoryStore<SigningAuthoritySpec> = MemoryStore::new();
        let record = ManagedRecord::new(RecordId::new(), SigningAuthoritySpec::default());
        store.persist(&record).await.unwrap();

        let loaded = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(loaded.spec, record.spec);

        store.delete(record.id).await.unwrap();
        assert!(store.get(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_injected_failure_is_one_shot() {
        let store: MemoryStore<SigningAuthoritySpec> = MemoryStore::new();
        store.fail_next_persist(StoreError::Conflict("stale sequence".to_string()));

        let record = ManagedRecord::new(RecordId::new(), SigningAuthoritySpec::default());
        assert!(store.persist(&record).await.is_err());
        assert!(store.persist(&record).await.is_ok());
    }

    #[test]
    fn test_sample_kind_up_to_date_ignores_unset_algorithm() {
        let desired = SigningAuthoritySpec {
            common_name: "internal root".to_string(),
            ..Default::default()
        };
        let observed = SigningAuthorityState {
            status: "ACTIVE".to_string(),
            key_algorithm: Some("RSA_2048".to_string()),
            ..Default::default()
        };
        assert!(SigningAuthority::is_up_to_date(
            &desired,
            &observed,
            &TagSet::new()
        ));
    }
}
