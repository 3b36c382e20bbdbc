//! The lifecycle state machine.

use std::marker::PhantomData;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use steward_id::{ExternalId, PassId};
use steward_managed::{
    Condition, LifecycleStatus, ManagedRecord, ManagedResource, TagDiff, TagSet,
};

use crate::client::{AdapterError, ExternalClient};
use crate::error::{ReconcileError, Result};
use crate::outcome::{Action, ReconcileOutcome};
use crate::store::RecordStore;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Requeue hint issued after a one-shot action such as renewal, so the
    /// trigger source re-checks sooner than its default cadence.
    pub requeue_after_one_shot: Duration,

    /// Requeue hint issued when an update was skipped because the provider
    /// reported the object mid-transition.
    pub requeue_while_transitional: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            requeue_after_one_shot: Duration::from_secs(30),
            requeue_while_transitional: Duration::from_secs(15),
        }
    }
}

/// Per-pass context propagated from the trigger source.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassContext {
    /// Deadline for the whole pass; every adapter call is guarded by it.
    pub deadline: Option<Instant>,
}

impl PassContext {
    /// A pass with no deadline.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A pass that must finish by the given instant.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// A pass that must finish within the given duration from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }
}

/// What one observation found.
enum ObservePass<O> {
    /// No external object. `had_identifier` distinguishes "never created"
    /// from "deleted out of band while we held an identifier".
    Absent { had_identifier: bool },

    /// The object exists; carries the snapshot used by the update branch.
    Present {
        id: ExternalId,
        observed: O,
        tags: TagSet,
        up_to_date: bool,
    },
}

/// The generic reconciliation engine for one resource kind.
///
/// Stateless and reentrant: the engine holds only the adapter, the record
/// store, and configuration, so distinct records can be reconciled
/// concurrently by the trigger source. Within a single pass every call is
/// sequential; the adapter holds no transactional guarantees and calls for
/// the same record must never interleave.
pub struct Reconciler<R, C, S>
where
    R: ManagedResource,
    C: ExternalClient<R>,
    S: RecordStore<R::Desired>,
{
    client: C,
    store: S,
    config: ReconcilerConfig,
    _resource: PhantomData<R>,
}

impl<R, C, S> Reconciler<R, C, S>
where
    R: ManagedResource,
    C: ExternalClient<R>,
    S: RecordStore<R::Desired>,
{
    /// Creates an engine with default configuration.
    pub fn new(client: C, store: S) -> Self {
        Self::with_config(client, store, ReconcilerConfig::default())
    }

    /// Creates an engine with explicit configuration.
    pub fn with_config(client: C, store: S, config: ReconcilerConfig) -> Self {
        Self {
            client,
            store,
            config,
            _resource: PhantomData,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// The adapter this engine drives.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The record store this engine writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one reconciliation pass: observe, then at most one of
    /// create/update/delete.
    ///
    /// On error the record's Synced condition is set from the failure, but
    /// nothing is rolled back; the next observation sees accurate drift and
    /// retries only the remaining work.
    #[instrument(skip_all, fields(kind = R::KIND, record_id = %record.id))]
    pub async fn reconcile(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        ctx: &PassContext,
    ) -> Result<ReconcileOutcome> {
        let pass = PassId::new();
        debug!(
            pass = %pass,
            deletion_requested = record.deletion_requested,
            "starting reconciliation pass"
        );

        let result = if record.deletion_requested {
            self.delete(record, ctx).await
        } else {
            self.converge(record, ctx).await
        };

        match &result {
            Ok(outcome) => info!(
                action = ?outcome.action,
                exists = outcome.exists,
                up_to_date = outcome.up_to_date,
                warnings = outcome.warnings.len(),
                "reconciliation pass complete"
            ),
            Err(e) => {
                warn!(error = %e, fatal = e.is_fatal(), "reconciliation pass failed");
                record.set_condition(Condition::reconcile_error(&e.to_string()));
            }
        }

        result
    }

    /// Observe, then branch into create, update, or nothing.
    async fn converge(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        ctx: &PassContext,
    ) -> Result<ReconcileOutcome> {
        match self.observe(record, ctx).await? {
            ObservePass::Absent {
                had_identifier: false,
            } => self.create(record, ctx).await,

            ObservePass::Absent {
                had_identifier: true,
            } => {
                // The identifier is set exactly once and never reassigned,
                // so the engine does not re-create here; the caller decides
                // whether to retire the record or replace it.
                warn!("external object deleted out of band");
                record.set_condition(Condition::unavailable("DeletedOutOfBand"));
                record.set_condition(Condition::reconcile_error("DeletedOutOfBand"));
                let mut outcome = ReconcileOutcome::new(Action::None, false, false);
                outcome
                    .warnings
                    .push("external object no longer exists; identifier retained".to_string());
                Ok(outcome)
            }

            ObservePass::Present {
                up_to_date: true, ..
            } => {
                record.set_condition(Condition::reconcile_success());
                Ok(ReconcileOutcome::new(Action::None, true, true))
            }

            ObservePass::Present {
                id,
                observed,
                tags,
                up_to_date: false,
            } => self.update(record, &id, &observed, &tags, ctx).await,
        }
    }

    /// Read-only look at the external object, plus late initialization and
    /// condition bookkeeping.
    async fn observe(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        ctx: &PassContext,
    ) -> Result<ObservePass<R::Observed>> {
        let Some(id) = record.external_id().cloned() else {
            debug!("no external identifier recorded");
            return Ok(ObservePass::Absent {
                had_identifier: false,
            });
        };

        let observed = match guard("describe", ctx, self.client.describe(&id)).await {
            Ok(observed) => observed,
            Err(e) if e.is_not_found() => {
                return Ok(ObservePass::Absent {
                    had_identifier: true,
                })
            }
            Err(e) => return Err(e),
        };

        // Fold provider defaults into unset desired fields before comparing,
        // otherwise defaulted fields read as drift on every pass.
        let before = record.spec.clone();
        R::late_initialize(&mut record.spec, &observed);
        if record.spec != before {
            debug!("late initialization changed the spec");
            self.store.persist(record).await?;
        }

        let status = R::lifecycle_status(&observed);
        record.last_status = status;
        record.set_condition(status.ready_condition());

        let tags = match guard("list_tags", ctx, self.client.list_tags(&id)).await {
            Ok(tags) => tags,
            Err(e) if e.is_not_found() => {
                return Ok(ObservePass::Absent {
                    had_identifier: true,
                })
            }
            Err(e) => return Err(e),
        };

        let up_to_date = R::is_up_to_date(&record.spec, &observed, &tags);
        debug!(status = %status, up_to_date, "observation complete");

        Ok(ObservePass::Present {
            id,
            observed,
            tags,
            up_to_date,
        })
    }

    /// Creates the external object and records its identifier exactly once.
    async fn create(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        ctx: &PassContext,
    ) -> Result<ReconcileOutcome> {
        record.set_condition(Condition::creating());

        // On any failure here no identifier has been recorded, so the next
        // pass simply retries the create.
        let id = guard("create", ctx, self.client.create(&record.spec)).await?;
        info!(external_id = %id, "external object created");

        record.record_external_id(id.clone())?;
        self.store.persist(record).await?;

        let mut outcome = ReconcileOutcome::new(Action::Created, true, false);

        // Dependent side effects are best effort: a failed grant never rolls
        // back the create.
        if R::grant_on_create(&record.spec) {
            if let Err(e) = guard("grant", ctx, self.client.grant(&id)).await {
                warn!(error = %e, "post-create grant failed");
                record.set_condition(Condition::reconcile_error("GrantFailed"));
                outcome
                    .warnings
                    .push(format!("post-create grant failed: {e}"));
            }
        }

        if outcome.is_clean() {
            record.set_condition(Condition::reconcile_success());
        }
        Ok(outcome)
    }

    /// Converges tags and modifiable fields, then runs any requested
    /// one-shot action.
    async fn update(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        id: &ExternalId,
        observed: &R::Observed,
        observed_tags: &TagSet,
        ctx: &PassContext,
    ) -> Result<ReconcileOutcome> {
        let status = R::lifecycle_status(observed);
        if status.is_transitional() {
            debug!(status = %status, "provider transition in flight, skipping update");
            let mut outcome = ReconcileOutcome::new(Action::None, true, false);
            outcome.requeue_after = Some(self.config.requeue_while_transitional);
            return Ok(outcome);
        }

        let desired_tags = R::desired_tags(&record.spec).clone();
        if !desired_tags.is_empty() {
            let diff = TagDiff::between(&desired_tags, observed_tags);
            // The adapter contract has no per-key deletion: shrinking the
            // set means bulk-removing everything observed, then re-adding
            // the full desired set.
            if !diff.to_remove.is_empty() {
                guard(
                    "remove_tags",
                    ctx,
                    self.client.remove_tags(id, &diff.to_remove),
                )
                .await?;
            }
            guard("add_tags", ctx, self.client.add_tags(id, &diff.to_add)).await?;
        }

        guard("modify", ctx, self.client.modify(id, &record.spec)).await?;

        let mut outcome = ReconcileOutcome::new(Action::Updated, true, false);

        if R::renewal_requested(&record.spec) {
            if R::renewal_eligible(observed) {
                let renewed = guard("renew", ctx, self.client.renew(id)).await;
                // Clear the request whatever happened, so the one-shot is
                // never retried indefinitely.
                R::clear_renewal_request(&mut record.spec);
                self.store.persist(record).await?;
                renewed?;
                info!("one-shot renewal issued");
                outcome.requeue_after = Some(self.config.requeue_after_one_shot);
            } else {
                debug!("renewal requested but object is ineligible");
                R::clear_renewal_request(&mut record.spec);
                self.store.persist(record).await?;
                record.set_condition(Condition::reconcile_error("RenewalIneligible"));
                outcome
                    .warnings
                    .push("renewal requested but the object is not eligible".to_string());
            }
        }

        if outcome.is_clean() {
            record.set_condition(Condition::reconcile_success());
        }
        Ok(outcome)
    }

    /// Destroys the external object, disabling it first when the kind
    /// requires it. Not-found anywhere in this path means "already gone"
    /// and counts as success.
    async fn delete(
        &self,
        record: &mut ManagedRecord<R::Desired>,
        ctx: &PassContext,
    ) -> Result<ReconcileOutcome> {
        record.set_condition(Condition::deleting());

        let Some(id) = record.external_id().cloned() else {
            // Never created, or a previous delete already finished.
            debug!("no external identifier recorded, delete is a no-op");
            record.last_status = LifecycleStatus::Deleted;
            return Ok(ReconcileOutcome::new(Action::Deleted, false, true));
        };

        let observed = match guard("describe", ctx, self.client.describe(&id)).await {
            Ok(observed) => Some(observed),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let Some(observed) = observed else {
            info!(external_id = %id, "external object already gone");
            return self.finish_delete(record).await;
        };

        if R::disable_before_destroy(&observed) {
            match guard("disable", ctx, self.client.disable(&id)).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => return self.finish_delete(record).await,
                Err(e) => return Err(e),
            }
        }

        match guard("destroy", ctx, self.client.destroy(&id)).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        info!(external_id = %id, "external object destroyed");
        self.finish_delete(record).await
    }

    /// Clears the identifier so repeated deletes are idempotent.
    async fn finish_delete(
        &self,
        record: &mut ManagedRecord<R::Desired>,
    ) -> Result<ReconcileOutcome> {
        record.clear_external_id();
        record.last_status = LifecycleStatus::Deleted;
        record.set_condition(Condition::unavailable("Deleted"));
        record.set_condition(Condition::reconcile_success());
        self.store.persist(record).await?;
        Ok(ReconcileOutcome::new(Action::Deleted, false, true))
    }
}

/// Runs one adapter call under the pass deadline, wrapping failures with
/// the operation name.
async fn guard<T, F>(op: &'static str, ctx: &PassContext, call: F) -> Result<T>
where
    F: std::future::Future<Output = std::result::Result<T, AdapterError>>,
{
    let result = match ctx.deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
            Ok(result) => result,
            Err(_) => return Err(ReconcileError::DeadlineExceeded { op }),
        },
        None => call.await,
    };
    result.map_err(|source| ReconcileError::Adapter { op, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciler_config_default() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.requeue_after_one_shot, Duration::from_secs(30));
        assert_eq!(config.requeue_while_transitional, Duration::from_secs(15));
    }

    #[test]
    fn test_pass_context_unbounded_has_no_deadline() {
        assert!(PassContext::unbounded().deadline.is_none());
    }

    #[tokio::test]
    async fn test_guard_wraps_operation_name() {
        let ctx = PassContext::unbounded();
        let result: Result<()> = guard("modify", &ctx, async {
            Err(AdapterError::throttled("slow down"))
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "modify call failed: slow down");
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_reports_deadline() {
        let ctx = PassContext::with_timeout(Duration::from_millis(10));
        let result: Result<()> = guard("create", &ctx, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            ReconcileError::DeadlineExceeded { op: "create" }
        ));
    }
}
