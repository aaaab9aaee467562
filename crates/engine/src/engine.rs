//! The contract lifecycle engine.
//!
//! Owns the in-memory contract list and applies every mutation the same
//! way: build the next record, append one audit entry, bump `updated_at`,
//! persist the whole record, then reload the list from storage. Nothing in
//! the list changes unless the write succeeded.

use std::sync::Arc;

use vendorhub_core::audit::{self, actions, AuditLogEntry};
use vendorhub_core::contract::{
    derive_status, list_expiring, validate_contract, Contract, ContractPatch, ContractStatus,
    NewContract, SignatureParty, CONTRACT_ENTITY,
};
use vendorhub_core::dashboard::ContractSummary;
use vendorhub_core::error::CoreError;
use vendorhub_core::storage::{
    session_document_ref, ContractStore, DocumentStore, DocumentUpload, StoredDocument,
};
use vendorhub_core::types::{new_contract_id, Clock, SystemClock, Timestamp};
use vendorhub_events::{ContractEvent, ContractEventKind, ContractNotifier, NoopNotifier};

/// Contract lifecycle engine.
///
/// Not internally synchronized; share it behind a `tokio::sync::Mutex`
/// when several tasks need it.
pub struct ContractEngine {
    store: Arc<dyn ContractStore>,
    documents: Arc<dyn DocumentStore>,
    notifier: Arc<dyn ContractNotifier>,
    clock: Arc<dyn Clock>,
    contracts: Vec<Contract>,
}

impl ContractEngine {
    /// Engine with the wall clock and no notifications. Call
    /// [`reload`](Self::reload) before using it.
    pub fn new(store: Arc<dyn ContractStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            documents,
            notifier: Arc::new(NoopNotifier),
            clock: Arc::new(SystemClock),
            contracts: Vec::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ContractNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Replace the in-memory list with the stored records.
    pub async fn reload(&mut self) -> Result<(), CoreError> {
        let contracts = self.store.fetch_all().await?;
        tracing::debug!(count = contracts.len(), "Contracts loaded");
        self.contracts = contracts;
        Ok(())
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn get(&self, id: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    /// Active contracts ending within `within_days` days (exclusive of today).
    pub fn list_expiring(&self, within_days: i64, status: ContractStatus) -> Vec<Contract> {
        list_expiring(&self.contracts, within_days, status, self.clock.today())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> ContractSummary {
        ContractSummary::from_contracts(&self.contracts, self.clock.today())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validate, build, and persist a new contract.
    pub async fn create_contract(
        &mut self,
        mut input: NewContract,
        actor: &str,
    ) -> Result<Contract, CoreError> {
        let (contract_type, start_date, end_date) = input.validate()?;

        let document = match input.document.take() {
            Some(upload) => Some(self.upload_or_fallback(&upload).await.into()),
            None => None,
        };

        let now = self.clock.now();
        let mut contract = Contract {
            id: new_contract_id(),
            vendor_name: input.vendor_name,
            title: input.title,
            contract_type,
            value: input.value,
            start_date,
            end_date,
            status: input.status.unwrap_or_default(),
            scope: input.scope,
            milestones: input.milestones,
            payment_terms: input.payment_terms,
            company_signer: input.company_signer,
            vendor_signer: input.vendor_signer,
            company_signed: input.company_signed,
            vendor_signed: input.vendor_signed,
            document,
            audit_log: vec![AuditLogEntry::new(actions::CONTRACT_CREATED, actor, now)],
            created_at: now,
            updated_at: now,
        };
        contract.status = derive_status(&contract, self.clock.today());

        if let Err(e) = self.store.create(&contract).await {
            tracing::error!(contract_id = %contract.id, error = %e, "Failed to create contract");
            return Err(e);
        }
        tracing::info!(
            contract_id = %contract.id,
            vendor = %contract.vendor_name,
            status = %contract.status,
            actor,
            "Contract created"
        );

        self.refresh_after_write().await;
        self.dispatch(ContractEvent::from_contract(
            ContractEventKind::Created,
            &contract,
            actor,
            now,
        ));

        Ok(contract)
    }

    /// Merge `patch` onto the stored contract and persist it.
    pub async fn update_contract(
        &mut self,
        id: &str,
        mut patch: ContractPatch,
        actor: &str,
    ) -> Result<Contract, CoreError> {
        let mut contract = self.find(id)?.clone();

        let new_document = patch.document.take();
        patch.merge_into(&mut contract);
        validate_contract(&contract)?;

        if let Some(upload) = new_document {
            contract.document = Some(self.upload_or_fallback(&upload).await.into());
        }

        let entry = AuditLogEntry::new(actions::CONTRACT_UPDATED, actor, self.clock.now());
        self.stamp(&mut contract, entry);
        contract.status = derive_status(&contract, self.clock.today());

        self.persist(&contract).await?;
        tracing::info!(contract_id = %contract.id, status = %contract.status, actor, "Contract updated");
        Ok(contract)
    }

    /// Mark one party as having signed, then re-derive the status.
    ///
    /// Signing twice is allowed and still appends an audit entry.
    pub async fn record_signature(
        &mut self,
        id: &str,
        party: SignatureParty,
        actor: &str,
    ) -> Result<Contract, CoreError> {
        let mut contract = self.find(id)?.clone();
        let already_signed = contract.is_signed_by(party);

        match party {
            SignatureParty::Company => contract.company_signed = true,
            SignatureParty::Vendor => contract.vendor_signed = true,
        }

        let entry = AuditLogEntry::new(audit::signature_action(party), actor, self.clock.now());
        self.stamp(&mut contract, entry);
        contract.status = derive_status(&contract, self.clock.today());

        self.persist(&contract).await?;
        tracing::info!(
            contract_id = %contract.id,
            party = ?party,
            already_signed,
            status = %contract.status,
            actor,
            "Signature recorded"
        );
        Ok(contract)
    }

    /// Operator override. Any status may be set from any other; the status
    /// is not re-derived until the next signature event.
    pub async fn change_status(
        &mut self,
        id: &str,
        status: ContractStatus,
        actor: &str,
    ) -> Result<Contract, CoreError> {
        let mut contract = self.find(id)?.clone();
        let previous = contract.status;

        contract.status = status;
        let entry = AuditLogEntry::new(audit::status_change_action(status), actor, self.clock.now());
        self.stamp(&mut contract, entry);

        self.persist(&contract).await?;
        tracing::info!(
            contract_id = %contract.id,
            from = %previous,
            to = %status,
            actor,
            "Contract status changed"
        );
        Ok(contract)
    }

    /// "Move to Review" operator action.
    pub async fn move_to_review(&mut self, id: &str, actor: &str) -> Result<Contract, CoreError> {
        self.change_status(id, ContractStatus::UnderReview, actor).await
    }

    /// "Activate" operator action, only offered for signed contracts.
    pub async fn activate(&mut self, id: &str, actor: &str) -> Result<Contract, CoreError> {
        let current = self.find(id)?.status;
        if !current.can_activate() {
            return Err(CoreError::Validation(format!(
                "Only signed contracts can be activated (current status: {current})"
            )));
        }
        self.change_status(id, ContractStatus::Active, actor).await
    }

    /// Upload a document and record it on the contract.
    ///
    /// An upload failure does not fail the call: a session-only reference
    /// is recorded instead and returned with `persistent == false`.
    pub async fn attach_document(
        &mut self,
        id: &str,
        upload: DocumentUpload,
        actor: &str,
    ) -> Result<StoredDocument, CoreError> {
        let mut contract = self.find(id)?.clone();

        let stored = self.upload_or_fallback(&upload).await;
        contract.document = Some(stored.clone().into());

        let entry = AuditLogEntry::new(actions::DOCUMENT_ATTACHED, actor, self.clock.now())
            .with_meta(serde_json::json!({
                "file_name": stored.file_name,
                "persistent": stored.persistent,
            }));
        self.stamp(&mut contract, entry);

        self.persist(&contract).await?;
        tracing::info!(
            contract_id = %contract.id,
            file_name = %stored.file_name,
            persistent = stored.persistent,
            actor,
            "Document attached"
        );
        Ok(stored)
    }

    /// "Notify Client" operator action. Hands an event to the notifier and
    /// returns it; the contract itself is not modified. Notifier errors are
    /// logged only.
    pub fn notify_client(&self, id: &str, actor: &str) -> Result<ContractEvent, CoreError> {
        let contract = self.find(id)?;
        let event = ContractEvent::from_contract(
            ContractEventKind::ClientNotified,
            contract,
            actor,
            self.clock.now(),
        );
        tracing::info!(contract_id = %contract.id, actor, "Client notification requested");
        self.dispatch(event.clone());
        Ok(event)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn dispatch(&self, event: ContractEvent) {
        let contract_id = event.contract_id.clone();
        let event_type = event.kind.event_type();
        if let Err(e) = self.notifier.notify(event) {
            tracing::warn!(%contract_id, event_type, error = %e, "Contract notification failed");
        }
    }

    fn find(&self, id: &str) -> Result<&Contract, CoreError> {
        self.get(id).ok_or_else(|| CoreError::NotFound {
            entity: CONTRACT_ENTITY,
            id: id.to_string(),
        })
    }

    /// Append `entry` and move `updated_at` forward. `updated_at` never goes
    /// backwards even if the clock does.
    fn stamp(&self, contract: &mut Contract, entry: AuditLogEntry) {
        let updated_at: Timestamp = entry.timestamp.max(contract.updated_at);
        contract.audit_log.push(entry);
        contract.updated_at = updated_at;
    }

    async fn persist(&mut self, contract: &Contract) -> Result<(), CoreError> {
        if let Err(e) = self.store.update(contract).await {
            tracing::error!(contract_id = %contract.id, error = %e, "Failed to persist contract");
            return Err(e);
        }
        self.refresh_after_write().await;
        Ok(())
    }

    /// Reload after a successful write. A failed reload leaves the previous
    /// list in place; the write itself already succeeded.
    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::warn!(error = %e, "Failed to reload contracts after write");
        }
    }

    async fn upload_or_fallback(&self, upload: &DocumentUpload) -> StoredDocument {
        match self.documents.upload(upload).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    file_name = %upload.file_name,
                    error = %e,
                    "Document upload failed, using session-only reference"
                );
                session_document_ref(upload)
            }
        }
    }
}
