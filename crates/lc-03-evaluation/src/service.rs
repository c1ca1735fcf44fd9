//! # Ledger Service
//!
//! The application service implementing [`LedgerApi`].
//!
//! ## Transaction Pipeline
//!
//! 1. Reject empty or expired transactions
//! 2. Stateless `validate()` of every operation
//! 3. Signature collection over the transaction digest
//! 4. Weighted authority verification (unused signatures rejected)
//! 5. Evaluate then apply every operation inside one undo session
//!
//! Any failure leaves the database exactly as it was.

use crate::database::Database;
use crate::domain::{
    AuthorizationStatus, EvaluationError, ProposalId, SignedTransaction,
};
use crate::evaluator::{apply_operations, clear_expired_proposals, OperationResult, TransactionContext};
use crate::ports::LedgerApi;
use lc_02_authority::{
    collect_signed_keys, verify_authority, Ed25519SignatureOracle, SignatureOracle, VerifyOptions,
};
use ledger_telemetry::log_trx_event;
use shared_types::{BlockNum, Timestamp};
use tracing::{debug, info};

pub struct LedgerService<O: SignatureOracle = Ed25519SignatureOracle> {
    db: Database,
    oracle: O,
}

impl LedgerService<Ed25519SignatureOracle> {
    /// Service verifying Ed25519 signatures.
    pub fn new(db: Database) -> Self {
        Self::with_oracle(db, Ed25519SignatureOracle)
    }
}

impl<O: SignatureOracle> LedgerService<O> {
    pub fn with_oracle(db: Database, oracle: O) -> Self {
        Self { db, oracle }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }
}

impl<O: SignatureOracle> LedgerApi for LedgerService<O> {
    fn apply_transaction(
        &mut self,
        trx: &SignedTransaction,
    ) -> Result<Vec<OperationResult>, EvaluationError> {
        let transaction = &trx.transaction;
        if transaction.operations.is_empty() {
            return Err(EvaluationError::EmptyTransaction);
        }
        let now = self.db.head_block_time();
        if transaction.expiration < now {
            return Err(EvaluationError::TransactionExpired {
                expiration: transaction.expiration,
                now,
            });
        }
        for op in &transaction.operations {
            op.validate()?;
        }

        let digest = transaction.digest()?;
        let signatures = collect_signed_keys(&self.oracle, &digest, &trx.signatures)?;
        let signed = verify_authority(
            transaction.operations.as_slice(),
            &signatures,
            &self.db,
            &Default::default(),
            VerifyOptions::for_transaction(
                self.db.enabled_hardfork(),
                self.db.params().max_authority_depth,
            ),
        )?;
        debug!(
            signers = signed.signatures.len(),
            approvals = signed.approved.len(),
            "transaction authorized"
        );

        let results = self.db.with_undo_session(|db| {
            let mut ctx = TransactionContext::new(db).with_signed(signed);
            apply_operations(&mut ctx, &transaction.operations)
        })?;

        log_trx_event!(
            info,
            "transaction applied",
            hex::encode(digest),
            ops = results.len(),
            head_block = self.db.head_block_num()
        );
        Ok(results)
    }

    fn advance_head_block(&mut self, num: BlockNum, time: Timestamp) -> Result<(), EvaluationError> {
        self.db.set_head_block(num, time);
        let settled = clear_expired_proposals(&mut self.db)?;
        if settled > 0 {
            info!(block = num, settled, "expired proposals settled");
        }
        Ok(())
    }

    fn proposal_status(&self, id: ProposalId) -> Result<AuthorizationStatus, EvaluationError> {
        let proposal = self.db.proposal(id)?;
        Ok(self.db.is_authorized_to_execute(proposal))
    }
}
