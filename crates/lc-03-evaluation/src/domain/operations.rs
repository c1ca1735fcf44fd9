//! # Operations
//!
//! The closed catalog of state-changing actions this engine evaluates, their
//! fee descriptors, stateless validation and required authorities.
//!
//! Every operation names a fee payer. Dispatch to evaluators is an exhaustive
//! `match` over [`Operation`]; adding a variant fails to compile until an
//! evaluator exists for it.

use super::errors::EvaluationError;
use super::proposal::ProposalId;
use lc_02_authority::{RequiredAuthorities, RequiresAuthority};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{
    AccountUid, Asset, AssetAid, Authority, AuthorityTier, Hash, PublicKey, ShareType, Signature,
    Timestamp,
};
use std::collections::BTreeSet;
use std::fmt;

/// Longest accepted poll title, in bytes.
pub const MAX_VOTE_TITLE_LENGTH: usize = 100;

/// Options are addressed by `u8` index.
pub const MAX_VOTE_OPTIONS: usize = 256;

// =============================================================================
// FEES
// =============================================================================

/// Explicit split of a fee across the payer's three pools.
///
/// A missing portion counts as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeOptions {
    pub from_balance: Option<Asset>,
    pub from_prepaid: Option<Asset>,
    pub from_csaf: Option<Asset>,
}

/// Fee descriptor carried by every operation.
///
/// Without `options` the whole `total` comes from the ordinary balance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub total: Asset,
    pub options: Option<FeeOptions>,
}

impl Fee {
    /// A fee paid entirely from the ordinary core balance.
    pub fn flat(amount: ShareType) -> Self {
        Self {
            total: Asset::core(amount),
            options: None,
        }
    }

    /// A core-asset fee split across balance, prepaid and csaf.
    ///
    /// A total that would overflow saturates at `ShareType::MAX`; validation
    /// then rejects the split.
    pub fn split(from_balance: ShareType, from_prepaid: ShareType, from_csaf: ShareType) -> Self {
        let portion = |amount: ShareType| (amount != 0).then(|| Asset::core(amount));
        let total = from_balance
            .checked_add(from_prepaid)
            .and_then(|sum| sum.checked_add(from_csaf))
            .unwrap_or(ShareType::MAX);
        Self {
            total: Asset::core(total),
            options: Some(FeeOptions {
                from_balance: portion(from_balance),
                from_prepaid: portion(from_prepaid),
                from_csaf: portion(from_csaf),
            }),
        }
    }

    fn validate(&self, kind: OperationKind) -> Result<(), EvaluationError> {
        if self.total.amount < 0 {
            return Err(EvaluationError::invalid(kind, "fee must not be negative"));
        }
        let Some(options) = &self.options else {
            return Ok(());
        };

        let mut sum: ShareType = 0;
        for portion in [&options.from_balance, &options.from_prepaid, &options.from_csaf]
            .into_iter()
            .flatten()
        {
            if portion.amount < 0 {
                return Err(EvaluationError::invalid(kind, "fee portion must not be negative"));
            }
            sum = sum
                .checked_add(portion.amount)
                .ok_or_else(|| EvaluationError::invalid(kind, "fee portions overflow"))?;
        }
        if sum != self.total.amount {
            return Err(EvaluationError::FeeSplitMismatch {
                total: self.total.amount,
                sum,
            });
        }
        Ok(())
    }
}

// =============================================================================
// OPERATION KINDS
// =============================================================================

/// Runtime tag of an [`Operation`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Transfer,
    ProposalCreate,
    ProposalUpdate,
    ProposalDelete,
    CustomVoteCreate,
    CustomVoteCast,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        Self::Transfer,
        Self::ProposalCreate,
        Self::ProposalUpdate,
        Self::ProposalDelete,
        Self::CustomVoteCreate,
        Self::CustomVoteCast,
    ];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transfer => "transfer",
            Self::ProposalCreate => "proposal_create",
            Self::ProposalUpdate => "proposal_update",
            Self::ProposalDelete => "proposal_delete",
            Self::CustomVoteCreate => "custom_vote_create",
            Self::CustomVoteCast => "custom_vote_cast",
        };
        f.write_str(name)
    }
}

/// Fields shared by every operation body.
pub trait BaseOperation {
    const KIND: OperationKind;

    fn fee(&self) -> &Fee;

    fn fee_payer_uid(&self) -> AccountUid;
}

// =============================================================================
// OPERATION BODIES
// =============================================================================

/// Move an amount of any asset between two accounts. `from` pays the fee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    pub fee: Fee,
    pub from: AccountUid,
    pub to: AccountUid,
    pub amount: Asset,
    pub memo: Option<String>,
}

/// Bundle operations into a proposal awaiting approvals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCreateOperation {
    pub fee: Fee,
    pub fee_paying_account: AccountUid,
    pub expiration_time: Timestamp,
    pub proposed_ops: Vec<Operation>,
}

/// Add or remove approvals on a pending proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalUpdateOperation {
    pub fee: Fee,
    pub fee_paying_account: AccountUid,
    pub proposal: ProposalId,
    pub secondary_approvals_to_add: BTreeSet<AccountUid>,
    pub secondary_approvals_to_remove: BTreeSet<AccountUid>,
    pub active_approvals_to_add: BTreeSet<AccountUid>,
    pub active_approvals_to_remove: BTreeSet<AccountUid>,
    pub owner_approvals_to_add: BTreeSet<AccountUid>,
    pub owner_approvals_to_remove: BTreeSet<AccountUid>,
    pub key_approvals_to_add: BTreeSet<PublicKey>,
    pub key_approvals_to_remove: BTreeSet<PublicKey>,
}

impl ProposalUpdateOperation {
    pub fn approvals_to_add(&self, tier: AuthorityTier) -> &BTreeSet<AccountUid> {
        match tier {
            AuthorityTier::Owner => &self.owner_approvals_to_add,
            AuthorityTier::Active => &self.active_approvals_to_add,
            AuthorityTier::Secondary => &self.secondary_approvals_to_add,
        }
    }

    pub fn approvals_to_remove(&self, tier: AuthorityTier) -> &BTreeSet<AccountUid> {
        match tier {
            AuthorityTier::Owner => &self.owner_approvals_to_remove,
            AuthorityTier::Active => &self.active_approvals_to_remove,
            AuthorityTier::Secondary => &self.secondary_approvals_to_remove,
        }
    }

    fn is_empty(&self) -> bool {
        AuthorityTier::ALL.iter().all(|tier| {
            self.approvals_to_add(*tier).is_empty() && self.approvals_to_remove(*tier).is_empty()
        }) && self.key_approvals_to_add.is_empty()
            && self.key_approvals_to_remove.is_empty()
    }
}

/// Withdraw a pending proposal. The payer must be one of its required
/// approvers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDeleteOperation {
    pub fee: Fee,
    pub fee_paying_account: AccountUid,
    pub using_owner_authority: bool,
    pub proposal: ProposalId,
}

/// Open a poll. `vid` must be the creator's next poll sequence number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoteCreateOperation {
    pub fee: Fee,
    pub creator: AccountUid,
    pub vid: u32,
    pub title: String,
    pub description: String,
    pub expired_time: Timestamp,
    pub asset_id: AssetAid,
    pub required_amount: ShareType,
    pub minimum_selected_items: u8,
    pub maximum_selected_items: u8,
    pub options: Vec<String>,
}

/// Cast a ballot on a poll. Selected options are option indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoteCastOperation {
    pub fee: Fee,
    pub voter: AccountUid,
    pub creator: AccountUid,
    pub vid: u32,
    pub selection: BTreeSet<u8>,
}

macro_rules! base_operation {
    ($ty:ty, $kind:ident, $payer:ident) => {
        impl BaseOperation for $ty {
            const KIND: OperationKind = OperationKind::$kind;

            fn fee(&self) -> &Fee {
                &self.fee
            }

            fn fee_payer_uid(&self) -> AccountUid {
                self.$payer
            }
        }
    };
}

base_operation!(TransferOperation, Transfer, from);
base_operation!(ProposalCreateOperation, ProposalCreate, fee_paying_account);
base_operation!(ProposalUpdateOperation, ProposalUpdate, fee_paying_account);
base_operation!(ProposalDeleteOperation, ProposalDelete, fee_paying_account);
base_operation!(CustomVoteCreateOperation, CustomVoteCreate, creator);
base_operation!(CustomVoteCastOperation, CustomVoteCast, voter);

// =============================================================================
// OPERATION
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Transfer(TransferOperation),
    ProposalCreate(ProposalCreateOperation),
    ProposalUpdate(ProposalUpdateOperation),
    ProposalDelete(ProposalDeleteOperation),
    CustomVoteCreate(CustomVoteCreateOperation),
    CustomVoteCast(CustomVoteCastOperation),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Transfer(_) => OperationKind::Transfer,
            Self::ProposalCreate(_) => OperationKind::ProposalCreate,
            Self::ProposalUpdate(_) => OperationKind::ProposalUpdate,
            Self::ProposalDelete(_) => OperationKind::ProposalDelete,
            Self::CustomVoteCreate(_) => OperationKind::CustomVoteCreate,
            Self::CustomVoteCast(_) => OperationKind::CustomVoteCast,
        }
    }

    pub fn fee(&self) -> &Fee {
        match self {
            Self::Transfer(op) => op.fee(),
            Self::ProposalCreate(op) => op.fee(),
            Self::ProposalUpdate(op) => op.fee(),
            Self::ProposalDelete(op) => op.fee(),
            Self::CustomVoteCreate(op) => op.fee(),
            Self::CustomVoteCast(op) => op.fee(),
        }
    }

    pub fn fee_payer_uid(&self) -> AccountUid {
        match self {
            Self::Transfer(op) => op.fee_payer_uid(),
            Self::ProposalCreate(op) => op.fee_payer_uid(),
            Self::ProposalUpdate(op) => op.fee_payer_uid(),
            Self::ProposalDelete(op) => op.fee_payer_uid(),
            Self::CustomVoteCreate(op) => op.fee_payer_uid(),
            Self::CustomVoteCast(op) => op.fee_payer_uid(),
        }
    }

    /// Size of the canonical `bincode` encoding, used for data fees.
    /// An operation that cannot be encoded prices itself out.
    pub fn serialized_size(&self) -> u64 {
        bincode::serialized_size(self).unwrap_or(u64::MAX)
    }

    /// How many proposal-create layers this operation nests.
    pub fn proposal_nesting_depth(&self) -> u8 {
        match self {
            Self::ProposalCreate(op) => op
                .proposed_ops
                .iter()
                .map(Operation::proposal_nesting_depth)
                .max()
                .unwrap_or(0)
                .saturating_add(1),
            _ => 0,
        }
    }

    /// Stateless checks: everything decidable without the ledger.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let kind = self.kind();
        self.fee().validate(kind)?;

        match self {
            Self::Transfer(op) => {
                if op.from == op.to {
                    return Err(EvaluationError::invalid(kind, "cannot transfer to self"));
                }
                if op.amount.amount <= 0 {
                    return Err(EvaluationError::invalid(kind, "amount must be positive"));
                }
            }
            Self::ProposalCreate(op) => {
                if op.proposed_ops.is_empty() {
                    return Err(EvaluationError::invalid(kind, "no proposed operations"));
                }
                for proposed in &op.proposed_ops {
                    proposed.validate()?;
                }
            }
            Self::ProposalUpdate(op) => {
                if op.is_empty() {
                    return Err(EvaluationError::invalid(kind, "nothing to update"));
                }
                let overlap = AuthorityTier::ALL.iter().any(|tier| {
                    !op.approvals_to_add(*tier)
                        .is_disjoint(op.approvals_to_remove(*tier))
                }) || !op
                    .key_approvals_to_add
                    .is_disjoint(&op.key_approvals_to_remove);
                if overlap {
                    return Err(EvaluationError::invalid(
                        kind,
                        "cannot add and remove approval at the same time",
                    ));
                }
            }
            Self::ProposalDelete(_) => {}
            Self::CustomVoteCreate(op) => validate_custom_vote_create(op)?,
            Self::CustomVoteCast(op) => {
                if op.selection.is_empty() {
                    return Err(EvaluationError::invalid(kind, "empty selection"));
                }
            }
        }
        Ok(())
    }
}

fn validate_custom_vote_create(op: &CustomVoteCreateOperation) -> Result<(), EvaluationError> {
    let kind = OperationKind::CustomVoteCreate;
    if op.title.is_empty() || op.title.len() > MAX_VOTE_TITLE_LENGTH {
        return Err(EvaluationError::invalid(
            kind,
            format!("title length must be 1..={MAX_VOTE_TITLE_LENGTH}"),
        ));
    }
    if op.options.is_empty() || op.options.len() > MAX_VOTE_OPTIONS {
        return Err(EvaluationError::invalid(
            kind,
            format!("option count must be 1..={MAX_VOTE_OPTIONS}"),
        ));
    }
    let min = usize::from(op.minimum_selected_items);
    let max = usize::from(op.maximum_selected_items);
    if min == 0 || min > max || max > op.options.len() {
        return Err(EvaluationError::invalid(
            kind,
            format!(
                "selection bounds {min}..={max} invalid for {} options",
                op.options.len()
            ),
        ));
    }
    if op.required_amount < 0 {
        return Err(EvaluationError::invalid(kind, "required amount must not be negative"));
    }
    Ok(())
}

impl RequiresAuthority for Operation {
    fn collect_required(&self, out: &mut RequiredAuthorities, enabled_hardfork: bool) {
        match self {
            Self::Transfer(op) => out.require(op.from, AuthorityTier::Active),
            Self::ProposalCreate(op) => out.require(op.fee_paying_account, AuthorityTier::Active),
            Self::ProposalUpdate(op) => {
                for tier in AuthorityTier::ALL {
                    for uid in op.approvals_to_add(tier).iter().chain(op.approvals_to_remove(tier)) {
                        out.require(*uid, tier);
                    }
                }
                // Every key being added or removed must sign.
                let keys: BTreeSet<&PublicKey> = op
                    .key_approvals_to_add
                    .iter()
                    .chain(&op.key_approvals_to_remove)
                    .collect();
                if !keys.is_empty() {
                    let threshold = u32::try_from(keys.len()).unwrap_or(u32::MAX);
                    let auth = keys
                        .into_iter()
                        .fold(Authority::default(), |auth, key| auth.with_key(*key, 1))
                        .with_threshold(threshold);
                    out.other.push(auth);
                }
                if enabled_hardfork {
                    out.require(op.fee_paying_account, AuthorityTier::Active);
                }
            }
            Self::ProposalDelete(op) => {
                let tier = if op.using_owner_authority {
                    AuthorityTier::Owner
                } else {
                    AuthorityTier::Active
                };
                out.require(op.fee_paying_account, tier);
            }
            Self::CustomVoteCreate(op) => out.require(op.creator, AuthorityTier::Active),
            Self::CustomVoteCast(op) => out.require(op.voter, AuthorityTier::Secondary),
        }
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// An ordered list of operations applied atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Head block time after which the transaction may no longer be applied.
    pub expiration: Timestamp,
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// SHA-256 over the `bincode` encoding; the message every signature covers.
    pub fn digest(&self) -> Result<Hash, EvaluationError> {
        let bytes = bincode::serialize(self).map_err(|e| EvaluationError::Codec {
            reason: e.to_string(),
        })?;
        Ok(Sha256::digest(&bytes).into())
    }
}

/// A transaction plus the signatures over its digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<(PublicKey, Signature)>,
}
