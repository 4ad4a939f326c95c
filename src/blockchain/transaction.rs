//! Transaction assembly, signing, and broadcast.
//!
//! # Responsibilities
//! - Collect operations and the authorities they require
//! - Reference the current head block (TaPoS) and set expiration
//! - Delegate signing to the external signer
//! - Broadcast unless running dry
//!
//! # Design Decisions
//! - Node failures during broadcast follow the client's failover policy
//! - A transaction the network rejects is returned as an error, never resubmitted

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::operation::{Operation, RequiredAuthority};
use crate::blockchain::signer::Signer;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::metrics;
use crate::rpc::{LogicalMethod, RpcClient, RpcError};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// An ordered, atomically applied bundle of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    /// UTC time, `%Y-%m-%dT%H:%M:%S`.
    pub expiration: String,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub extensions: Vec<Value>,
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl Transaction {
    /// Operations with the given name, in order.
    pub fn operations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Operation> + 'a {
        self.operations.iter().filter(move |op| op.name() == name)
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// Head block reference taken from dynamic global properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaposRef {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub head_time: NaiveDateTime,
}

impl TaposRef {
    pub fn from_global_properties(props: &Value) -> BlockchainResult<Self> {
        let head_block_number = props
            .get("head_block_number")
            .and_then(Value::as_u64)
            .ok_or_else(|| invalid_props("missing head_block_number"))?;

        let head_block_id = props
            .get("head_block_id")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_props("missing head_block_id"))?;
        let id_bytes = hex::decode(head_block_id)
            .map_err(|e| invalid_props(&format!("head_block_id is not hex: {}", e)))?;
        if id_bytes.len() < 8 {
            return Err(invalid_props("head_block_id shorter than 8 bytes"));
        }
        let ref_block_prefix =
            u32::from_le_bytes([id_bytes[4], id_bytes[5], id_bytes[6], id_bytes[7]]);

        let time = props
            .get("time")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_props("missing time"))?;
        let head_time = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|e| invalid_props(&format!("bad time '{}': {}", time, e)))?;

        Ok(Self {
            ref_block_num: (head_block_number & 0xffff) as u16,
            ref_block_prefix,
            head_time,
        })
    }

    /// Expiration timestamp `window` after the head block time.
    pub fn expiration(&self, window: Duration) -> String {
        let expires = self.head_time + chrono::Duration::seconds(window.as_secs() as i64);
        expires.format(TIME_FORMAT).to_string()
    }
}

fn invalid_props(reason: &str) -> BlockchainError {
    BlockchainError::InvalidGlobalProperties(reason.to_string())
}

/// Transaction builder bound to one client.
pub struct TransactionBuilder<'a> {
    client: &'a RpcClient,
    operations: Vec<Operation>,
    authorities: Vec<RequiredAuthority>,
    dry_run: bool,
}

impl<'a> TransactionBuilder<'a> {
    /// Create a builder. Dry-run defaults to the client's `nobroadcast` setting.
    pub fn new(client: &'a RpcClient) -> Self {
        Self {
            client,
            operations: Vec::new(),
            authorities: Vec::new(),
            dry_run: client.nobroadcast(),
        }
    }

    /// Override whether the transaction is submitted.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Append an operation signed by the account it names.
    pub fn append_op(&mut self, op: Operation) -> BlockchainResult<()> {
        let authority = op
            .required_authority()
            .ok_or(BlockchainError::NoAuthority(op.name()))?;
        self.append_op_as(op, authority);
        Ok(())
    }

    /// Append an operation signed by an explicitly chosen authority.
    pub fn append_op_as(&mut self, op: Operation, authority: RequiredAuthority) {
        if !self.authorities.contains(&authority) {
            self.authorities.push(authority);
        }
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn required_authorities(&self) -> &[RequiredAuthority] {
        &self.authorities
    }

    /// Assemble, sign, and (unless dry-run) broadcast.
    ///
    /// Returns the signed transaction either way.
    pub async fn build_and_broadcast(self, signer: &dyn Signer) -> BlockchainResult<Transaction> {
        if self.operations.is_empty() {
            return Err(BlockchainError::EmptyTransaction);
        }

        for authority in &self.authorities {
            if !signer.has_key(&authority.account, authority.level) {
                return Err(BlockchainError::MissingKey {
                    account: authority.account.clone(),
                    level: authority.level,
                });
            }
        }

        let props = self
            .client
            .call(&LogicalMethod::GetDynamicGlobalProperties)
            .await?;
        let tapos = TaposRef::from_global_properties(&props)?;

        let unsigned = Transaction {
            ref_block_num: tapos.ref_block_num,
            ref_block_prefix: tapos.ref_block_prefix,
            expiration: tapos.expiration(self.client.expiration()),
            operations: self.operations,
            extensions: Vec::new(),
            signatures: Vec::new(),
        };
        let signed = signer
            .sign(unsigned, &self.authorities)
            .await
            .map_err(|e| BlockchainError::Signer(e.to_string()))?;

        let metrics_enabled = self.client.settings().metrics_enabled;
        let op_names: Vec<&str> = signed.operations.iter().map(Operation::name).collect();

        if self.dry_run {
            tracing::debug!(operations = ?op_names, "Dry run, transaction not broadcast");
            if metrics_enabled {
                metrics::record_broadcast("dry_run");
            }
            return Ok(signed);
        }

        let trx = serde_json::to_value(&signed).map_err(|e| BlockchainError::Encode(e.to_string()))?;
        match self.client.call(&LogicalMethod::BroadcastTransaction { trx }).await {
            Ok(_) => {
                tracing::info!(
                    operations = ?op_names,
                    expiration = %signed.expiration,
                    "Transaction broadcast"
                );
                if metrics_enabled {
                    metrics::record_broadcast("accepted");
                }
                Ok(signed)
            }
            Err(RpcError::Remote { code, message }) => {
                tracing::warn!(
                    operations = ?op_names,
                    code,
                    message = %message,
                    "Transaction rejected"
                );
                if metrics_enabled {
                    metrics::record_broadcast("rejected");
                }
                Err(BlockchainError::BroadcastRejected { code, message })
            }
            Err(e) => {
                if metrics_enabled {
                    metrics::record_broadcast("failed");
                }
                Err(e.into())
            }
        }
    }
}
