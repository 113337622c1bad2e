use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Free-form key/value metadata attached to BUX models.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Search conditions, passed through to the server's datastore untouched.
pub type Conditions = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub page_size: i32,
    #[serde(default)]
    pub order_by_field: String,
    #[serde(default)]
    pub sort_direction: String,
}

/// Fields every BUX model carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Xpub {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub current_balance: u64,
    pub next_internal_num: u32,
    pub next_external_num: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessKey {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub xpub_id: String,
    pub revoked_at: Option<DateTime<Utc>>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub height: u32,
    pub time: u32,
    pub nonce: u32,
    pub version: u32,
    pub hash_previous_block: String,
    pub hash_merkle_root: String,
    pub bits: String,
    pub synced: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub xpub_id: String,
    pub locking_script: String,
    #[serde(rename = "type")]
    pub destination_type: String,
    pub chain: u32,
    pub num: u32,
    pub address: String,
    pub draft_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymailAddress {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub xpub_id: String,
    pub alias: String,
    pub domain: String,
    pub public_name: String,
    pub avatar: String,
}

impl PaymailAddress {
    /// `alias@domain`
    pub fn address(&self) -> String {
        format!("{}@{}", self.alias, self.domain)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub hex: String,
    pub block_hash: String,
    pub block_height: u64,
    pub fee: u64,
    pub number_of_inputs: u32,
    pub number_of_outputs: u32,
    pub draft_id: String,
    pub total_value: u64,
    pub output_value: i64,
    pub status: String,
    pub direction: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Utxo {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    pub xpub_id: String,
    pub transaction_id: String,
    pub output_index: u32,
    pub satoshis: u64,
    pub script_pub_key: String,
    #[serde(rename = "type")]
    pub utxo_type: String,
    pub draft_id: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub spending_tx_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub balance: i64,
    pub destinations: i64,
    pub paymail_addresses: i64,
    pub transactions: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub transactions_per_day: HashMap<String, serde_json::Value>,
    pub utxos: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub utxos_per_type: HashMap<String, serde_json::Value>,
    pub xpubs: i64,
}

/// 伺服器以 `null` 表示空的 map
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
