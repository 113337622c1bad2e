use crate::domain::model::{
    AccessKey, AdminStats, BlockHeader, Conditions, Destination, Metadata, PaymailAddress,
    QueryParams, Transaction, Utxo, Xpub,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Administrative operations of a BUX server.
///
/// Every operation needs an admin key; implementations must fail with
/// [`BuxError::AdminKeyError`](crate::utils::error::BuxError::AdminKeyError)
/// before touching the network when none is configured.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn new_xpub(&self, raw_xpub: &str, metadata: Option<&Metadata>) -> Result<()>;

    async fn admin_get_status(&self) -> Result<bool>;
    async fn admin_get_stats(&self) -> Result<AdminStats>;

    async fn admin_get_access_keys(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<AccessKey>>;
    async fn admin_get_access_keys_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;

    async fn admin_get_block_headers(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<BlockHeader>>;
    async fn admin_get_block_headers_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;

    async fn admin_get_destinations(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Destination>>;
    async fn admin_get_destinations_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;

    /// `None` when the server answers with a `null` body.
    async fn admin_get_paymail(&self, address: &str) -> Result<Option<PaymailAddress>>;
    async fn admin_get_paymails(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<PaymailAddress>>;
    async fn admin_get_paymails_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;
    async fn admin_create_paymail(
        &self,
        xpub_id: &str,
        address: &str,
        public_name: &str,
        avatar: &str,
    ) -> Result<Option<PaymailAddress>>;
    async fn admin_delete_paymail(&self, address: &str) -> Result<Option<PaymailAddress>>;

    async fn admin_get_transactions(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Transaction>>;
    async fn admin_get_transactions_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;
    async fn admin_record_transaction(&self, hex: &str) -> Result<Transaction>;

    async fn admin_get_utxos(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Utxo>>;
    async fn admin_get_utxos_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;

    async fn admin_get_xpubs(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Xpub>>;
    async fn admin_get_xpubs_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64>;
}
