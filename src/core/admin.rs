use crate::core::fields::*;
use crate::core::transport::{marshal, process_metadata, TransportHttp};
use crate::domain::model::{
    AccessKey, AdminStats, BlockHeader, Conditions, Destination, Metadata, PaymailAddress,
    QueryParams, Transaction, Utxo, Xpub,
};
use crate::domain::ports::AdminApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;

impl TransportHttp {
    /// Alias for [`AdminApi::new_xpub`].
    pub async fn register_xpub(&self, raw_xpub: &str, metadata: Option<&Metadata>) -> Result<()> {
        self.new_xpub(raw_xpub, metadata).await
    }

    /// Search one admin model collection.
    pub async fn admin_get_models<T: DeserializeOwned + Debug>(
        &self,
        resource: AdminResource,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<T>> {
        let admin_key = self.admin_key()?;
        let path = resource.search_path();

        let body = marshal([
            (FIELD_CONDITIONS, serde_json::to_value(conditions)?),
            (FIELD_METADATA, serde_json::to_value(process_metadata(metadata))?),
            (FIELD_QUERY_PARAMS, serde_json::to_value(query_params)?),
        ]);

        // an empty result may come back as null
        let models: Option<Vec<T>> = self
            .do_http_request(Method::GET, &path, body, Some(admin_key), true)
            .await?;
        let models = models.unwrap_or_default();
        if self.debug {
            tracing::info!("{}: {:?}", path, models);
        }

        Ok(models)
    }

    /// Count one admin model collection.
    pub async fn admin_count(
        &self,
        resource: AdminResource,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        let admin_key = self.admin_key()?;
        let path = resource.count_path();

        let body = marshal([
            (FIELD_CONDITIONS, serde_json::to_value(conditions)?),
            (FIELD_METADATA, serde_json::to_value(process_metadata(metadata))?),
        ]);

        let count: i64 = self
            .do_http_request(Method::GET, &path, body, Some(admin_key), true)
            .await?;
        if self.debug {
            tracing::info!("{}: {}", path, count);
        }

        Ok(count)
    }

    async fn admin_paymail_request(
        &self,
        method: Method,
        path: &str,
        body: String,
    ) -> Result<Option<PaymailAddress>> {
        let admin_key = self.admin_key()?;

        let paymail: Option<PaymailAddress> = self
            .do_http_request(method, path, body, Some(admin_key), true)
            .await?;
        if self.debug {
            tracing::info!("{}: {:?}", path, paymail);
        }

        Ok(paymail)
    }
}

#[async_trait]
impl AdminApi for TransportHttp {
    async fn new_xpub(&self, raw_xpub: &str, metadata: Option<&Metadata>) -> Result<()> {
        // 註冊 xpub 必須以管理員金鑰簽署
        let admin_key = self.admin_key()?;

        let body = marshal([
            (FIELD_METADATA, serde_json::to_value(process_metadata(metadata))?),
            (FIELD_XPUB_KEY, Value::from(raw_xpub)),
        ]);

        let xpub: Xpub = self
            .do_http_request(Method::POST, PATH_XPUB, body, Some(admin_key), true)
            .await?;
        tracing::debug!("registered xpub {}", xpub.id);

        Ok(())
    }

    async fn admin_get_status(&self) -> Result<bool> {
        let admin_key = self.admin_key()?;

        let status: bool = self
            .do_http_request(
                Method::GET,
                PATH_ADMIN_STATUS,
                String::new(),
                Some(admin_key),
                true,
            )
            .await?;
        if self.debug {
            tracing::info!("admin status: {}", status);
        }

        Ok(status)
    }

    async fn admin_get_stats(&self) -> Result<AdminStats> {
        let admin_key = self.admin_key()?;

        let stats: AdminStats = self
            .do_http_request(
                Method::GET,
                PATH_ADMIN_STATS,
                String::new(),
                Some(admin_key),
                true,
            )
            .await?;
        if self.debug {
            tracing::info!("admin stats: {:?}", stats);
        }

        Ok(stats)
    }

    async fn admin_get_access_keys(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<AccessKey>> {
        self.admin_get_models(AdminResource::AccessKeys, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_access_keys_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::AccessKeys, conditions, metadata)
            .await
    }

    async fn admin_get_block_headers(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<BlockHeader>> {
        self.admin_get_models(AdminResource::BlockHeaders, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_block_headers_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::BlockHeaders, conditions, metadata)
            .await
    }

    async fn admin_get_destinations(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Destination>> {
        self.admin_get_models(AdminResource::Destinations, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_destinations_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::Destinations, conditions, metadata)
            .await
    }

    async fn admin_get_paymail(&self, address: &str) -> Result<Option<PaymailAddress>> {
        let body = marshal([(FIELD_ADDRESS, Value::from(address))]);
        self.admin_paymail_request(Method::GET, PATH_ADMIN_PAYMAIL_GET, body)
            .await
    }

    async fn admin_get_paymails(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<PaymailAddress>> {
        self.admin_get_models(AdminResource::Paymails, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_paymails_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::Paymails, conditions, metadata)
            .await
    }

    async fn admin_create_paymail(
        &self,
        xpub_id: &str,
        address: &str,
        public_name: &str,
        avatar: &str,
    ) -> Result<Option<PaymailAddress>> {
        let body = marshal([
            (FIELD_XPUB_ID, Value::from(xpub_id)),
            (FIELD_ADDRESS, Value::from(address)),
            (FIELD_PUBLIC_NAME, Value::from(public_name)),
            (FIELD_AVATAR, Value::from(avatar)),
        ]);
        self.admin_paymail_request(Method::POST, PATH_ADMIN_PAYMAIL_CREATE, body)
            .await
    }

    async fn admin_delete_paymail(&self, address: &str) -> Result<Option<PaymailAddress>> {
        let body = marshal([(FIELD_ADDRESS, Value::from(address))]);
        self.admin_paymail_request(Method::POST, PATH_ADMIN_PAYMAIL_DELETE, body)
            .await
    }

    async fn admin_get_transactions(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Transaction>> {
        self.admin_get_models(AdminResource::Transactions, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_transactions_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::Transactions, conditions, metadata)
            .await
    }

    async fn admin_record_transaction(&self, hex: &str) -> Result<Transaction> {
        let admin_key = self.admin_key()?;

        let body = marshal([(FIELD_HEX, Value::from(hex))]);

        // 只有在開啟 sign_request 時才完整簽署
        let transaction: Transaction = self
            .do_http_request(
                Method::POST,
                PATH_ADMIN_TRANSACTION_RECORD,
                body,
                Some(admin_key),
                self.sign_request,
            )
            .await?;
        if self.debug {
            tracing::info!("transaction: {}", transaction.id);
        }

        Ok(transaction)
    }

    async fn admin_get_utxos(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Utxo>> {
        self.admin_get_models(AdminResource::Utxos, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_utxos_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::Utxos, conditions, metadata)
            .await
    }

    async fn admin_get_xpubs(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
        query_params: Option<&QueryParams>,
    ) -> Result<Vec<Xpub>> {
        self.admin_get_models(AdminResource::Xpubs, conditions, metadata, query_params)
            .await
    }

    async fn admin_get_xpubs_count(
        &self,
        conditions: Option<&Conditions>,
        metadata: Option<&Metadata>,
    ) -> Result<i64> {
        self.admin_count(AdminResource::Xpubs, conditions, metadata)
            .await
    }
}
