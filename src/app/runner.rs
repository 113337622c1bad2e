use crate::config::cli::{parse_metadata, Command, PaymailCommand};
use crate::core::{AdminApi, AdminResource, TransportHttp};
use crate::domain::model::{
    AccessKey, BlockHeader, Conditions, Destination, Metadata, PaymailAddress, QueryParams,
    Transaction, Utxo, Xpub,
};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Run one CLI command against the server and return its result as JSON.
pub async fn run_command(transport: &TransportHttp, command: &Command) -> Result<Value> {
    tracing::debug!("running command: {:?}", command);

    let output = match command {
        Command::Status => Value::Bool(transport.admin_get_status().await?),
        Command::Stats => serde_json::to_value(transport.admin_get_stats().await?)?,
        Command::RegisterXpub { xpub, metadata } => {
            let metadata = parse_metadata(metadata.as_deref())?;
            transport.new_xpub(xpub, metadata.as_ref()).await?;
            tracing::info!("✅ xpub registered");
            serde_json::json!({ "registered": true })
        }
        Command::GetXpub => serde_json::to_value(transport.get_xpub().await?)?,
        Command::Search {
            resource,
            filter,
            page,
        } => {
            let conditions = filter.conditions()?;
            let metadata = filter.metadata()?;
            let params = page.query_params();
            search(
                transport,
                *resource,
                conditions.as_ref(),
                metadata.as_ref(),
                params.as_ref(),
            )
            .await?
        }
        Command::Count { resource, filter } => {
            let conditions = filter.conditions()?;
            let metadata = filter.metadata()?;
            let count = transport
                .admin_count(*resource, conditions.as_ref(), metadata.as_ref())
                .await?;
            Value::from(count)
        }
        Command::Paymail(PaymailCommand::Get { address }) => {
            serde_json::to_value(transport.admin_get_paymail(address).await?)?
        }
        Command::Paymail(PaymailCommand::Create {
            xpub_id,
            address,
            public_name,
            avatar,
        }) => serde_json::to_value(
            transport
                .admin_create_paymail(xpub_id, address, public_name, avatar)
                .await?,
        )?,
        Command::Paymail(PaymailCommand::Delete { address }) => {
            serde_json::to_value(transport.admin_delete_paymail(address).await?)?
        }
        Command::RecordTx { hex } => {
            serde_json::to_value(transport.admin_record_transaction(hex).await?)?
        }
    };

    Ok(output)
}

async fn search(
    transport: &TransportHttp,
    resource: AdminResource,
    conditions: Option<&Conditions>,
    metadata: Option<&Metadata>,
    params: Option<&QueryParams>,
) -> Result<Value> {
    match resource {
        AdminResource::AccessKeys => {
            search_as::<AccessKey>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::BlockHeaders => {
            search_as::<BlockHeader>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::Destinations => {
            search_as::<Destination>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::Paymails => {
            search_as::<PaymailAddress>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::Transactions => {
            search_as::<Transaction>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::Utxos => {
            search_as::<Utxo>(transport, resource, conditions, metadata, params).await
        }
        AdminResource::Xpubs => {
            search_as::<Xpub>(transport, resource, conditions, metadata, params).await
        }
    }
}

async fn search_as<T: DeserializeOwned + Serialize + std::fmt::Debug>(
    transport: &TransportHttp,
    resource: AdminResource,
    conditions: Option<&Conditions>,
    metadata: Option<&Metadata>,
    params: Option<&QueryParams>,
) -> Result<Value> {
    let models: Vec<T> = transport
        .admin_get_models(resource, conditions, metadata, params)
        .await?;
    Ok(serde_json::to_value(models)?)
}
