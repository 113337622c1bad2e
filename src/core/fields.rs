// JSON body field names understood by the BUX server.
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_AVATAR: &str = "avatar";
pub const FIELD_CONDITIONS: &str = "conditions";
pub const FIELD_HEX: &str = "hex";
pub const FIELD_METADATA: &str = "metadata";
pub const FIELD_PUBLIC_NAME: &str = "public_name";
pub const FIELD_QUERY_PARAMS: &str = "query_params";
pub const FIELD_XPUB_ID: &str = "xpub_id";
pub const FIELD_XPUB_KEY: &str = "key";

// Endpoint paths, relative to the configured server URL.
pub const PATH_XPUB: &str = "/xpub";
pub const PATH_ADMIN_STATUS: &str = "/admin/status";
pub const PATH_ADMIN_STATS: &str = "/admin/stats";
pub const PATH_ADMIN_PAYMAIL_GET: &str = "/admin/paymail/get";
pub const PATH_ADMIN_PAYMAIL_CREATE: &str = "/admin/paymail/create";
pub const PATH_ADMIN_PAYMAIL_DELETE: &str = "/admin/paymail/delete";
pub const PATH_ADMIN_TRANSACTION_RECORD: &str = "/admin/transactions/record";

/// Searchable model collections under `/admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AdminResource {
    AccessKeys,
    BlockHeaders,
    Destinations,
    Paymails,
    Transactions,
    Utxos,
    Xpubs,
}

impl AdminResource {
    fn segment(&self) -> &'static str {
        match self {
            AdminResource::AccessKeys => "access-keys",
            AdminResource::BlockHeaders => "block-headers",
            AdminResource::Destinations => "destinations",
            AdminResource::Paymails => "paymails",
            AdminResource::Transactions => "transactions",
            AdminResource::Utxos => "utxos",
            AdminResource::Xpubs => "xpubs",
        }
    }

    pub fn search_path(&self) -> String {
        format!("/admin/{}/search", self.segment())
    }

    pub fn count_path(&self) -> String {
        format!("/admin/{}/count", self.segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(
            AdminResource::AccessKeys.search_path(),
            "/admin/access-keys/search"
        );
        assert_eq!(
            AdminResource::BlockHeaders.count_path(),
            "/admin/block-headers/count"
        );
        assert_eq!(AdminResource::Paymails.search_path(), "/admin/paymails/search");
        assert_eq!(AdminResource::Xpubs.count_path(), "/admin/xpubs/count");
    }
}
