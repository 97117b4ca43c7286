//! # ISCNレジストリサービス
//!
//! 署名クライアントと照会クライアントを所有し、初回利用時に接続する。
//! 接続は `OnceCell` で直列化され、成功した接続だけがキャッシュされる。
//! 失敗した接続はキャッシュされず、次回の呼び出しで再試行される。

use iscn_types::{BroadcastTxSuccess, GasAndFee, IscnRecordsResponse, IscnSignResult, SignPayload};
use tokio::sync::OnceCell;

use crate::config::NetworkConfig;
use crate::error::{ClientError, LookupError};
use crate::query::{QueryClient, RestQueryClient};
use crate::signer::OfflineSigner;
use crate::signing::{RestSigningClient, SigningClient, TxOptions};

/// ISCNの登録・照会サービス。
pub struct IscnRegistry<S, Q> {
    config: NetworkConfig,
    signing: OnceCell<S>,
    query: OnceCell<Q>,
}

/// REST実装のクライアントを使うレジストリ。
pub type RestIscnRegistry = IscnRegistry<RestSigningClient, RestQueryClient>;

impl<S: SigningClient, Q: QueryClient> IscnRegistry<S, Q> {
    /// 未接続のレジストリを作る。
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            signing: OnceCell::new(),
            query: OnceCell::new(),
        }
    }

    /// 接続済みのクライアントを注入して作る。Noneのクライアントは初回利用時に接続する。
    pub fn with_clients(config: NetworkConfig, signing: Option<S>, query: Option<Q>) -> Self {
        Self {
            config,
            signing: OnceCell::new_with(signing),
            query: OnceCell::new_with(query),
        }
    }

    /// 接続に使うネットワーク設定。
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// 共有の署名クライアント。初回呼び出し時に接続する。
    pub async fn signing_client(&self) -> Result<&S, ClientError> {
        self.signing
            .get_or_try_init(|| async {
                tracing::debug!(rpc_url = %self.config.rpc_url, "署名クライアントを接続します");
                S::connect(&self.config).await
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "署名クライアントの接続に失敗しました"))
    }

    /// 共有の照会クライアント。初回呼び出し時に接続する。
    pub async fn query_client(&self) -> Result<&Q, ClientError> {
        self.query
            .get_or_try_init(|| Q::connect(&self.config))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "照会クライアントの接続に失敗しました"))
    }

    /// 登録トランザクションのガスとISCN登録手数料を見積もる。
    pub async fn estimate_iscn_tx_gas_and_fee(
        &self,
        payload: &SignPayload,
    ) -> Result<GasAndFee, ClientError> {
        self.signing_client()
            .await?
            .estimate_iscn_tx_gas_and_fee(payload)
            .await
    }

    /// 呼び出し側の署名者でISCNレコードを登録する。
    ///
    /// 署名者はこの呼び出しの間だけ使われ、共有クライアントには保持されない。
    pub async fn sign_iscn(
        &self,
        payload: &SignPayload,
        signer: &dyn OfflineSigner,
        address: &str,
    ) -> Result<BroadcastTxSuccess, ClientError> {
        let client = self.signing_client().await?;
        let options = TxOptions {
            memo: Some(self.config.memo.clone()),
            fee: None,
        };
        client
            .create_iscn_record(signer, address, payload, &options)
            .await
    }

    /// ISCNレコードを登録し、発行されたISCN IDを返す。
    pub async fn sign_iscn_tx(
        &self,
        payload: &SignPayload,
        signer: &dyn OfflineSigner,
        address: &str,
    ) -> Result<IscnSignResult, ClientError> {
        let res = self.sign_iscn(payload, signer, address).await?;
        let tx_hash = res.transaction_hash;

        let iscn_id = self
            .get_iscn_id(&tx_hash)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NoIscnId(tx_hash.clone()))?;

        tracing::info!(iscn_id = %iscn_id, tx_hash = %tx_hash, "ISCNレコードを登録しました");
        Ok(IscnSignResult { iscn_id, tx_hash })
    }

    /// ISCN IDでレコードを照会する。
    pub async fn search_iscn_by_id(
        &self,
        iscn_id: &str,
    ) -> Result<IscnRecordsResponse, LookupError> {
        let result = match self.query_client().await {
            Ok(client) => client.query_records_by_id(iscn_id).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            let err = LookupError::classify(e);
            tracing::info!(
                iscn_id = %iscn_id,
                code = err.sentinel_code(),
                error = %err,
                "ISCNレコードの照会に失敗しました"
            );
            err
        })
    }

    /// トランザクションで登録されたISCN IDを返す。
    pub async fn get_iscn_id(&self, tx_hash: &str) -> Result<Vec<String>, ClientError> {
        self.query_client().await?.query_iscn_ids_by_tx(tx_hash).await
    }
}
