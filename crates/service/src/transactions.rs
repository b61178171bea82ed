//! Transaction status pass-through

use anchor_types::transfers::transactions::{TransactionEnvelope, TransactionsEnvelope};
use anchor_types::{AnchorError, AnchorResponse, AnchorResult, RequestFields, TransferServer, TransferTransaction};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::executor::TransferService;

impl TransferService {
	/// `GET {base}/transaction?id=…`
	pub async fn fetch_transaction(
		&self,
		server: &TransferServer,
		id: &str,
	) -> AnchorResult<TransferTransaction> {
		let mut query = RequestFields::new();
		query.insert("id".to_string(), id.to_string());

		debug!("Fetching transaction {} from {}", id, server.domain());
		let response = self
			.client
			.get(server, "transaction", &query, self.auth.as_ref())
			.await?;

		let envelope: TransactionEnvelope = decode_ok(server, response)?;
		Ok(envelope.transaction)
	}

	/// `GET {base}/transactions?asset_code=…[&limit=…]`, newest first as the anchor returns them
	pub async fn fetch_transactions(
		&self,
		server: &TransferServer,
		asset_code: &str,
		limit: Option<u32>,
	) -> AnchorResult<Vec<TransferTransaction>> {
		let mut query = RequestFields::new();
		query.insert("asset_code".to_string(), asset_code.to_string());
		if let Some(limit) = limit {
			query.insert("limit".to_string(), limit.to_string());
		}

		debug!(
			"Fetching {} transactions from {}",
			asset_code,
			server.domain()
		);
		let response = self
			.client
			.get(server, "transactions", &query, self.auth.as_ref())
			.await?;

		let envelope: TransactionsEnvelope = decode_ok(server, response)?;
		Ok(envelope.transactions)
	}
}

fn decode_ok<T>(server: &TransferServer, response: AnchorResponse) -> AnchorResult<T>
where
	T: DeserializeOwned,
{
	if response.status != 200 {
		return Err(AnchorError::anchor_response(
			server.domain(),
			response.status,
			response.body.as_ref(),
		));
	}

	let body = response.body.ok_or_else(|| AnchorError::AnchorResponse {
		domain: server.domain().to_string(),
		status: response.status,
		message: "response carried no JSON body".to_string(),
	})?;

	serde_json::from_value(body).map_err(|e| AnchorError::AnchorResponse {
		domain: server.domain().to_string(),
		status: response.status,
		message: format!("malformed transaction document: {}", e),
	})
}
