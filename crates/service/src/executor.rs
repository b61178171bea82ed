//! Deposit and withdrawal execution
//!
//! A request first goes to the interactive endpoint. A 404 there means the
//! anchor only speaks the legacy flow, so the same fields are sent exactly once
//! more to the legacy endpoint. Whichever response comes back last is
//! classified into instructions or KYC requirements.

use anchor_types::{
	AnchorError, AnchorResponse, AnchorResult, AuthToken, DepositRequest, DepositResult,
	KycInstructions, TransferRequest, TransferResult, TransferServerClient, WithdrawalRequest,
	WithdrawalResult,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Sends deposit and withdrawal requests to transfer servers
#[derive(Debug, Clone)]
pub struct TransferService {
	pub(crate) client: Arc<dyn TransferServerClient>,
	pub(crate) auth: Option<AuthToken>,
}

impl TransferService {
	pub fn new(client: Arc<dyn TransferServerClient>) -> Self {
		Self { client, auth: None }
	}

	pub fn with_auth(mut self, token: Option<AuthToken>) -> Self {
		self.auth = token;
		self
	}

	pub async fn deposit(&self, request: &DepositRequest) -> AnchorResult<DepositResult> {
		self.execute(request).await
	}

	pub async fn withdraw(&self, request: &WithdrawalRequest) -> AnchorResult<WithdrawalResult> {
		self.execute(request).await
	}

	async fn execute<T>(&self, request: &dyn TransferRequest) -> AnchorResult<TransferResult<T>>
	where
		T: DeserializeOwned,
	{
		let server = request.server();
		let direction = request.direction();
		let fields = request.fields();
		let auth = self.auth.as_ref();

		info!(
			"Requesting {} of {} from {}",
			direction,
			request.asset(),
			server.domain()
		);

		let response = self
			.client
			.post_form(server, direction.interactive_path(), &fields, auth)
			.await?;

		let response = if response.status == 404 {
			debug!(
				"{} has no interactive {} endpoint, falling back to the legacy flow",
				server.domain(),
				direction
			);
			self.client
				.get(server, direction.legacy_path(), &fields, auth)
				.await?
		} else {
			response
		};

		classify_response(server.domain(), response)
	}
}

/// Map a final transfer server response onto the result union
///
/// | status    | outcome                                         |
/// |-----------|-------------------------------------------------|
/// | 200, 201  | instructions, or interactive KYC for a hosted flow |
/// | 403       | KYC, by body `type`                             |
/// | other     | [`AnchorError::AnchorResponse`]                 |
pub fn classify_response<T>(domain: &str, response: AnchorResponse) -> AnchorResult<TransferResult<T>>
where
	T: DeserializeOwned,
{
	match response.status {
		200 | 201 => {
			if KycInstructions::is_interactive_body(response.body.as_ref()) {
				return Ok(TransferResult::Kyc(KycInstructions::classify(
					domain,
					response.body.as_ref(),
				)?));
			}

			let body = response.body.ok_or_else(|| AnchorError::AnchorResponse {
				domain: domain.to_string(),
				status: response.status,
				message: "success response carried no JSON body".to_string(),
			})?;

			let instructions =
				serde_json::from_value(body).map_err(|e| AnchorError::AnchorResponse {
					domain: domain.to_string(),
					status: response.status,
					message: format!("malformed instructions: {}", e),
				})?;

			Ok(TransferResult::Success(instructions))
		},
		403 => {
			let kyc = KycInstructions::classify(domain, response.body.as_ref())?;
			debug!("{} requires {} KYC", domain, kyc.subtype());
			Ok(TransferResult::Kyc(kyc))
		},
		status => Err(AnchorError::anchor_response(
			domain,
			status,
			response.body.as_ref(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anchor_types::test_utils::{MockMethod, MockTransferClient};
	use anchor_types::{
		Asset, DepositInstructions, DepositType, KycStatusValue, KycSubtype, Memo, RequestFields,
		TransferOptions, TransferServer, WithdrawalInstructions,
	};
	use serde_json::json;

	const INTERACTIVE_DEPOSIT: &str = "transactions/deposit/interactive";
	const INTERACTIVE_WITHDRAW: &str = "transactions/withdraw/interactive";

	fn server() -> Arc<TransferServer> {
		Arc::new(
			TransferServer::new(
				"https://anchor.example.com/sep6",
				"anchor.example.com",
				TransferOptions::new().with_lang("en"),
			)
			.unwrap(),
		)
	}

	fn deposit_request() -> DepositRequest {
		DepositRequest::new(
			server(),
			Asset::issued("USD", "GISSUER"),
			"GACCOUNT",
			RequestFields::new(),
		)
		.unwrap()
	}

	fn withdrawal_request() -> WithdrawalRequest {
		WithdrawalRequest::new(server(), Asset::issued("USD", "GISSUER"), RequestFields::new())
			.unwrap()
			.with_account("GACCOUNT")
	}

	fn service(client: &MockTransferClient) -> TransferService {
		TransferService::new(Arc::new(client.clone()))
	}

	#[tokio::test]
	async fn test_interactive_success_returns_instructions() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			200,
			Some(json!({ "how": "GDEPOSITADDRESS", "fee_fixed": 0.1 })),
		);

		let result = service(&client).deposit(&deposit_request()).await.unwrap();

		let instructions: &DepositInstructions = result.success().unwrap();
		assert_eq!(instructions.how, "GDEPOSITADDRESS");
		assert_eq!(client.requests().len(), 1);
	}

	#[tokio::test]
	async fn test_404_falls_back_to_legacy_exactly_once_with_same_fields() {
		let client = MockTransferClient::new()
			.respond(MockMethod::Post, INTERACTIVE_DEPOSIT, 404, None)
			.respond(
				MockMethod::Get,
				"deposit",
				200,
				Some(json!({ "how": "wire to IBAN" })),
			);

		let request = deposit_request().with_type(DepositType::Sepa);
		let result = service(&client).deposit(&request).await.unwrap();

		assert!(result.is_success());
		let requests = client.requests();
		assert_eq!(requests.len(), 2);
		assert_eq!(requests[0].method, MockMethod::Post);
		assert_eq!(requests[1].method, MockMethod::Get);
		assert_eq!(requests[1].path, "deposit");
		assert_eq!(requests[0].fields, requests[1].fields);
		assert_eq!(requests[1].fields.get("asset_code").map(String::as_str), Some("USD"));
	}

	#[tokio::test]
	async fn test_legacy_404_is_an_anchor_response_error() {
		let client = MockTransferClient::new();

		let err = service(&client).deposit(&deposit_request()).await.unwrap_err();

		assert_eq!(err.status_code(), Some(404));
		assert_eq!(client.requests().len(), 2);
	}

	#[tokio::test]
	async fn test_legacy_403_is_classified_like_interactive() {
		let client = MockTransferClient::new()
			.respond(MockMethod::Post, INTERACTIVE_WITHDRAW, 404, None)
			.respond(
				MockMethod::Get,
				"withdraw",
				403,
				Some(json!({
					"type": "non_interactive_customer_info_needed",
					"fields": ["first_name", "last_name"]
				})),
			);

		let result = service(&client)
			.withdraw(&withdrawal_request())
			.await
			.unwrap();

		assert_eq!(result.kyc_subtype(), Some(KycSubtype::NonInteractive));
	}

	#[tokio::test]
	async fn test_403_interactive_kyc() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			403,
			Some(json!({
				"type": "interactive_customer_info_needed",
				"url": "https://anchor.example.com/kyc",
				"id": "kyc-1"
			})),
		);

		let result = service(&client).deposit(&deposit_request()).await.unwrap();

		match result {
			TransferResult::Kyc(KycInstructions::Interactive(kyc)) => {
				assert_eq!(kyc.url, "https://anchor.example.com/kyc");
			},
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_403_status_kyc() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			403,
			Some(json!({ "type": "customer_info_status", "status": "pending" })),
		);

		let result = service(&client).deposit(&deposit_request()).await.unwrap();

		match result {
			TransferResult::Kyc(KycInstructions::Status(status)) => {
				assert_eq!(status.status, KycStatusValue::Pending);
			},
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_403_unknown_type_is_kyc_format_error() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			403,
			Some(json!({ "type": "something_else" })),
		);

		let err = service(&client).deposit(&deposit_request()).await.unwrap_err();

		assert!(
			matches!(err, AnchorError::KycFormat { ref domain } if domain == "anchor.example.com")
		);
	}

	#[tokio::test]
	async fn test_hosted_flow_201_is_interactive_kyc() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_WITHDRAW,
			201,
			Some(json!({
				"type": "interactive_customer_info_needed",
				"url": "https://anchor.example.com/flow",
				"id": "tx-9"
			})),
		);

		let result = service(&client)
			.withdraw(&withdrawal_request())
			.await
			.unwrap();

		assert_eq!(result.kyc_subtype(), Some(KycSubtype::Interactive));
	}

	#[tokio::test]
	async fn test_other_status_surfaces_anchor_message() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			400,
			Some(json!({ "error": "unsupported asset" })),
		);

		let err = service(&client).deposit(&deposit_request()).await.unwrap_err();

		match err {
			AnchorError::AnchorResponse {
				domain,
				status,
				message,
			} => {
				assert_eq!(domain, "anchor.example.com");
				assert_eq!(status, 400);
				assert_eq!(message, "unsupported asset");
			},
			other => panic!("unexpected error: {:?}", other),
		}
		assert_eq!(client.requests().len(), 1);
	}

	#[tokio::test]
	async fn test_success_without_body_or_with_bad_body_fails() {
		let no_body = MockTransferClient::new().respond(MockMethod::Post, INTERACTIVE_DEPOSIT, 200, None);
		assert!(matches!(
			service(&no_body).deposit(&deposit_request()).await,
			Err(AnchorError::AnchorResponse { status: 200, .. })
		));

		let bad_body = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_DEPOSIT,
			200,
			Some(json!({ "unexpected": true })),
		);
		assert!(service(&bad_body).deposit(&deposit_request()).await.is_err());
	}

	#[tokio::test]
	async fn test_withdrawal_instructions_derive_payment() {
		let client = MockTransferClient::new().respond(
			MockMethod::Post,
			INTERACTIVE_WITHDRAW,
			200,
			Some(json!({
				"account_id": "GANCHORDESTINATION",
				"memo_type": "id",
				"memo": "42"
			})),
		);

		let request = withdrawal_request();
		let result = service(&client).withdraw(&request).await.unwrap();
		let instructions: WithdrawalInstructions = result.into_success().unwrap();
		let payment = instructions
			.payment_operation(request.asset(), "100.5")
			.unwrap();

		assert_eq!(payment.destination, "GANCHORDESTINATION");
		assert_eq!(payment.memo, Some(Memo::Id(42)));
	}

	#[tokio::test]
	async fn test_bearer_token_is_sent_on_both_attempts() {
		let client = MockTransferClient::new()
			.respond(MockMethod::Post, INTERACTIVE_DEPOSIT, 404, None)
			.respond(MockMethod::Get, "deposit", 200, Some(json!({ "how": "cash" })));

		service(&client)
			.with_auth(Some(AuthToken::new("jwt")))
			.deposit(&deposit_request())
			.await
			.unwrap();

		assert!(client
			.requests()
			.iter()
			.all(|request| request.authorization.as_deref() == Some("Bearer jwt")));
	}
}
