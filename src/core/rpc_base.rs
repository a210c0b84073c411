use serde::{Serialize, Deserialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use gloo_utils::format::JsValueSerdeExt;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;

// error type
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    ConnectionFailed(String),
    /// Program returned a custom error during preflight simulation
    InstructionError { code: u32, message: String },
    SolanaRpcError(String),
    Other(String),
}

// implement the display for the rpc error
impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RpcError::InstructionError { code, message } => {
                write!(f, "Program error 0x{:x}: {}", code, message)
            }
            RpcError::SolanaRpcError(msg) => write!(f, "Solana RPC error: {}", msg),
            RpcError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Commitment levels accepted by the RPC node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Commitment::Processed => 0,
            Commitment::Confirmed => 1,
            Commitment::Finalized => 2,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "processed" => Some(Commitment::Processed),
            "confirmed" => Some(Commitment::Confirmed),
            "finalized" => Some(Commitment::Finalized),
            _ => None,
        }
    }
}

/// One entry of a getSignatureStatuses response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

impl SignatureStatus {
    /// Whether the status has reached `commitment`.
    ///
    /// Nodes that omit `confirmationStatus` report `confirmations: null` once rooted.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        match self.confirmation_status.as_deref().and_then(Commitment::parse) {
            Some(reached) => reached.rank() >= commitment.rank(),
            None => match commitment {
                Commitment::Processed => true,
                Commitment::Confirmed => self.confirmations.map_or(true, |c| c > 0),
                Commitment::Finalized => self.confirmations.is_none(),
            },
        }
    }
}

pub struct RpcConnection {
    endpoint: String,
}

#[derive(Serialize)]
struct RpcRequest<T> {
    jsonrpc: String,
    id: u64,
    method: String,
    params: T,
}

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

impl RpcConnection {
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn send_request<T, R>(&self, method: &str, params: T) -> Result<R, RpcError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        };

        let request_body = serde_json::to_string(&request)
            .map_err(|e| {
                log::error!("Failed to serialize request: {}", e);
                RpcError::Other(e.to_string())
            })?;

        // Log request details for debugging (but limit size)
        if method == "sendTransaction" {
            log::debug!("RPC request body (first 200 chars): {}",
                       if request_body.len() > 200 { &request_body[..200] } else { &request_body });
        } else {
            log::debug!("RPC request body: {}", request_body);
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request_body));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts)
            .map_err(|e| {
                log::error!("Failed to create HTTP request: {:?}", e);
                RpcError::ConnectionFailed(format!("Failed to create request: {:?}", e))
            })?;

        request.headers().set("Content-Type", "application/json")
            .map_err(|e| {
                log::error!("Failed to set HTTP headers: {:?}", e);
                RpcError::ConnectionFailed(format!("Failed to set headers: {:?}", e))
            })?;

        let window = web_sys::window()
            .ok_or_else(|| RpcError::ConnectionFailed("No window object".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                log::error!("HTTP request failed: {:?}", e);
                RpcError::ConnectionFailed(format!("Failed to send request: {:?}", e))
            })?;

        let resp: Response = resp_value.dyn_into()
            .map_err(|e| {
                log::error!("Failed to convert response: {:?}", e);
                RpcError::Other(format!("Failed to convert response: {:?}", e))
            })?;

        if !resp.ok() {
            log::error!("HTTP error: status={}, status_text={}", resp.status(), resp.status_text());
            return Err(RpcError::ConnectionFailed(format!("HTTP {} {}", resp.status(), resp.status_text())));
        }

        let json = JsFuture::from(resp.json().map_err(|e| {
            log::error!("Failed to get JSON from response: {:?}", e);
            RpcError::Other(format!("Failed to get JSON: {:?}", e))
        })?)
            .await
            .map_err(|e| {
                log::error!("Failed to parse JSON: {:?}", e);
                RpcError::Other(format!("Failed to parse JSON: {:?}", e))
            })?;

        let value: serde_json::Value = json.into_serde()
            .map_err(|e| {
                log::error!("Failed to parse response as JSON Value: {:?}", e);
                RpcError::Other(format!("Failed to parse response as JSON: {:?}", e))
            })?;

        parse_rpc_response(method, value)
    }

    /// Balance of `pubkey` in lamports
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        let result: serde_json::Value = self.send_request("getBalance", vec![pubkey.to_string()]).await?;
        result["value"]
            .as_u64()
            .ok_or_else(|| RpcError::Other("Balance missing from response".to_string()))
    }

    /// Raw account data, `None` when the account does not exist
    pub async fn get_account_data(&self, pubkey: &Pubkey) -> Result<Option<Vec<u8>>, RpcError> {
        let params = serde_json::json!([pubkey.to_string(), {"encoding": "base64"}]);
        let result: serde_json::Value = self.send_request("getAccountInfo", params).await?;

        if result["value"].is_null() {
            return Ok(None);
        }

        let data = result["value"]["data"]
            .get(0)
            .and_then(|v| v.as_str())
            .ok_or_else(|| RpcError::Other("Account data missing from response".to_string()))?;

        base64::decode(data)
            .map(Some)
            .map_err(|e| RpcError::Other(format!("Failed to decode account data: {}", e)))
    }

    pub async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError> {
        self.send_request("getMinimumBalanceForRentExemption", vec![data_len]).await
    }

    /// Get the latest blockhash from the network
    pub async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let blockhash: serde_json::Value = self.send_request(
            "getLatestBlockhash",
            serde_json::json!([{
                "commitment": "confirmed",
                "minContextSlot": 0
            }])
        ).await?;

        let recent_blockhash = blockhash["value"]["blockhash"]
            .as_str()
            .ok_or_else(|| RpcError::Other("Failed to get blockhash".to_string()))?;

        Hash::from_str(recent_blockhash)
            .map_err(|e| RpcError::Other(format!("Invalid blockhash: {}", e)))
    }

    /// Submit an already signed, base64 encoded transaction
    pub async fn send_raw_transaction(
        &self,
        serialized_tx: &str,
        skip_preflight: bool,
        preflight_commitment: Commitment,
    ) -> Result<String, RpcError> {
        let params = serde_json::json!([
            serialized_tx,
            {
                "encoding": "base64",
                "preflightCommitment": preflight_commitment.as_str(),
                "skipPreflight": skip_preflight,
            }
        ]);

        log::info!("Sending signed transaction...");
        let signature: String = self.send_request("sendTransaction", params).await?;
        log::info!("Transaction sent: {}", signature);
        Ok(signature)
    }

    /// Current status of one signature, `None` while the node has not seen it
    pub async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, RpcError> {
        let params = serde_json::json!([[signature], {"searchTransactionHistory": false}]);
        let result: serde_json::Value = self.send_request("getSignatureStatuses", params).await?;

        match result["value"].get(0) {
            Some(entry) if !entry.is_null() => serde_json::from_value(entry.clone())
                .map(Some)
                .map_err(|e| RpcError::Other(format!("Failed to parse signature status: {}", e))),
            _ => Ok(None),
        }
    }
}

/// Split a JSON-RPC response into its result or a typed error
fn parse_rpc_response<R>(method: &str, value: serde_json::Value) -> Result<R, RpcError>
where
    R: for<'de> Deserialize<'de>,
{
    if let Some(error) = value.get("error") {
        log::error!("RPC error for {}: {}", method, error);
        return Err(parse_rpc_error(error));
    }

    if let Some(result) = value.get("result") {
        log::debug!("RPC request {} completed successfully", method);
        serde_json::from_value(result.clone())
            .map_err(|e| {
                log::error!("Failed to deserialize result for method {}: {:?}", method, e);
                RpcError::Other(format!("Failed to deserialize result: {:?}", e))
            })
    } else {
        log::error!("RPC response missing result field for method {}", method);
        Err(RpcError::Other("Response missing result field".to_string()))
    }
}

/// Map the `error` object of a JSON-RPC response.
///
/// Preflight failures carry `data.err.InstructionError = [index, {"Custom": n}]`;
/// those become `InstructionError` so callers can branch on the program code.
pub fn parse_rpc_error(error: &serde_json::Value) -> RpcError {
    let Some(error_obj) = error.as_object() else {
        return RpcError::Other(error.to_string());
    };

    let code = error_obj.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
    let message = error_obj
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();

    let data = error_obj.get("data");
    let custom_code = data
        .and_then(|d| d.get("err"))
        .and_then(|e| e.get("InstructionError"))
        .and_then(|e| e.as_array())
        .and_then(|pair| pair.get(1))
        .and_then(|detail| detail.get("Custom"))
        .and_then(|c| c.as_u64());

    if let Some(custom_code) = custom_code {
        log::error!("Program error code: {}", custom_code);
        return RpcError::InstructionError {
            code: custom_code as u32,
            message,
        };
    }

    // keep the program log line that names the failure, if any
    let log_message = data
        .and_then(|d| d.get("logs"))
        .and_then(|l| l.as_array())
        .and_then(|logs| {
            logs.iter()
                .filter_map(|entry| entry.as_str())
                .find(|line| line.contains("Error Message:") || line.contains("custom program error"))
                .map(|line| line.trim().to_string())
        });

    match log_message {
        Some(detail) => RpcError::SolanaRpcError(format!("Code {}: {} - {}", code, message, detail)),
        None => RpcError::SolanaRpcError(format!("Code {}: {}", code, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_program_error_is_typed() {
        let error = json!({
            "code": -32002,
            "message": "Transaction simulation failed: Error processing Instruction 4: custom program error: 0x137",
            "data": {
                "err": {"InstructionError": [4, {"Custom": 311}]},
                "logs": ["Program log: Custom program error: 0x137"]
            }
        });

        match parse_rpc_error(&error) {
            RpcError::InstructionError { code, message } => {
                assert_eq!(code, 311);
                assert!(message.contains("0x137"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_error_keeps_log_detail() {
        let error = json!({
            "code": -32002,
            "message": "Transaction simulation failed",
            "data": {
                "err": "AccountNotFound",
                "logs": ["Program X invoke [1]", "Program X failed: custom program error: 0x135"]
            }
        });

        let RpcError::SolanaRpcError(text) = parse_rpc_error(&error) else {
            panic!("expected SolanaRpcError");
        };
        assert!(text.starts_with("Code -32002"));
        assert!(text.contains("0x135"));
    }

    #[test]
    fn test_response_without_result_is_error() {
        let result: Result<u64, RpcError> = parse_rpc_response("getBalance", json!({"jsonrpc": "2.0", "id": 1}));
        assert!(matches!(result, Err(RpcError::Other(_))));

        let ok: u64 = parse_rpc_response("getMinimumBalanceForRentExemption", json!({"result": 1461600})).unwrap();
        assert_eq!(ok, 1_461_600);
    }

    #[test]
    fn test_signature_status_commitment() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 72,
            "confirmations": 10,
            "err": null,
            "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert!(status.satisfies(Commitment::Processed));
        assert!(status.satisfies(Commitment::Confirmed));
        assert!(!status.satisfies(Commitment::Finalized));
        assert!(status.err.is_none());

        let legacy: SignatureStatus = serde_json::from_value(json!({
            "slot": 72,
            "confirmations": null,
            "err": {"InstructionError": [0, {"Custom": 1}]}
        }))
        .unwrap();
        assert!(legacy.satisfies(Commitment::Finalized));
        assert!(legacy.err.is_some());
    }
}
