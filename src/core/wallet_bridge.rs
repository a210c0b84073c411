use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use js_sys::Promise;
use web_sys::window;

/// Name of the global installed by `public/wallet_bridge.js`
const BRIDGE_GLOBAL: &str = "CandyWallet";

#[derive(Debug, Clone, PartialEq)]
pub enum WalletBridgeError {
    NotInstalled,
    ConnectionFailed(String),
    SigningFailed(String),
    JavaScriptError(String),
}

impl std::fmt::Display for WalletBridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletBridgeError::NotInstalled => write!(f, "No Solana wallet found in this browser"),
            WalletBridgeError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            WalletBridgeError::SigningFailed(msg) => write!(f, "Signing failed: {}", msg),
            WalletBridgeError::JavaScriptError(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

/// Browser wallet reached through the injected bridge object.
///
/// The bridge wraps whichever wallet provider the page found and speaks plain
/// strings: base58 public keys and base64 serialized transactions.
pub struct WalletBridge;

impl WalletBridge {
    fn bridge_object() -> Result<JsValue, WalletBridgeError> {
        let window = window().ok_or(WalletBridgeError::JavaScriptError("No window object".to_string()))?;

        let bridge = js_sys::Reflect::get(&window, &JsValue::from_str(BRIDGE_GLOBAL))
            .map_err(|e| WalletBridgeError::JavaScriptError(format!("Failed to get {}: {:?}", BRIDGE_GLOBAL, e)))?;

        if bridge.is_null() || bridge.is_undefined() {
            return Err(WalletBridgeError::NotInstalled);
        }
        Ok(bridge)
    }

    fn bridge_function(bridge: &JsValue, name: &str) -> Result<js_sys::Function, WalletBridgeError> {
        let func = js_sys::Reflect::get(bridge, &JsValue::from_str(name))
            .map_err(|e| WalletBridgeError::JavaScriptError(format!("Failed to get {} function: {:?}", name, e)))?;

        if !func.is_function() {
            return Err(WalletBridgeError::JavaScriptError(format!("{} is not a function", name)));
        }
        Ok(js_sys::Function::from(func))
    }

    /// Check if a wallet provider is available in the browser
    pub fn is_installed() -> bool {
        Self::bridge_object()
            .and_then(|bridge| Self::bridge_function(&bridge, "isInstalled").map(|f| (bridge, f)))
            .ok()
            .and_then(|(bridge, func)| func.call0(&bridge).ok())
            .and_then(|result| result.as_bool())
            .unwrap_or(false)
    }

    /// Connect to the wallet and return the base58 public key
    pub async fn connect() -> Result<String, WalletBridgeError> {
        let bridge = Self::bridge_object()?;
        let func = Self::bridge_function(&bridge, "connect")?;

        let promise = func.call0(&bridge)
            .map_err(|e| WalletBridgeError::ConnectionFailed(format!("{:?}", e)))?;

        let result = JsFuture::from(Promise::from(promise)).await
            .map_err(|e| WalletBridgeError::ConnectionFailed(format!("{:?}", e)))?;

        result.as_string()
            .ok_or(WalletBridgeError::ConnectionFailed("Public key is not a string".to_string()))
    }

    /// Disconnect from the wallet
    pub async fn disconnect() -> Result<(), WalletBridgeError> {
        let bridge = match Self::bridge_object() {
            Ok(bridge) => bridge,
            Err(WalletBridgeError::NotInstalled) => return Ok(()),
            Err(e) => return Err(e),
        };

        let func = match Self::bridge_function(&bridge, "disconnect") {
            Ok(func) => func,
            Err(_) => return Ok(()), // nothing to tear down
        };

        let promise = func.call0(&bridge)
            .map_err(|e| WalletBridgeError::JavaScriptError(format!("{:?}", e)))?;

        if promise.is_object() {
            JsFuture::from(Promise::from(promise)).await
                .map_err(|e| WalletBridgeError::JavaScriptError(format!("{:?}", e)))?;
        }

        Ok(())
    }

    /// Sign a transaction with the connected wallet
    ///
    /// # Parameters
    /// * `transaction_base64` - Base64 encoded transaction, possibly partially signed
    ///
    /// # Returns
    /// Base64 encoded transaction carrying the wallet's signature
    pub async fn sign_transaction(transaction_base64: &str) -> Result<String, WalletBridgeError> {
        let bridge = Self::bridge_object()?;
        let func = Self::bridge_function(&bridge, "signTransaction")?;

        let promise = func.call1(&bridge, &JsValue::from_str(transaction_base64))
            .map_err(|e| WalletBridgeError::SigningFailed(format!("{:?}", e)))?;

        let result = JsFuture::from(Promise::from(promise)).await
            .map_err(|e| WalletBridgeError::SigningFailed(format!("{:?}", e)))?;

        result.as_string()
            .ok_or(WalletBridgeError::SigningFailed("Signed transaction is not a string".to_string()))
    }
}
