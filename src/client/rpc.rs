//! Minimal JSON-RPC status source for the chain strip. One endpoint, no
//! provider fallback; total failure degrades to an "offline" badge.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};

use super::{FETCH_TIMEOUT, Poller};

/// Chain strip refresh cadence, slower than the graph poll.
pub const CHAIN_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainStatus {
    pub chain_id: String,
    pub block_number: u64,
    pub block_time: Option<u64>,
    pub accounts: usize,
}

pub enum ChainUpdate {
    Status(ChainStatus),
    Offline,
}

pub struct ChainClient {
    http: reqwest::blocking::Client,
    rpc_url: String,
}

impl ChainClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build RPC client")?;
        Ok(Self {
            http,
            rpc_url: rpc_url.to_owned(),
        })
    }

    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let payload: Value = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .with_context(|| format!("RPC {method} unreachable"))?
            .error_for_status()
            .with_context(|| format!("RPC {method} failed"))?
            .json()
            .with_context(|| format!("RPC {method} returned malformed JSON"))?;

        if let Some(message) = payload
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
        {
            bail!("RPC {method}: {message}");
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| anyhow!("RPC {method}: missing result"))
    }

    pub fn fetch_status(&self) -> Result<ChainStatus> {
        let chain_id = self
            .call("eth_chainId", json!([]))?
            .as_str()
            .ok_or_else(|| anyhow!("eth_chainId: expected hex string"))?
            .to_owned();

        let block_hex = self.call("eth_blockNumber", json!([]))?;
        let block_number = block_hex
            .as_str()
            .ok_or_else(|| anyhow!("eth_blockNumber: expected hex string"))
            .and_then(parse_hex_quantity)?;

        let accounts = self
            .call("eth_accounts", json!([]))?
            .as_array()
            .map(Vec::len)
            .unwrap_or(0);

        let block = self.call("eth_getBlockByNumber", json!(["latest", false]))?;
        let block_time = block
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|hex| parse_hex_quantity(hex).ok());

        Ok(ChainStatus {
            chain_id,
            block_number,
            block_time,
            accounts,
        })
    }
}

fn parse_hex_quantity(hex: &str) -> Result<u64> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    u64::from_str_radix(digits, 16).with_context(|| format!("bad hex quantity {hex:?}"))
}

pub fn spawn_chain_poller(client: ChainClient, interval: Duration) -> Poller<ChainUpdate> {
    Poller::spawn(interval, move || match client.fetch_status() {
        Ok(status) => ChainUpdate::Status(status),
        Err(error) => {
            tracing::debug!("chain status fetch failed: {error:#}");
            ChainUpdate::Offline
        }
    })
}
