//! Transaction parameters and submission.

use alloy::contract::SolCallBuilder;
use alloy::network::Ethereum;
use alloy::primitives::Address;
use alloy::providers::{PendingTransactionBuilder, Provider};
use alloy_sol_types::SolCall;
use bon::Builder;

use crate::{Result, ensure};

/// Handle of a submitted transaction, returned to the caller unmodified.
pub type PendingTx = PendingTransactionBuilder<Ethereum>;

/// Transaction metadata accepted by every write method.
///
/// Unset fields fall back to the client configuration or to the node.
#[derive(Debug, Clone, Default, Builder)]
pub struct TxParams {
    /// Sender. Defaults to the client wallet, then to the node's first account.
    pub from: Option<Address>,
    /// Explicit gas limit. Skips estimation when set.
    pub gas: Option<u64>,
    /// Legacy gas price in wei.
    pub gas_price: Option<u128>,
    pub nonce: Option<u64>,
    /// Multiplier applied to the node's gas estimate.
    pub safety_factor: Option<f64>,
}

/// Multiplies a gas estimate by the safety factor, rounding up.
pub fn apply_safety_factor(estimate: u64, factor: f64) -> u64 {
    (estimate as f64 * factor).ceil() as u64
}

/// Signs and forwards a prepared call from `from`.
///
/// The gas limit is the explicit one from `tx` or the node's estimate scaled
/// by the safety factor.
pub(crate) async fn send<P, C>(
    call: SolCallBuilder<P, C>,
    from: Address,
    tx: &TxParams,
    default_safety_factor: f64,
) -> Result<PendingTx>
where
    P: Provider,
    C: SolCall,
{
    let factor = tx.safety_factor.unwrap_or(default_safety_factor);
    ensure!(
        factor.is_finite() && factor >= 1.0,
        InvalidData,
        "Gas safety factor must be a finite number of at least 1.0, got {factor}"
    );

    let mut call = call.from(from);
    if let Some(gas_price) = tx.gas_price {
        call = call.gas_price(gas_price);
    }
    if let Some(nonce) = tx.nonce {
        call = call.nonce(nonce);
    }

    let gas = match tx.gas {
        Some(gas) => gas,
        None => {
            let estimate = call.estimate_gas().await?;
            log::trace!("Gas estimate for {}: {estimate}", C::SIGNATURE);
            apply_safety_factor(estimate, factor)
        }
    };

    log::debug!("Sending {} from {from} with gas limit {gas}", C::SIGNATURE);
    let pending = call.gas(gas).send().await?;
    log::debug!("Submitted transaction {}", pending.tx_hash());
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_safety_factor() {
        assert_eq!(apply_safety_factor(100_000, 1.0), 100_000);
        assert_eq!(apply_safety_factor(100_000, 1.2), 120_000);
        assert_eq!(apply_safety_factor(21_001, 1.5), 31_502);
        assert_eq!(apply_safety_factor(0, 2.0), 0);
    }

    #[test]
    fn test_tx_params_builder() {
        let from = Address::repeat_byte(7);
        let params = TxParams::builder().from(from).gas(50_000).build();
        assert_eq!(params.from, Some(from));
        assert_eq!(params.gas, Some(50_000));
        assert!(params.safety_factor.is_none());
    }
}
