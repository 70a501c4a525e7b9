use crate::algorand::client::ChainClient;
use crate::algorand::transaction::PaymentTransaction;
use crate::algorand::utils::{algos_to_microalgos, microalgos_to_algos};
use crate::algorand::wallet::encode_address;
use crate::entity::PayError;
use anyhow::Result;
use ed25519_dalek::SigningKey;

/// Get ALGO balance
pub async fn get_algo_balance(client: &dyn ChainClient, address: &str) -> Result<f64> {
    let microalgos = client.account_balance(address).await?;
    Ok(microalgos_to_algos(microalgos))
}

/// Send ALGO and wait for confirmation. Returns the transaction id.
pub async fn send_algo(
    client: &dyn ChainClient,
    signing_key: &SigningKey,
    recipient: &str,
    amount: f64,
    note: Option<&str>,
) -> Result<String> {
    let sender = encode_address(signing_key.verifying_key().as_bytes());
    let microalgos = algos_to_microalgos(amount);
    if microalgos == 0 {
        return Err(PayError::InvalidAmount.into());
    }

    let params = client.suggested_params().await?;
    let transaction = PaymentTransaction::new(&sender, recipient, microalgos, note, &params)?;

    // Make sure sender has enough balance (including fee)
    let sender_balance = client.account_balance(&sender).await?;
    if sender_balance < microalgos + transaction.fee() {
        return Err(PayError::InsufficientFunds.into());
    }

    let signed = transaction.sign(signing_key)?;
    let tx_id = client.submit_transaction(&signed.bytes).await?;
    client.wait_for_confirmation(&tx_id).await?;

    Ok(tx_id)
}
