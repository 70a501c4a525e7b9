use crate::algorand::utils::{MIN_TXN_FEE, TXN_VALIDITY_ROUNDS};
use crate::algorand::wallet::decode_address;
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use data_encoding::BASE32_NOPAD;
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};

// Domain separation prefix for transaction signatures and ids
const TXN_PREFIX: &[u8] = b"TX";

/// Parameters returned by `GET /v2/transactions/params`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    /// Fee per byte, in microalgos
    pub fee: u64,
    pub min_fee: u64,
    pub last_round: u64,
    pub genesis_id: String,
    /// Base64 encoded genesis hash
    pub genesis_hash: String,
}

// Wire form of a payment transaction. Field order is alphabetical and empty
// values are skipped, which is what makes the msgpack encoding canonical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct PaymentFields {
    #[serde(default, skip_serializing_if = "is_zero")]
    amt: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    fee: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    fv: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    gen: String,
    #[serde(with = "serde_bytes")]
    gh: Vec<u8>,
    #[serde(default, skip_serializing_if = "is_zero")]
    lv: u64,
    #[serde(default, with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    note: Vec<u8>,
    #[serde(with = "serde_bytes")]
    rcv: Vec<u8>,
    #[serde(with = "serde_bytes")]
    snd: Vec<u8>,
    #[serde(rename = "type")]
    txn_type: String,
}

#[derive(Serialize)]
struct SignedFields<'a> {
    #[serde(with = "serde_bytes")]
    sig: Vec<u8>,
    txn: &'a PaymentFields,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// An unsigned ALGO transfer
#[derive(Debug, Clone)]
pub struct PaymentTransaction {
    fields: PaymentFields,
}

/// Signed transaction ready for `POST /v2/transactions`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub tx_id: String,
    pub bytes: Vec<u8>,
}

impl PaymentTransaction {
    /// Build a payment of `amount` microalgos with the fee derived from `params`.
    pub fn new(
        sender: &str,
        receiver: &str,
        amount: u64,
        note: Option<&str>,
        params: &SuggestedParams,
    ) -> Result<Self> {
        let genesis_hash = BASE64
            .decode(&params.genesis_hash)
            .map_err(|e| anyhow!("Invalid genesis hash: {}", e))?;

        let mut fields = PaymentFields {
            amt: amount,
            fee: 0,
            fv: params.last_round,
            gen: params.genesis_id.clone(),
            gh: genesis_hash,
            lv: params.last_round + TXN_VALIDITY_ROUNDS,
            note: note.map(|n| n.as_bytes().to_vec()).unwrap_or_default(),
            rcv: decode_address(receiver)?.to_vec(),
            snd: decode_address(sender)?.to_vec(),
            txn_type: "pay".to_string(),
        };

        // Size the fee against a signed encoding with a placeholder signature
        let estimated_size = rmp_serde::to_vec_named(&SignedFields {
            sig: vec![0u8; 64],
            txn: &fields,
        })?
        .len() as u64;
        let min_fee = params.min_fee.max(MIN_TXN_FEE);
        fields.fee = (params.fee * estimated_size).max(min_fee);

        Ok(Self { fields })
    }

    pub fn fee(&self) -> u64 {
        self.fields.fee
    }

    /// Canonical msgpack of the transaction
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(&self.fields)?)
    }

    fn bytes_to_sign(&self) -> Result<Vec<u8>> {
        let mut bytes = TXN_PREFIX.to_vec();
        bytes.extend(self.encode()?);
        Ok(bytes)
    }

    /// Transaction id: base32 of SHA-512/256 over the prefixed encoding
    pub fn id(&self) -> Result<String> {
        let digest = Sha512_256::digest(self.bytes_to_sign()?);
        Ok(BASE32_NOPAD.encode(&digest))
    }

    pub fn sign(&self, signing_key: &SigningKey) -> Result<SignedTransaction> {
        if signing_key.verifying_key().as_bytes()[..] != self.fields.snd[..] {
            return Err(anyhow!("Signing key does not match transaction sender"));
        }

        let signature = signing_key.sign(&self.bytes_to_sign()?);
        let bytes = rmp_serde::to_vec_named(&SignedFields {
            sig: signature.to_bytes().to_vec(),
            txn: &self.fields,
        })?;

        Ok(SignedTransaction {
            tx_id: self.id()?,
            bytes,
        })
    }
}
