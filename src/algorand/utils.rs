// Constants for conversion
pub const MICROALGOS_PER_ALGO: f64 = 1_000_000.0;

// Minimum fee of a transaction, in microalgos
pub const MIN_TXN_FEE: u64 = 1_000;

// Validity window of a transaction, in rounds
pub const TXN_VALIDITY_ROUNDS: u64 = 1_000;

/// Convert microalgos to ALGO
pub fn microalgos_to_algos(microalgos: u64) -> f64 {
    microalgos as f64 / MICROALGOS_PER_ALGO
}

/// Convert ALGO to microalgos
pub fn algos_to_microalgos(algos: f64) -> u64 {
    (algos * MICROALGOS_PER_ALGO).round() as u64
}
