use crate::entity::{
    Investment, InvestmentStatus, NewTransaction, Profile, Transaction, TransactionStatus,
    UserLimits, Wallet,
};
use chrono::Utc;
use log::info;
use sqlx::{postgres::PgRow, Error as SqlxError, PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

// Text columns holding enum values
fn parse_column<T: FromStr<Err = anyhow::Error>>(row: &PgRow, column: &str) -> Result<T, SqlxError> {
    let value: String = row.try_get(column)?;
    value.parse::<T>().map_err(|e| SqlxError::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

fn profile_from_row(row: &PgRow) -> Result<Profile, SqlxError> {
    Ok(Profile {
        id: row.try_get("id")?,
        telegram_id: row.try_get("telegram_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
    })
}

fn wallet_from_row(row: &PgRow) -> Result<Wallet, SqlxError> {
    Ok(Wallet {
        user_id: row.try_get("user_id")?,
        algorand_address: row.try_get("algorand_address")?,
        encrypted_mnemonic: row.try_get("encrypted_mnemonic")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn transaction_from_row(row: &PgRow) -> Result<Transaction, SqlxError> {
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        tx_type: parse_column(row, "type")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        channel: parse_column(row, "channel")?,
        to_address: row.try_get("to_address")?,
        from_address: row.try_get("from_address")?,
        algorand_tx_id: row.try_get("algorand_tx_id")?,
        status: parse_column(row, "status")?,
        metadata: row.try_get("metadata")?,
        created_at: row.try_get("created_at")?,
    })
}

fn investment_from_row(row: &PgRow) -> Result<Investment, SqlxError> {
    Ok(Investment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        amount_invested: row.try_get("amount_invested")?,
        apy_rate: row.try_get("apy_rate")?,
        start_date: row.try_get("start_date")?,
        current_value: row.try_get("current_value")?,
        status: parse_column(row, "status")?,
    })
}

// Create new profile in database
pub async fn create_profile(
    pool: &PgPool,
    telegram_id: i64,
    username: Option<String>,
) -> Result<Profile, SqlxError> {
    let row = sqlx::query(
        "INSERT INTO profiles (id, telegram_id, username, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(telegram_id)
    .bind(username)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    let profile = profile_from_row(&row)?;
    info!("Created new profile with ID: {}", profile.id);

    Ok(profile)
}

pub async fn get_profile_by_telegram_id(
    pool: &PgPool,
    telegram_id: i64,
) -> Result<Option<Profile>, SqlxError> {
    sqlx::query("SELECT * FROM profiles WHERE telegram_id = $1")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await?
        .map(|row| profile_from_row(&row))
        .transpose()
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, SqlxError> {
    sqlx::query("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .map(|row| profile_from_row(&row))
        .transpose()
}

pub async fn find_profile_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Profile>, SqlxError> {
    sqlx::query("SELECT * FROM profiles WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .map(|row| profile_from_row(&row))
        .transpose()
}

pub async fn update_profile_contact(
    pool: &PgPool,
    user_id: Uuid,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "UPDATE profiles SET email = COALESCE($1, email), phone = COALESCE($2, phone) WHERE id = $3",
    )
    .bind(email)
    .bind(phone)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_wallet(pool: &PgPool, user_id: Uuid) -> Result<Option<Wallet>, SqlxError> {
    sqlx::query("SELECT * FROM wallets WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .map(|row| wallet_from_row(&row))
        .transpose()
}

pub async fn get_all_wallets(pool: &PgPool) -> Result<Vec<Wallet>, SqlxError> {
    let rows = sqlx::query("SELECT * FROM wallets ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    rows.iter().map(wallet_from_row).collect()
}

// Save wallet information for a user
pub async fn create_wallet(
    pool: &PgPool,
    user_id: Uuid,
    address: &str,
    encrypted_mnemonic: &str,
) -> Result<Wallet, SqlxError> {
    let now = Utc::now();
    let row = sqlx::query(
        "INSERT INTO wallets (user_id, algorand_address, encrypted_mnemonic, balance, created_at, updated_at) \
         VALUES ($1, $2, $3, 0, $4, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(address)
    .bind(encrypted_mnemonic)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!("Created wallet {} for user {}", address, user_id);

    wallet_from_row(&row)
}

pub async fn set_wallet_balance(
    pool: &PgPool,
    user_id: Uuid,
    balance: f64,
) -> Result<(), SqlxError> {
    sqlx::query("UPDATE wallets SET balance = $1, updated_at = $2 WHERE user_id = $3")
        .bind(balance)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

// Add `delta` to the cached balance and return the new value
pub async fn adjust_wallet_balance(
    pool: &PgPool,
    user_id: Uuid,
    delta: f64,
) -> Result<f64, SqlxError> {
    let row = sqlx::query(
        "UPDATE wallets SET balance = balance + $1, updated_at = $2 WHERE user_id = $3 RETURNING balance",
    )
    .bind(delta)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    row.try_get("balance")
}

// Record a transaction in the database
pub async fn insert_transaction(
    pool: &PgPool,
    tx: &NewTransaction,
) -> Result<Transaction, SqlxError> {
    let row = sqlx::query(
        "INSERT INTO transactions (id, user_id, type, amount, currency, channel, to_address, from_address, algorand_tx_id, status, metadata, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(tx.user_id)
    .bind(tx.tx_type.to_string())
    .bind(tx.amount)
    .bind(&tx.currency)
    .bind(tx.channel.as_str())
    .bind(tx.to_address.as_deref())
    .bind(tx.from_address.as_deref())
    .bind(tx.algorand_tx_id.as_deref())
    .bind(tx.status.to_string())
    .bind(&tx.metadata)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    let transaction = transaction_from_row(&row)?;
    info!("Recorded transaction with ID: {}", transaction.id);

    Ok(transaction)
}

pub async fn update_transaction_status(
    pool: &PgPool,
    id: Uuid,
    status: TransactionStatus,
    algorand_tx_id: Option<&str>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "UPDATE transactions SET status = $1, algorand_tx_id = COALESCE($2, algorand_tx_id) WHERE id = $3",
    )
    .bind(status.to_string())
    .bind(algorand_tx_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

// Get user transaction history, newest first
pub async fn get_user_transactions(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Transaction>, SqlxError> {
    let rows = sqlx::query(
        "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(transaction_from_row).collect()
}

pub async fn get_user_limits(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserLimits>, SqlxError> {
    let row = sqlx::query("SELECT * FROM user_limits WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(UserLimits {
            user_id: row.try_get("user_id")?,
            daily_send_limit: row.try_get("daily_send_limit")?,
            daily_sent_amount: row.try_get("daily_sent_amount")?,
            is_pro: row.try_get("is_pro")?,
            last_reset_date: row.try_get("last_reset_date")?,
        })),
        None => Ok(None),
    }
}

pub async fn save_user_limits(pool: &PgPool, limits: &UserLimits) -> Result<(), SqlxError> {
    sqlx::query(
        "INSERT INTO user_limits (user_id, daily_send_limit, daily_sent_amount, is_pro, last_reset_date) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id) DO UPDATE SET daily_send_limit = $2, daily_sent_amount = $3, is_pro = $4, last_reset_date = $5",
    )
    .bind(limits.user_id)
    .bind(limits.daily_send_limit)
    .bind(limits.daily_sent_amount)
    .bind(limits.is_pro)
    .bind(limits.last_reset_date)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_investment(
    pool: &PgPool,
    user_id: Uuid,
    amount: f64,
    apy_rate: f64,
) -> Result<Investment, SqlxError> {
    let row = sqlx::query(
        "INSERT INTO investments (id, user_id, amount_invested, apy_rate, start_date, current_value, status) \
         VALUES ($1, $2, $3, $4, $5, $3, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(amount)
    .bind(apy_rate)
    .bind(Utc::now())
    .bind(InvestmentStatus::Active.to_string())
    .fetch_one(pool)
    .await?;

    let investment = investment_from_row(&row)?;
    info!("Recorded investment with ID: {}", investment.id);

    Ok(investment)
}

pub async fn get_investment(pool: &PgPool, id: Uuid) -> Result<Option<Investment>, SqlxError> {
    sqlx::query("SELECT * FROM investments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(|row| investment_from_row(&row))
        .transpose()
}

pub async fn get_user_investments(
    pool: &PgPool,
    user_id: Uuid,
    status: InvestmentStatus,
) -> Result<Vec<Investment>, SqlxError> {
    let rows = sqlx::query(
        "SELECT * FROM investments WHERE user_id = $1 AND status = $2 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .bind(status.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(investment_from_row).collect()
}

pub async fn update_investment(
    pool: &PgPool,
    id: Uuid,
    current_value: f64,
    status: InvestmentStatus,
) -> Result<(), SqlxError> {
    sqlx::query("UPDATE investments SET current_value = $1, status = $2 WHERE id = $3")
        .bind(current_value)
        .bind(status.to_string())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
