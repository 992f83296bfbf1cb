use log::{trace, warn};
use sqlx::SqliteConnection;

use crate::{
    codes::{CodeGenerator, CodeScope, MintedCodes},
    traits::LedgerError,
};

pub async fn code_exists(scope: CodeScope, code: &str, conn: &mut SqliteConnection) -> Result<bool, LedgerError> {
    let query = match scope {
        CodeScope::Transaction => "SELECT EXISTS(SELECT 1 FROM transactions WHERE reference = $1)",
        CodeScope::Reversement => "SELECT EXISTS(SELECT 1 FROM reversements WHERE reference = $1)",
        CodeScope::Wallet => "SELECT EXISTS(SELECT 1 FROM wallets WHERE account_number = $1)",
    };
    let found: i64 = sqlx::query_scalar(query).bind(code).fetch_one(conn).await?;
    Ok(found != 0)
}

/// Draws codes with the scope's default prefix until one is free both in the store and in `minted`.
///
/// Gives up with [`LedgerError::CodeGenerationExhausted`] after the generator's attempt limit.
pub async fn mint(
    generator: &CodeGenerator,
    scope: CodeScope,
    minted: &mut MintedCodes,
    conn: &mut SqliteConnection,
) -> Result<String, LedgerError> {
    mint_with_prefix(generator, scope, scope.default_prefix(), minted, conn).await
}

async fn mint_with_prefix(
    generator: &CodeGenerator,
    scope: CodeScope,
    prefix: &str,
    minted: &mut MintedCodes,
    conn: &mut SqliteConnection,
) -> Result<String, LedgerError> {
    let attempts = generator.max_attempts();
    for attempt in 1..=attempts {
        let candidate = generator.candidate(prefix);
        if minted.contains(scope, &candidate) || code_exists(scope, &candidate, &mut *conn).await? {
            trace!("🧾️ {scope} code {candidate} is taken ({attempt}/{attempts})");
            continue;
        }
        minted.insert(scope, candidate.clone());
        return Ok(candidate);
    }
    warn!("🧾️ Could not find a free {scope} code with prefix {prefix} after {attempts} attempts");
    Err(LedgerError::CodeGenerationExhausted { prefix: prefix.to_string(), attempts })
}
