//! Reference code generation.
//!
//! Every ledger entry, settlement record and wallet carries a short human-readable reference made of a scope prefix
//! and a six-digit random suffix, e.g. `TRX004217`. Uniqueness is checked against the store by the backend, inside the
//! same atomic unit that inserts the record, with a hard cap on the number of draws.
use std::{collections::HashSet, fmt::Debug, fmt::Display, sync::Arc};

use rand::Rng;

pub const DEFAULT_MAX_CODE_ATTEMPTS: usize = 10;
const SUFFIX_RANGE: u32 = 1_000_000;

/// The uniqueness namespace a code is minted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeScope {
    Transaction,
    Reversement,
    Wallet,
}

impl CodeScope {
    pub fn default_prefix(&self) -> &'static str {
        match self {
            CodeScope::Transaction => "TRX",
            CodeScope::Reversement => "REV",
            CodeScope::Wallet => "WAL",
        }
    }
}

impl Display for CodeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeScope::Transaction => write!(f, "transaction"),
            CodeScope::Reversement => write!(f, "reversement"),
            CodeScope::Wallet => write!(f, "wallet"),
        }
    }
}

/// A source of numeric code suffixes. Only the last six decimal digits of each draw are used.
pub trait SuffixSource: Send + Sync {
    fn next_suffix(&self) -> u32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&self) -> u32 {
        rand::thread_rng().gen_range(0..SUFFIX_RANGE)
    }
}

#[derive(Clone)]
pub struct CodeGenerator {
    source: Arc<dyn SuffixSource>,
    max_attempts: usize,
}

impl Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CodeGenerator (max {} attempts)", self.max_attempts)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(RandomSuffix))
    }
}

impl CodeGenerator {
    pub fn new(source: Arc<dyn SuffixSource>) -> Self {
        Self { source, max_attempts: DEFAULT_MAX_CODE_ATTEMPTS }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws a new candidate code. The caller is responsible for checking it against the store.
    pub fn candidate(&self, prefix: &str) -> String {
        format!("{prefix}{:06}", self.source.next_suffix() % SUFFIX_RANGE)
    }
}

/// The codes already handed out in one atomic unit, which the store cannot see until they are inserted.
#[derive(Debug, Default)]
pub struct MintedCodes {
    codes: HashSet<(CodeScope, String)>,
}

impl MintedCodes {
    pub fn contains(&self, scope: CodeScope, code: &str) -> bool {
        self.codes.contains(&(scope, code.to_string()))
    }

    pub fn insert(&mut self, scope: CodeScope, code: String) {
        self.codes.insert((scope, code));
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
