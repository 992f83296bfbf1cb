mod helpers;
mod settlements;
mod stats;
mod wallets;
