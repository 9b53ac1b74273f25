//! Read services built on top of the chain reader.

pub mod overview;
pub mod resolver;
pub mod token;

pub use overview::{chain_overview, token_overview, ChainOverview, TokenOverview};
pub use resolver::{resolve_account, AccountRef, EnsResolver, NameResolver};
pub use token::{CallArg, TokenContractReader};
