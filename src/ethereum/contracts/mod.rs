//! Smart contract bindings.

pub mod ens;
pub mod erc20;
pub mod interface;

pub use erc20::ERC20_READ_SIGNATURES;
pub use interface::ContractInterface;
