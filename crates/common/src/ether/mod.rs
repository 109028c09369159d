pub mod bytecode;
pub mod etherscan;
pub mod signatures;
pub mod sourcify;
pub mod sources;
