//! Shop core library.
//!
//! Types and contracts shared by the merchant backend client, the external card
//! payment SDK boundary, and the checkout orchestration.

pub mod card_process;
pub mod errors;
pub mod merchant;
pub mod sections;
pub mod types;
