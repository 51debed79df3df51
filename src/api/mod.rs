//! Azure REST plumbing: Resource Manager, Key Vault and the shared HTTP client

pub mod client;
pub mod constants;
pub mod keyvault;
pub mod models;
pub mod resources;

pub use client::AzureClient;
pub use keyvault::{KeyVaultClient, SecretStore};
pub use models::{ResourceGroup, Subscription, TokenInfo};
pub use resources::{ArmClient, ResourceGroupApi};
