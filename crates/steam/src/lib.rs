//! Everything that has to line up with how Steam itself identifies
//! shortcuts and users.

mod accounts;
pub mod error;
mod exclusion;
mod identity;

pub use crate::accounts::{
    AccountDirectory, AccountPartition, AccountRecord, NoAccounts, STEAM_ID64_BASE, SteamDirectory, partition_accounts,
};
pub use crate::exclusion::{ExclusionRegistry, ExclusionSet};
pub use crate::identity::{ShortcutIdentity, assign};
