//! Steam user accounts.
//!
//! A Steam installation keeps one `userdata/<accountId>` directory per user
//! that has logged in on this machine, and remembers login and persona names
//! in `config/loginusers.vdf`, keyed by 64-bit Steam ID.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::instrument;

/// Offset between a 32-bit account ID and its 64-bit Steam ID for
/// individual accounts in the public universe.
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

static LOGIN_USER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\d{17})"\s*\{([^}]*)\}"#).unwrap());
static VDF_PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)"\s*"([^"]*)""#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRecord {
    pub name: String,
    pub steam_id64: u64,
    pub account_id: u32,
}
impl AccountRecord {
    pub fn from_account_id(name: impl Into<String>, account_id: u32) -> Self {
        Self {
            name: name.into(),
            steam_id64: u64::from(account_id) + STEAM_ID64_BASE,
            account_id,
        }
    }
}

/// Source of user accounts to create shortcuts for.
pub trait AccountDirectory: Send + Sync {
    /// Resolves an account by login name, persona name or either ID.
    fn lookup(&self, name: &str) -> Option<AccountRecord>;
    /// Every account available.
    fn accounts(&self) -> Vec<AccountRecord>;
}

/// Accounts partitioned by whether they could be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPartition {
    pub found: Vec<AccountRecord>,
    pub missing: Vec<String>,
}

/// Resolves every name in `specified` against `directory`. Every name ends up
/// in exactly one of `found` or `missing`; with no names specified, every
/// account of the directory is found.
pub fn partition_accounts(directory: &dyn AccountDirectory, specified: &[String]) -> AccountPartition {
    if specified.is_empty() {
        return AccountPartition {
            found: directory.accounts(),
            missing: Vec::new(),
        };
    }
    let mut partition = AccountPartition::default();
    for name in specified {
        match directory.lookup(name) {
            Some(record) => partition.found.push(record),
            None => {
                tracing::debug!(account = %name, "Account not found");
                partition.missing.push(name.clone());
            },
        }
    }
    partition
}

/// No accounts at all, for configurations without a Steam directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccounts;
impl AccountDirectory for NoAccounts {
    fn lookup(&self, _name: &str) -> Option<AccountRecord> {
        None
    }

    fn accounts(&self) -> Vec<AccountRecord> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    record: AccountRecord,
    persona: Option<String>,
}

/// Accounts read from a Steam installation on disk.
#[derive(Debug, Clone)]
pub struct SteamDirectory {
    root: PathBuf,
    entries: Vec<Entry>,
}
impl SteamDirectory {
    /// Reads the accounts of the Steam installation at `root`.
    ///
    /// `loginusers.vdf` is optional; without it accounts are named by their
    /// account ID.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let userdata = root.join("userdata");
        if !userdata.is_dir() {
            exn::bail!(ErrorKind::NotSteamDirectory(root.display().to_string()));
        }

        let names = match std::fs::read_to_string(root.join("config").join("loginusers.vdf")) {
            Ok(contents) => parse_login_users(&contents),
            Err(e) => {
                tracing::debug!(error = %e, "No readable loginusers.vdf; accounts will be named by ID");
                HashMap::new()
            },
        };

        let read_dir = std::fs::read_dir(&userdata).or_raise(|| ErrorKind::Io(userdata.display().to_string()))?;
        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.or_raise(|| ErrorKind::Io(userdata.display().to_string()))?;
            if !dir_entry.path().is_dir() {
                continue;
            }
            // Steam keeps an "anonymous" `0` directory and the odd non-numeric one.
            let Some(account_id) = dir_entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
                continue;
            };
            if account_id == 0 {
                continue;
            }
            let steam_id64 = u64::from(account_id) + STEAM_ID64_BASE;
            let (login, persona) = names.get(&steam_id64).cloned().unwrap_or_default();
            let name = login.unwrap_or_else(|| account_id.to_string());
            entries.push(Entry {
                record: AccountRecord::from_account_id(name, account_id),
                persona,
            });
        }
        entries.sort_by_key(|entry| entry.record.account_id);
        tracing::debug!(accounts = entries.len(), "Read Steam accounts");
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
impl AccountDirectory for SteamDirectory {
    fn lookup(&self, name: &str) -> Option<AccountRecord> {
        self.entries
            .iter()
            .find(|entry| {
                entry.record.name == name
                    || entry.persona.as_deref() == Some(name)
                    || entry.record.account_id.to_string() == name
                    || entry.record.steam_id64.to_string() == name
            })
            .map(|entry| entry.record.clone())
    }

    fn accounts(&self) -> Vec<AccountRecord> {
        self.entries.iter().map(|entry| entry.record.clone()).collect()
    }
}

/// Maps Steam ID to `(AccountName, PersonaName)` from `loginusers.vdf`.
fn parse_login_users(contents: &str) -> HashMap<u64, (Option<String>, Option<String>)> {
    let mut users = HashMap::new();
    for user in LOGIN_USER_REGEX.captures_iter(contents) {
        let Ok(steam_id64) = user[1].parse::<u64>() else {
            continue;
        };
        let (mut login, mut persona) = (None, None);
        for pair in VDF_PAIR_REGEX.captures_iter(&user[2]) {
            match pair[1].to_ascii_lowercase().as_str() {
                "accountname" => login = Some(pair[2].to_string()),
                "personaname" => persona = Some(pair[2].to_string()),
                _ => {},
            }
        }
        users.insert(steam_id64, (login, persona));
    }
    users
}
