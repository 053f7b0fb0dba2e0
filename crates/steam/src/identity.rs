//! Shortcut identifiers as Steam derives them for non-Steam games.

/// Flag OR'd into the low half of the long identifier.
const LONG_ID_FLAG: u64 = 0x0200_0000;
/// The short identifier always has its top bit set.
const SHORT_ID_FLAG: u32 = 0x8000_0000;

/// The pair of identifiers Steam uses for a shortcut: the short one for the
/// shortcut itself and artwork file names, the long one for grid association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortcutIdentity {
    pub short_id: u32,
    pub long_id: u64,
}

/// Derives the identity of a shortcut launching `executable` under `title`.
///
/// Double quotes are stripped from the executable before hashing, so
/// `"C:\game.exe"` and `C:\game.exe` give the same identity. Collisions are
/// possible and are not detected.
///
/// ```
/// let id = srm_steam::assign("12345", "6789");
/// assert_eq!(id.short_id, 0xCBF4_3926);
/// assert_eq!(id.long_id, 0xCBF4_3926_0200_0000);
/// ```
pub fn assign(executable: &str, title: &str) -> ShortcutIdentity {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(executable.replace('"', "").as_bytes());
    hasher.update(title.as_bytes());
    let short_id = hasher.finalize() | SHORT_ID_FLAG;
    ShortcutIdentity {
        short_id,
        long_id: (u64::from(short_id) << 32) | LONG_ID_FLAG,
    }
}
