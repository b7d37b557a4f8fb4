//! Constants used throughout the provider crate.

/// Suffix appended to the owning package name to form the root identifier.
pub const ROOT_ID_SUFFIX: &str = ".PrivateFilesProvider.ROOT";

/// Static summary line shown under the root title.
pub const ROOT_SUMMARY: &str = "Private files";

/// Platform default application icon (`android.R.drawable.sym_def_app_icon`).
pub const DEFAULT_APP_ICON: u32 = 0x0108_0093;

/// Upper bound on the number of leading bytes read when sniffing content.
pub const SNIFF_LIMIT_BYTES: u64 = 8 * 1024;
