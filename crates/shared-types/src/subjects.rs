//! # Well-Known Subjects

/// Registration requests are sent here.
pub const REGISTER_SUBJECT: &str = "auth.register";

/// Service public-key discovery queries are sent here.
pub const DISCOVERY_SUBJECT: &str = "auth.pubkey";

/// Claim publications to the resolver are sent here.
pub const RESOLVER_UPDATE_SUBJECT: &str = "$SYS.REQ.CLAIMS.UPDATE";
