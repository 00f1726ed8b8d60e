pub const HASH_BYTES_LENGTH: usize = 32;
pub const CHECKSUM_BYTE_LENGTH: usize = 4;
pub const ADDRESS_LENGTH: usize = 58;
pub const PUBLIC_KEY_BYTE_LENGTH: usize = 32;
pub const SECRET_KEY_BYTE_LENGTH: usize = 32;
pub const SIGNATURE_BYTE_LENGTH: usize = 64;
pub const SIGNATURE_ENCODING_INCR: usize = 75;
pub type Byte32 = [u8; 32];
pub const MAX_TX_GROUP_SIZE: usize = 16;

pub const MULTISIG_DOMAIN_SEPARATOR: &str = "MultisigAddr";
pub const LOGIC_SIG_DOMAIN_SEPARATOR: &str = "Program";
pub const APP_ID_DOMAIN_SEPARATOR: &str = "appID";

// Application state schema limits
pub const MAX_GLOBAL_STATE_KEYS: u64 = 64;
pub const MAX_LOCAL_STATE_KEYS: u64 = 16;
pub const MAX_EXTRA_PROGRAM_PAGES: u32 = 3;
