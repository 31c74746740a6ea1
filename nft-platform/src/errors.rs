// Validation
pub const ERR_INVALID_COLLECTION_ID: &str = "Invalid collection id";
pub const ERR_NAME_OUT_OF_RANGE: &str = "Collection name out of range";
pub const ERR_SYMBOL_OUT_OF_RANGE: &str = "Collection symbol out of range";
pub const ERR_DESCRIPTION_TOO_LONG: &str = "Collection description too long";
pub const ERR_BASE_URI_OUT_OF_RANGE: &str = "Collection base URI out of range";
pub const ERR_ROYALTY_OUT_OF_RANGE: &str = "Royalty out of range";
pub const ERR_URI_TOO_LONG: &str = "Token URI too long";
pub const ERR_PROPERTIES_TOO_LONG: &str = "Token properties too long";
pub const ERR_DROP_WINDOW_ORDER: &str = "Drop end time must be greater than start time";
pub const ERR_CHECKIN_WINDOW_ORDER: &str = "Check-in end time must be greater than start time";
pub const ERR_BATCH_TOO_LARGE: &str = "Whitelist batch exceeds 500 entries";

// Authorization
pub const ERR_UNAUTHORIZED: &str = "Unauthorized";
pub const ERR_SCOPE_VIOLATION: &str = "Collection out of scope";
pub const ERR_TOKEN_OUT_OF_SCOPE: &str = "Token out of scope";
pub const ERR_FACTORY_ONLY: &str = "Only available in factory mode";

// State conflicts
pub const ERR_SOLD_OUT: &str = "Collection sold out";
pub const ERR_COLLECTION_PAUSED: &str = "Collection paused";
pub const ERR_ALREADY_BURNED: &str = "Token already burned";
pub const ERR_OWNER_ALREADY_BOUND: &str = "Owner already has a collection";
pub const ERR_NOT_TRANSFERABLE: &str = "Collection is not transferable";
pub const ERR_SOULBOUND: &str = "Membership token is soulbound";
pub const ERR_DROP_DISABLED: &str = "Drop is not enabled";
pub const ERR_DROP_NOT_ACTIVE: &str = "Drop is not active";
pub const ERR_WALLET_LIMIT_REACHED: &str = "Drop wallet limit reached";
pub const ERR_NOT_WHITELISTED: &str = "Drop whitelist entry not found";
pub const ERR_WHITELIST_EXHAUSTED: &str = "Drop whitelist allowance exhausted";
pub const ERR_CHECKIN_DISABLED: &str = "Check-in is not enabled";
pub const ERR_CHECKIN_NOT_ACTIVE: &str = "Check-in is not active";
pub const ERR_MEMBERSHIP_REQUIRED: &str = "Membership required";
pub const ERR_CHECKIN_LIMIT_REACHED: &str = "Check-in limit reached";
pub const ERR_COOLDOWN_NOT_ELAPSED: &str = "Check-in cooldown not elapsed";
pub const ERR_TEMPLATE_NOT_SET: &str = "Collection contract template is not set";
pub const ERR_CONTRACT_ALREADY_DEPLOYED: &str = "Collection contract already deployed";

// Not found
pub const ERR_COLLECTION_NOT_FOUND: &str = "Collection not found";
pub const ERR_TOKEN_NOT_FOUND: &str = "Token not found";
