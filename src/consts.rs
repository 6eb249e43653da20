pub mod auth_const {
    pub const USER_TABLE: &str = "users";
    pub const ORGANIZATION_TABLE: &str = "organizations";
    pub const INVITE_TABLE: &str = "invites";
    pub const NOTIFICATION_TABLE: &str = "notifications";
}

pub mod invite_const {
    /// Invites die 7 days after issuance, consumed or not.
    pub const INVITE_TTL_DAYS: i64 = 7;
    /// Raw token length before hashing. 32 alphanumerics ~ 190 bits.
    pub const INVITE_TOKEN_LEN: usize = 32;
}
