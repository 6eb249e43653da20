pub mod claim;
pub mod invite;
pub mod notification;
pub mod organization;
pub mod user;
