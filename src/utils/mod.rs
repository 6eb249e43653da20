pub mod email;
pub mod jwt;
pub mod pwd;
pub mod record_id;
pub mod time;
pub mod token;
pub mod validated_form;
