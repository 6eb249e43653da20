use surrealdb::{Surreal, engine::any::Any};

use crate::{
    consts::auth_const::{ORGANIZATION_TABLE, USER_TABLE},
    errors::Result,
    models::{organization::Organization, user::User},
};

pub mod coordinator;
pub mod flow;
pub mod ledger;
pub mod resolver;

/// Expects an already-normalized email.
pub(crate) async fn find_user_by_email(sdb: &Surreal<Any>, email: &str) -> Result<Option<User>> {
    let user = sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", USER_TABLE))
        .bind(("email", email.to_string()))
        .await?
        .take::<Vec<User>>(0)?
        .into_iter()
        .next();
    Ok(user)
}

pub(crate) async fn find_organization_by_email(
    sdb: &Surreal<Any>,
    email: &str,
) -> Result<Option<Organization>> {
    let organization = sdb
        .query("SELECT * FROM type::table($table) WHERE email = $email;")
        .bind(("table", ORGANIZATION_TABLE))
        .bind(("email", email.to_string()))
        .await?
        .take::<Vec<Organization>>(0)?
        .into_iter()
        .next();
    Ok(organization)
}
