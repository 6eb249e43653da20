use surrealdb::RecordId;

use crate::errors::{Error, Result};

pub fn get_record_id_from_string(val: &str) -> Result<RecordId> {
    let mut id_part = val.trim().splitn(2, ':');
    let table = id_part.next().ok_or_else(|| Error::InvalidRecordId(val.to_string()))?;
    let key = id_part.next().ok_or_else(|| Error::InvalidRecordId(val.to_string()))?;
    if table.is_empty() || key.is_empty() {
        return Err(Error::InvalidRecordId(val.to_string()));
    }
    Ok(RecordId::from_table_key(table, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        let id = get_record_id_from_string("users:abc123").unwrap();
        assert_eq!(id.to_string(), "users:abc123");
    }

    #[test]
    fn test_rejects_bare_key() {
        assert!(get_record_id_from_string("abc123").is_err());
        assert!(get_record_id_from_string(":abc").is_err());
    }
}
