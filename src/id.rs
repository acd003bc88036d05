use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;

/// Decodes a path parameter into an `ObjectId`. Anything other than 24 hex digits is rejected.
pub fn decode(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidIdentifier(raw.to_string()))
}

pub fn encode(id: &ObjectId) -> String {
    id.to_hex()
}
