//! Schema for the metadata the storefront attaches to a checkout session.
//!
//! The payment processor echoes this back verbatim, so it is parsed as
//! untrusted input.

use thiserror::Error;
use uuid::Uuid;

use crate::gateway::CheckoutSession;

const USER_ID_KEY: &str = "userId";
const CART_ITEMS_KEY: &str = "cartItems";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("checkout metadata is missing '{0}'")]
    Missing(&'static str),

    #[error("checkout metadata 'userId' is not a valid id")]
    InvalidUserId,

    #[error("checkout metadata 'cartItems' must be a JSON array of book ids")]
    InvalidCartItems,

    #[error("checkout metadata 'cartItems' is empty")]
    EmptyCart,
}

/// Buyer and cart contents of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMetadata {
    pub user_id: Uuid,
    pub cart_items: Vec<Uuid>,
}

impl CheckoutMetadata {
    pub fn from_session(session: &CheckoutSession) -> Result<Self, MetadataError> {
        let raw_user = session
            .metadata
            .get(USER_ID_KEY)
            .ok_or(MetadataError::Missing(USER_ID_KEY))?;
        let user_id = Uuid::parse_str(raw_user.trim()).map_err(|_| MetadataError::InvalidUserId)?;

        let raw_cart = session
            .metadata
            .get(CART_ITEMS_KEY)
            .ok_or(MetadataError::Missing(CART_ITEMS_KEY))?;
        let cart_items: Vec<Uuid> =
            serde_json::from_str(raw_cart).map_err(|_| MetadataError::InvalidCartItems)?;

        if cart_items.is_empty() {
            return Err(MetadataError::EmptyCart);
        }

        Ok(Self {
            user_id,
            cart_items,
        })
    }
}
