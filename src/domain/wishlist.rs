use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerId, ProductId};

/// Product saved by a customer for later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub created_at: NaiveDateTime,
}
