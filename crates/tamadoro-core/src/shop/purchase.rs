use crate::error::PurchaseRejection;

use super::{ItemId, ShopItem};

/// Decide whether `item` can be bought.
///
/// Ownership is checked before price, so buying an owned item is rejected as
/// `AlreadyOwned` whatever the balance. On success returns the balance after
/// paying, which is never negative.
pub fn evaluate_purchase(
    item: &ShopItem,
    balance: u32,
    owned: &[ItemId],
) -> Result<u32, PurchaseRejection> {
    if owned.contains(&item.id) {
        return Err(PurchaseRejection::AlreadyOwned(item.id));
    }
    balance
        .checked_sub(item.price)
        .ok_or(PurchaseRejection::InsufficientPoints {
            price: item.price,
            balance,
        })
}
