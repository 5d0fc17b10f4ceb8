// storefront/src/store/buyers.rs

use std::collections::HashMap;

use tracing::{debug, instrument};

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{Buyer, BuyerWithOrders, NewBuyer, Order};

const BUYER_COLUMNS: &str = "id, name, phone, delivery_option, department, city, address, created_at, updated_at";

impl RecordStore {
  /// Inserts a buyer and returns the assigned id. Address columns are NULL for pickup.
  #[instrument(name = "RecordStore::insert_buyer", skip_all, fields(delivery_option = %buyer.delivery.option()))]
  pub async fn insert_buyer(&self, buyer: &NewBuyer) -> StoreResult<i64> {
    if buyer.name.trim().is_empty() || buyer.phone.trim().is_empty() {
      return Err(StoreError::Validation("buyer name and phone must not be empty".to_string()));
    }
    let address = buyer.delivery.address();

    let result = sqlx::query(
      "INSERT INTO buyers (name, phone, delivery_option, department, city, address) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&buyer.name)
    .bind(&buyer.phone)
    .bind(buyer.delivery.option().as_str())
    .bind(address.map(|a| a.department.as_str()))
    .bind(address.map(|a| a.city.as_str()))
    .bind(address.map(|a| a.address.as_str()))
    .execute(&self.pool)
    .await?;

    let buyer_id = result.last_insert_rowid();
    debug!(buyer_id, "Buyer inserted.");
    Ok(buyer_id)
  }

  pub async fn get_buyer(&self, buyer_id: i64) -> StoreResult<Option<Buyer>> {
    let buyer = sqlx::query_as::<_, Buyer>(&format!("SELECT {BUYER_COLUMNS} FROM buyers WHERE id = ?"))
      .bind(buyer_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(buyer)
  }

  /// Every buyer, newest first, each with all of their order lines.
  #[instrument(name = "RecordStore::list_buyers_with_orders", skip_all)]
  pub async fn list_buyers_with_orders(&self) -> StoreResult<Vec<BuyerWithOrders>> {
    let buyers = sqlx::query_as::<_, Buyer>(&format!(
      "SELECT {BUYER_COLUMNS} FROM buyers ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(&self.pool)
    .await?;

    let mut orders_by_buyer: HashMap<i64, Vec<Order>> = HashMap::new();
    for order in self.list_all_orders().await? {
      orders_by_buyer.entry(order.buyer_id).or_default().push(order);
    }

    Ok(
      buyers
        .into_iter()
        .map(|buyer| {
          let orders = orders_by_buyer.remove(&buyer.id).unwrap_or_default();
          BuyerWithOrders { buyer, orders }
        })
        .collect(),
    )
  }
}
