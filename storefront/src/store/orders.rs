// storefront/src/store/orders.rs

use tracing::{debug, instrument};

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{NewOrderLine, Order, PaymentStatus};

const ORDER_COLUMNS: &str = "id, buyer_id, product_id, product_name, quantity, unit_price, total_price, \
                             payment_status, mercado_pago_id, created_at, updated_at";

impl RecordStore {
  /// Records one cart line for `buyer_id`; the line starts out pending.
  #[instrument(name = "RecordStore::insert_order", skip(self, line), fields(product_id = %line.product_id))]
  pub async fn insert_order(&self, buyer_id: i64, line: &NewOrderLine) -> StoreResult<i64> {
    validate_line(line)?;

    let result = sqlx::query(
      "INSERT INTO orders (buyer_id, product_id, product_name, quantity, unit_price, total_price) \
       VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(buyer_id)
    .bind(&line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.total_price())
    .execute(&self.pool)
    .await?;

    let order_id = result.last_insert_rowid();
    debug!(order_id, "Order line inserted.");
    Ok(order_id)
  }

  pub async fn list_orders(&self, buyer_id: i64) -> StoreResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = ? ORDER BY id"))
      .bind(buyer_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  pub(super) async fn list_all_orders(&self) -> StoreResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  /// Marks every order of `buyer_id` approved and returns how many rows matched.
  /// Re-applying it to approved rows changes nothing but `updated_at`.
  #[instrument(name = "RecordStore::mark_orders_approved", skip(self))]
  pub async fn mark_orders_approved(&self, buyer_id: i64) -> StoreResult<u64> {
    let result = sqlx::query("UPDATE orders SET payment_status = ?, updated_at = CURRENT_TIMESTAMP WHERE buyer_id = ?")
      .bind(PaymentStatus::Approved)
      .bind(buyer_id)
      .execute(&self.pool)
      .await?;
    debug!(rows = result.rows_affected(), "Orders marked approved.");
    Ok(result.rows_affected())
  }
}

fn validate_line(line: &NewOrderLine) -> StoreResult<()> {
  if line.product_id.trim().is_empty() || line.product_name.trim().is_empty() {
    return Err(StoreError::Validation("order product id and name must not be empty".to_string()));
  }
  if line.quantity <= 0 {
    return Err(StoreError::Validation(format!("order quantity must be positive, got {}", line.quantity)));
  }
  if !line.unit_price.is_finite() || line.unit_price < 0.0 {
    return Err(StoreError::Validation(format!(
      "order unit price must be a non-negative number, got {}",
      line.unit_price
    )));
  }
  Ok(())
}
