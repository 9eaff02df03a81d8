//! PostgreSQL Commerce Store
//!
//! Checkout and the webhook state machine run inside transactions; the
//! order row is locked before any enrollment or counter change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{
    CartId, CartItemId, CourseId, EnrollmentId, OrderId, OrderItemId, PaymentId, UserId,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{
    Cart, CartItem, Enrollment, Order, OrderItem, OrderStatus, Payment, PaymentOutcome,
    WebhookEvent,
};

/// Cart item joined with its course for display
#[derive(Debug, Clone)]
pub struct CartItemDetail {
    pub item: CartItem,
    pub course_title: String,
    pub course_slug: String,
    /// Current effective price, which may have drifted from the captured one
    pub current_price: Decimal,
}

#[derive(Clone)]
pub struct PgCommerceStore {
    pool: PgPool,
}

impl PgCommerceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    pub async fn get_or_create_cart(&self, user_id: UserId) -> AppResult<Cart> {
        if let Some(row) = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(row.into_cart());
        }

        let cart = Cart::new(user_id);
        sqlx::query(
            r#"
            INSERT INTO carts (cart_id, user_id, subtotal, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(cart.cart_id.as_uuid())
        .bind(cart.user_id.as_uuid())
        .bind(cart.subtotal)
        .bind(cart.total)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        // A concurrent request may have won the insert
        let row = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into_cart())
    }

    pub async fn list_cart_items(&self, cart_id: CartId) -> AppResult<Vec<CartItemDetail>> {
        let rows = sqlx::query_as::<_, CartItemDetailRow>(
            r#"
            SELECT i.*, c.title AS course_title, c.slug AS course_slug,
                   c.price AS list_price, c.discount_price
            FROM cart_items i
            JOIN courses c ON c.course_id = i.course_id
            WHERE i.cart_id = $1
            ORDER BY i.created_at
            "#,
        )
        .bind(cart_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItemDetailRow::into_detail).collect())
    }

    /// Add a published course to the cart at its current effective price.
    ///
    /// Duplicates in the cart are a conflict; an already-enrolled course
    /// is unprocessable.
    pub async fn add_to_cart(&self, cart: &Cart, course_id: CourseId) -> AppResult<CartItem> {
        let course = sqlx::query_as::<_, CoursePriceRow>(
            "SELECT course_id, title, price, discount_price, status FROM courses WHERE course_id = $1",
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

        if course.status != "published" {
            return Err(AppError::unprocessable("Course is not available for purchase"));
        }

        let already_in_cart = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cart_items WHERE cart_id = $1 AND course_id = $2",
        )
        .bind(cart.cart_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        if already_in_cart > 0 {
            return Err(AppError::conflict("Course is already in your cart"));
        }

        if self.has_active_enrollment(cart.user_id, course_id).await? {
            return Err(AppError::unprocessable(
                "You are already enrolled in this course",
            ));
        }

        let item = CartItem::new(cart.cart_id, course_id, course.effective_price());

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO cart_items (cart_item_id, cart_id, course_id, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.cart_item_id.as_uuid())
        .bind(item.cart_id.as_uuid())
        .bind(item.course_id.as_uuid())
        .bind(item.price)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await?;

        recalculate_cart(&mut tx, cart.cart_id).await?;
        tx.commit().await?;

        Ok(item)
    }

    pub async fn remove_cart_item(
        &self,
        cart: &Cart,
        cart_item_id: CartItemId,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "DELETE FROM cart_items WHERE cart_item_id = $1 AND cart_id = $2",
        )
        .bind(cart_item_id.as_uuid())
        .bind(cart.cart_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Cart item not found"));
        }

        recalculate_cart(&mut tx, cart.cart_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Reprice every item to the current effective price
    pub async fn refresh_cart_prices(&self, cart: &Cart) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE cart_items i
            SET price = CASE
                    WHEN c.discount_price IS NOT NULL AND c.discount_price < c.price
                    THEN c.discount_price
                    ELSE c.price
                END,
                updated_at = NOW()
            FROM courses c
            WHERE c.course_id = i.course_id AND i.cart_id = $1
            "#,
        )
        .bind(cart.cart_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        recalculate_cart(&mut tx, cart.cart_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn clear_cart(&self, cart: &Cart) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.cart_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        recalculate_cart(&mut tx, cart.cart_id).await?;
        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Checkout
    // ------------------------------------------------------------------

    /// Turn the cart into a pending order with inactive enrollments,
    /// all in one transaction. Items are repriced to the current
    /// effective price; unpublished courses abort the checkout.
    pub async fn checkout(&self, user_id: UserId) -> AppResult<(Order, Vec<OrderItem>)> {
        let mut tx = self.pool.begin().await?;

        let cart = sqlx::query_as::<_, CartRow>(
            "SELECT * FROM carts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::unprocessable("Your cart is empty"))?
        .into_cart();

        let courses = sqlx::query_as::<_, CheckoutItemRow>(
            r#"
            SELECT i.course_id, c.title, c.price, c.discount_price, c.status
            FROM cart_items i
            JOIN courses c ON c.course_id = i.course_id
            WHERE i.cart_id = $1
            ORDER BY i.created_at
            "#,
        )
        .bind(cart.cart_id.as_uuid())
        .fetch_all(&mut *tx)
        .await?;

        if courses.is_empty() {
            return Err(AppError::unprocessable("Your cart is empty"));
        }

        let mut subtotal = Decimal::ZERO;
        let mut total = Decimal::ZERO;
        for course in &courses {
            if course.status != "published" {
                return Err(AppError::unprocessable(format!(
                    "\"{}\" is no longer available",
                    course.title
                )));
            }
            subtotal += course.price;
            total += course.effective_price();
        }

        let order = Order::new(user_id, subtotal, subtotal - total);

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, user_id, order_number, subtotal, discount, total,
                status, payment_method, paid_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(&order.order_number)
        .bind(order.subtotal)
        .bind(order.discount)
        .bind(order.total)
        .bind(order.status.as_str())
        .bind(&order.payment_method)
        .bind(order.paid_at)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(courses.len());
        for course in courses {
            let price = course.effective_price();
            let item = OrderItem::new(
                order.order_id,
                CourseId::from_uuid(course.course_id),
                course.title,
                price,
            );

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_item_id, order_id, course_id, course_title, price, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.order_item_id.as_uuid())
            .bind(item.order_id.as_uuid())
            .bind(item.course_id.as_uuid())
            .bind(&item.course_title)
            .bind(item.price)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            let enrollment =
                Enrollment::for_purchase(user_id, item.course_id, item.order_item_id);
            insert_enrollment(&mut tx, &enrollment).await?;

            items.push(item);
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.cart_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        recalculate_cart(&mut tx, cart.cart_id).await?;

        tx.commit().await?;
        Ok((order, items))
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    pub async fn list_orders(&self, user_id: UserId) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    pub async fn find_order_by_number(
        &self,
        order_number: &str,
    ) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = row.into_order()?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at",
        )
        .bind(order.order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some((
            order,
            items.into_iter().map(OrderItemRow::into_item).collect(),
        )))
    }

    // ------------------------------------------------------------------
    // Webhook state machine
    // ------------------------------------------------------------------

    /// Record the payment and apply the outcome to the order and its
    /// enrollments. Idempotent: a paid order ignores further
    /// settlement events, and the payment row is upserted per
    /// transaction id.
    pub async fn apply_webhook(
        &self,
        event: &WebhookEvent,
        outcome: PaymentOutcome,
    ) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;

        let mut order = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE order_number = $1 FOR UPDATE",
        )
        .bind(&event.order_number)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?
        .into_order()?;

        upsert_payment(&mut tx, &order, event).await?;

        match outcome {
            PaymentOutcome::Settle => {
                if order.is_paid() {
                    tracing::info!(order_number = %order.order_number, "order already paid, ignoring");
                    tx.commit().await?;
                    return Ok(order);
                }

                order.mark_paid(event.payment_type.clone());
                update_order_status(&mut tx, &order).await?;

                // Counters track rows actually activated here, so a
                // settle after a refund does not double count.
                let activated: Vec<(Option<Uuid>,)> = sqlx::query_as(
                    r#"
                    UPDATE enrollments SET enrolled_at = NOW(), updated_at = NOW()
                    WHERE enrolled_at IS NULL AND order_item_id IN (
                        SELECT order_item_id FROM order_items WHERE order_id = $1
                    )
                    RETURNING course_id
                    "#,
                )
                .bind(order.order_id.as_uuid())
                .fetch_all(&mut *tx)
                .await?;

                for (course_id, n) in tally_courses(activated.into_iter().map(|(c,)| c)) {
                    sqlx::query(
                        "UPDATE courses SET total_enrollments = total_enrollments + $2
                         WHERE course_id = $1",
                    )
                    .bind(course_id)
                    .bind(n)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            PaymentOutcome::Fail => {
                order.mark_failed();
                update_order_status(&mut tx, &order).await?;

                sqlx::query(
                    r#"
                    DELETE FROM enrollments
                    WHERE enrolled_at IS NULL AND order_item_id IN (
                        SELECT order_item_id FROM order_items WHERE order_id = $1
                    )
                    "#,
                )
                .bind(order.order_id.as_uuid())
                .execute(&mut *tx)
                .await?;
            }
            PaymentOutcome::Refund => {
                order.mark_refunded();
                update_order_status(&mut tx, &order).await?;

                let deactivated: Vec<(Option<Uuid>,)> = sqlx::query_as(
                    r#"
                    UPDATE enrollments SET enrolled_at = NULL, updated_at = NOW()
                    WHERE enrolled_at IS NOT NULL AND order_item_id IN (
                        SELECT order_item_id FROM order_items WHERE order_id = $1
                    )
                    RETURNING course_id
                    "#,
                )
                .bind(order.order_id.as_uuid())
                .fetch_all(&mut *tx)
                .await?;

                for (course_id, n) in tally_courses(deactivated.into_iter().map(|(c,)| c)) {
                    sqlx::query(
                        "UPDATE courses SET total_enrollments = GREATEST(total_enrollments - $2, 0)
                         WHERE course_id = $1",
                    )
                    .bind(course_id)
                    .bind(n)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            PaymentOutcome::StillPending => {}
        }

        tx.commit().await?;
        Ok(order)
    }

    // ------------------------------------------------------------------
    // Enrollments
    // ------------------------------------------------------------------

    pub async fn has_active_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM enrollments
            WHERE user_id = $1 AND course_id = $2
              AND enrolled_at IS NOT NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn list_active_enrollments(&self, user_id: UserId) -> AppResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT * FROM enrollments
            WHERE user_id = $1 AND enrolled_at IS NOT NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY enrolled_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EnrollmentRow::into_enrollment).collect())
    }
}

/// Count enrollment changes per course. Class-only enrollments carry
/// no course id and do not move a counter.
fn tally_courses(course_ids: impl IntoIterator<Item = Option<Uuid>>) -> BTreeMap<Uuid, i64> {
    let mut counts = BTreeMap::new();
    for id in course_ids.into_iter().flatten() {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

async fn recalculate_cart(tx: &mut Transaction<'_, Postgres>, cart_id: CartId) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE carts SET
            subtotal = COALESCE((SELECT SUM(price) FROM cart_items WHERE cart_id = $1), 0),
            total = COALESCE((SELECT SUM(price) FROM cart_items WHERE cart_id = $1), 0),
            updated_at = NOW()
        WHERE cart_id = $1
        "#,
    )
    .bind(cart_id.as_uuid())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_enrollment(
    tx: &mut Transaction<'_, Postgres>,
    enrollment: &Enrollment,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO enrollments (
            enrollment_id, user_id, course_id, order_item_id, batch_id,
            enrolled_at, expires_at, progress, completed_at, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(enrollment.enrollment_id.as_uuid())
    .bind(enrollment.user_id.as_uuid())
    .bind(enrollment.course_id.map(|id| id.into_uuid()))
    .bind(enrollment.order_item_id.map(|id| id.into_uuid()))
    .bind(enrollment.batch_id.map(|id| id.into_uuid()))
    .bind(enrollment.enrolled_at)
    .bind(enrollment.expires_at)
    .bind(enrollment.progress)
    .bind(enrollment.completed_at)
    .bind(enrollment.created_at)
    .bind(enrollment.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn update_order_status(
    tx: &mut Transaction<'_, Postgres>,
    order: &Order,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE orders SET
            status = $2, payment_method = $3, paid_at = $4, updated_at = $5
        WHERE order_id = $1
        "#,
    )
    .bind(order.order_id.as_uuid())
    .bind(order.status.as_str())
    .bind(&order.payment_method)
    .bind(order.paid_at)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn upsert_payment(
    tx: &mut Transaction<'_, Postgres>,
    order: &Order,
    event: &WebhookEvent,
) -> AppResult<()> {
    let payment = Payment {
        payment_id: PaymentId::new(),
        order_id: order.order_id,
        gateway: "midtrans".to_string(),
        method: event.payment_type.clone(),
        transaction_id: event.transaction_id.clone(),
        status: event.transaction_status.clone(),
        amount: event.gross_amount,
        raw_payload: serde_json::to_value(event)
            .map_err(|e| AppError::internal(format!("Failed to encode payload: {}", e)))?,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO payments (
            payment_id, order_id, gateway, method, transaction_id,
            status, amount, raw_payload, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (transaction_id) DO UPDATE SET
            method = EXCLUDED.method,
            status = EXCLUDED.status,
            amount = EXCLUDED.amount,
            raw_payload = EXCLUDED.raw_payload,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(payment.payment_id.as_uuid())
    .bind(payment.order_id.as_uuid())
    .bind(&payment.gateway)
    .bind(&payment.method)
    .bind(&payment.transaction_id)
    .bind(&payment.status)
    .bind(payment.amount)
    .bind(&payment.raw_payload)
    .bind(payment.created_at)
    .bind(payment.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// Row types for sqlx mapping

#[derive(sqlx::FromRow)]
struct CartRow {
    cart_id: Uuid,
    user_id: Uuid,
    subtotal: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Cart {
        Cart {
            cart_id: CartId::from_uuid(self.cart_id),
            user_id: UserId::from_uuid(self.user_id),
            subtotal: self.subtotal,
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemDetailRow {
    cart_item_id: Uuid,
    cart_id: Uuid,
    course_id: Uuid,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    course_title: String,
    course_slug: String,
    list_price: Decimal,
    discount_price: Option<Decimal>,
}

impl CartItemDetailRow {
    fn into_detail(self) -> CartItemDetail {
        let current_price = match self.discount_price {
            Some(discount) if discount < self.list_price => discount,
            _ => self.list_price,
        };

        CartItemDetail {
            item: CartItem {
                cart_item_id: CartItemId::from_uuid(self.cart_item_id),
                cart_id: CartId::from_uuid(self.cart_id),
                course_id: CourseId::from_uuid(self.course_id),
                price: self.price,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            course_title: self.course_title,
            course_slug: self.course_slug,
            current_price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CoursePriceRow {
    #[allow(dead_code)]
    course_id: Uuid,
    #[allow(dead_code)]
    title: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    status: String,
}

impl CoursePriceRow {
    fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CheckoutItemRow {
    course_id: Uuid,
    title: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    status: String,
}

impl CheckoutItemRow {
    fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    user_id: Uuid,
    order_number: String,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    status: String,
    payment_method: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        Ok(Order {
            order_id: OrderId::from_uuid(self.order_id),
            user_id: UserId::from_uuid(self.user_id),
            order_number: self.order_number,
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            status: OrderStatus::parse(&self.status)?,
            payment_method: self.payment_method,
            paid_at: self.paid_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_item_id: Uuid,
    order_id: Uuid,
    course_id: Uuid,
    course_title: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_item(self) -> OrderItem {
        OrderItem {
            order_item_id: OrderItemId::from_uuid(self.order_item_id),
            order_id: OrderId::from_uuid(self.order_id),
            course_id: CourseId::from_uuid(self.course_id),
            course_title: self.course_title,
            price: self.price,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    enrollment_id: Uuid,
    user_id: Uuid,
    course_id: Option<Uuid>,
    order_item_id: Option<Uuid>,
    batch_id: Option<Uuid>,
    enrolled_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    progress: Decimal,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn into_enrollment(self) -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId::from_uuid(self.enrollment_id),
            user_id: UserId::from_uuid(self.user_id),
            course_id: self.course_id.map(CourseId::from_uuid),
            order_item_id: self.order_item_id.map(OrderItemId::from_uuid),
            batch_id: self.batch_id.map(kernel::id::BatchId::from_uuid),
            enrolled_at: self.enrolled_at,
            expires_at: self.expires_at,
            progress: self.progress,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tally_courses;
    use uuid::Uuid;

    #[test]
    fn test_tally_counts_per_course() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let counts = tally_courses(vec![Some(a), Some(b), Some(a), None]);

        assert_eq!(counts.get(&a), Some(&2));
        assert_eq!(counts.get(&b), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_tally_empty_when_nothing_changed() {
        assert!(tally_courses(vec![]).is_empty());
        assert!(tally_courses(vec![None, None]).is_empty());
    }
}
