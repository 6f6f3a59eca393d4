//! Product Repository

use super::sequence::{self, IdKind};
use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate};
use sqlx::SqlitePool;

const PRODUCT_COLUMNS: &str = "id, name, description, category, size, price, discount, quantity, \
                               image, shopkeeper_id, created_at";

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;

fn validate_numbers(
    price: Option<f64>,
    discount: Option<f64>,
    quantity: Option<i64>,
) -> RepoResult<()> {
    if let Some(price) = price
        && (!price.is_finite() || !(0.0..=MAX_PRICE).contains(&price))
    {
        return Err(RepoError::Validation(format!(
            "price must be between 0 and {MAX_PRICE}, got {price}"
        )));
    }
    if let Some(discount) = discount
        && (!discount.is_finite() || !(0.0..=100.0).contains(&discount))
    {
        return Err(RepoError::Validation(format!(
            "discount must be between 0 and 100, got {discount}"
        )));
    }
    if let Some(quantity) = quantity
        && quantity < 0
    {
        return Err(RepoError::Validation(format!(
            "quantity cannot be negative: {quantity}"
        )));
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Catalog listing, newest first
pub async fn find_all(pool: &SqlitePool, query: &ProductQuery) -> RepoResult<Vec<Product>> {
    let in_stock = query.in_stock.unwrap_or(false);
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE (? IS NULL OR category = ?) \
           AND (? IS NULL OR shopkeeper_id = ?) \
           AND (? = 0 OR quantity > 0) \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(&query.category)
    .bind(&query.category)
    .bind(&query.shopkeeper_id)
    .bind(&query.shopkeeper_id)
    .bind(in_stock)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_shopkeeper(
    pool: &SqlitePool,
    shopkeeper_id: &str,
) -> RepoResult<Vec<Product>> {
    let query = ProductQuery {
        shopkeeper_id: Some(shopkeeper_id.to_string()),
        ..Default::default()
    };
    find_all(pool, &query).await
}

pub async fn create(
    pool: &SqlitePool,
    shopkeeper_id: &str,
    data: ProductCreate,
) -> RepoResult<Product> {
    let discount = data.discount.unwrap_or(0.0);
    validate_numbers(Some(data.price), Some(discount), Some(data.quantity))?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id = sequence::next_id(&mut *tx, IdKind::Product).await?;

    sqlx::query(
        "INSERT INTO products (id, name, description, category, size, price, discount, quantity, image, shopkeeper_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.category.trim())
    .bind(&data.size)
    .bind(data.price)
    .bind(discount)
    .bind(data.quantity)
    .bind(&data.image)
    .bind(shopkeeper_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update restricted to the owning shopkeeper
///
/// A product owned by someone else is reported as not found.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    shopkeeper_id: &str,
    data: ProductUpdate,
) -> RepoResult<Product> {
    validate_numbers(data.price, data.discount, data.quantity)?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET \
            name = COALESCE(?, name), \
            description = COALESCE(?, description), \
            category = COALESCE(?, category), \
            size = COALESCE(?, size), \
            price = COALESCE(?, price), \
            discount = COALESCE(?, discount), \
            quantity = COALESCE(?, quantity), \
            image = COALESCE(?, image), \
            updated_at = ? \
         WHERE id = ? AND shopkeeper_id = ?",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.category.as_deref().map(str::trim))
    .bind(&data.size)
    .bind(data.price)
    .bind(data.discount)
    .bind(data.quantity)
    .bind(&data.image)
    .bind(now)
    .bind(id)
    .bind(shopkeeper_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id}")))
}

/// Delete a product owned by `shopkeeper_id`
///
/// Products referenced by order lines stay (foreign key) and yield
/// [`RepoError::Referenced`]; cart lines holding it are removed with it.
pub async fn delete(pool: &SqlitePool, id: &str, shopkeeper_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ? AND shopkeeper_id = ?")
        .bind(id)
        .bind(shopkeeper_id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }
    Ok(())
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;
    use shared::models::{AccountStatus, Role};

    fn create_payload(name: &str, price: f64, quantity: i64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: Some("Hand made".into()),
            category: "Home".into(),
            size: Some("S,M".into()),
            price,
            discount: None,
            quantity,
            image: None,
        }
    }

    async fn setup() -> SqlitePool {
        let pool = test_pool().await;
        seed_account(&pool, "S1111", Role::Shopkeeper, AccountStatus::Active).await;
        seed_account(&pool, "S1112", Role::Shopkeeper, AccountStatus::Active).await;
        pool
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = setup().await;
        let product = create(&pool, "S1111", create_payload("Mug", 12.5, 4)).await.unwrap();
        assert_eq!(product.id, "P1111");
        assert_eq!(product.discount, 0.0);
        assert_eq!(product.sizes(), vec!["S", "M"]);

        let found = find_by_id(&pool, "P1111").await.unwrap().unwrap();
        assert_eq!(found.name, "Mug");
        assert_eq!(found.shopkeeper_id, "S1111");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_numbers() {
        let pool = setup().await;
        let err = create(&pool, "S1111", create_payload("Mug", -1.0, 4)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let mut payload = create_payload("Mug", 1.0, 4);
        payload.discount = Some(101.0);
        assert!(matches!(
            create(&pool, "S1111", payload).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert_eq!(count_all(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filters() {
        let pool = setup().await;
        create(&pool, "S1111", create_payload("Mug", 1.0, 0)).await.unwrap();
        create(&pool, "S1112", create_payload("Bowl", 2.0, 3)).await.unwrap();

        let in_stock = find_all(
            &pool,
            &ProductQuery {
                in_stock: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].name, "Bowl");

        let mine = find_by_shopkeeper(&pool, "S1111").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Mug");

        let none = find_all(
            &pool,
            &ProductQuery {
                category: Some("Garden".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_is_owner_only() {
        let pool = setup().await;
        create(&pool, "S1111", create_payload("Mug", 1.0, 1)).await.unwrap();

        let patch = ProductUpdate {
            price: Some(9.99),
            quantity: Some(7),
            ..Default::default()
        };
        let err = update(&pool, "P1111", "S1112", patch.clone()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let updated = update(&pool, "P1111", "S1111", patch).await.unwrap();
        assert_eq!(updated.price, 9.99);
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.name, "Mug");
    }

    #[tokio::test]
    async fn test_delete_referenced_product_is_refused() {
        let pool = setup().await;
        seed_account(&pool, "C11111", Role::Customer, AccountStatus::Active).await;
        create(&pool, "S1111", create_payload("Mug", 1.0, 1)).await.unwrap();
        sqlx::query(
            "INSERT INTO orders (id, customer_id, total_amount, shipping_address, created_at, updated_at) \
             VALUES ('ORD10001', 'C11111', 1.0, 'x', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) \
             VALUES ('ORD10001', 'P1111', 1, 1.0, 1.0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = delete(&pool, "P1111", "S1111").await.unwrap_err();
        assert!(matches!(err, RepoError::Referenced(_)));
        assert!(find_by_id(&pool, "P1111").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_cart_lines() {
        let pool = setup().await;
        seed_account(&pool, "C11111", Role::Customer, AccountStatus::Active).await;
        create(&pool, "S1111", create_payload("Mug", 1.0, 5)).await.unwrap();
        seed_cart_line(&pool, "C11111", "P1111", 2).await;

        delete(&pool, "P1111", "S1111").await.unwrap();
        assert_eq!(count(&pool, "cart_lines").await, 0);
    }
}
