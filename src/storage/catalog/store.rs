//! Product catalog persisted in a single SQLite table.

use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::storage::catalog::codec::{decode_set, encode_set};
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::debug;

const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    millet_type TEXT NOT NULL,
    product_form TEXT NOT NULL,
    description TEXT,
    available_quantity_kg REAL NOT NULL,
    price_per_kg REAL NOT NULL,
    minimum_order_kg REAL NOT NULL DEFAULT 1,
    harvest_date TEXT,
    organic_certified BOOLEAN NOT NULL DEFAULT 0,
    quality_grade TEXT,
    moisture_content REAL,
    location_state TEXT NOT NULL,
    location_district TEXT NOT NULL,
    seller_id TEXT NOT NULL,
    certifications TEXT,
    images TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, title, millet_type, product_form, description,
    available_quantity_kg, price_per_kg, minimum_order_kg, harvest_date, organic_certified,
    quality_grade, moisture_content, location_state, location_district, seller_id,
    certifications, images, is_active, created_at FROM products";

/// CRUD over the `products` table. Cheap to clone (shares the pool).
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Connects to `database_url` and makes sure the schema exists.
    ///
    /// In-memory databases get a single long-lived connection, since every
    /// SQLite connection would otherwise see its own empty database.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid DATABASE_URL {database_url:?}"))?
            .create_if_missing(true);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(CREATE_PRODUCTS_TABLE).execute(&pool).await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_seller ON products (seller_id)")
            .execute(&pool)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a listing and returns it as persisted (id and `created_at` assigned here).
    pub async fn create(&self, product: &NewProduct) -> anyhow::Result<Product> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let id = sqlx::query(
            "INSERT INTO products (
                title, millet_type, product_form, description, available_quantity_kg,
                price_per_kg, minimum_order_kg, harvest_date, organic_certified,
                quality_grade, moisture_content, location_state, location_district,
                seller_id, certifications, images, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.title)
        .bind(&product.millet_type)
        .bind(&product.product_form)
        .bind(&product.description)
        .bind(product.available_quantity_kg)
        .bind(product.price_per_kg)
        .bind(product.minimum_order_kg)
        .bind(&product.harvest_date)
        .bind(product.organic_certified)
        .bind(&product.quality_grade)
        .bind(product.moisture_content)
        .bind(&product.location_state)
        .bind(&product.location_district)
        .bind(&product.seller_id)
        .bind(encode_set(&product.certifications)?)
        .bind(encode_set(&product.images)?)
        .bind(product.is_active)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, seller_id = %product.seller_id, "Product created");

        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("product {} missing right after insert", id))
    }

    /// All listings, newest first, optionally restricted to one seller.
    pub async fn list(&self, seller_id: Option<&str>) -> anyhow::Result<Vec<Product>> {
        let rows = match seller_id {
            Some(seller) => {
                sqlx::query(&format!(
                    "{SELECT_COLUMNS} WHERE seller_id = ? ORDER BY created_at DESC, id DESC"
                ))
                .bind(seller)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(product_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Applies the fields present in `patch` and returns the row as re-read afterwards.
    ///
    /// Returns `Ok(None)` without writing when `id` does not exist. An empty patch
    /// returns the current row unchanged.
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> anyhow::Result<Option<Product>> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(current));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(v) = &patch.title {
                set.push("title = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.millet_type {
                set.push("millet_type = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.product_form {
                set.push("product_form = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.description {
                set.push("description = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.available_quantity_kg {
                set.push("available_quantity_kg = ").push_bind_unseparated(v);
            }
            if let Some(v) = patch.price_per_kg {
                set.push("price_per_kg = ").push_bind_unseparated(v);
            }
            if let Some(v) = patch.minimum_order_kg {
                set.push("minimum_order_kg = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.harvest_date {
                set.push("harvest_date = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.organic_certified {
                set.push("organic_certified = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.quality_grade {
                set.push("quality_grade = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.moisture_content {
                set.push("moisture_content = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.location_state {
                set.push("location_state = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.location_district {
                set.push("location_district = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.certifications {
                let encoded = encode_set(v.as_deref().unwrap_or_default())?;
                set.push("certifications = ").push_bind_unseparated(encoded);
            }
            if let Some(v) = &patch.images {
                let encoded = encode_set(v.as_deref().unwrap_or_default())?;
                set.push("images = ").push_bind_unseparated(encoded);
            }
            if let Some(v) = patch.is_active {
                set.push("is_active = ").push_bind_unseparated(v);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        qb.build().execute(&self.pool).await?;
        debug!(id, "Product updated");

        self.get(id).await
    }

    /// Removes a listing. `false` means there was nothing to remove.
    pub async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn product_from_row(row: &SqliteRow) -> anyhow::Result<Product> {
    let certifications: Option<String> = row.try_get("certifications")?;
    let images: Option<String> = row.try_get("images")?;
    let created_at: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("invalid created_at {created_at:?}"))?
        .with_timezone(&Utc);

    Ok(Product {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        millet_type: row.try_get("millet_type")?,
        product_form: row.try_get("product_form")?,
        description: row.try_get("description")?,
        available_quantity_kg: row.try_get("available_quantity_kg")?,
        price_per_kg: row.try_get("price_per_kg")?,
        minimum_order_kg: row.try_get("minimum_order_kg")?,
        harvest_date: row.try_get("harvest_date")?,
        organic_certified: row.try_get("organic_certified")?,
        quality_grade: row.try_get("quality_grade")?,
        moisture_content: row.try_get("moisture_content")?,
        location_state: row.try_get("location_state")?,
        location_district: row.try_get("location_district")?,
        seller_id: row.try_get("seller_id")?,
        certifications: decode_set("certifications", certifications.as_deref()),
        images: decode_set("images", images.as_deref()),
        is_active: row.try_get("is_active")?,
        created_at,
    })
}
