//! Catalog item (product listing) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A persisted product listing, as read back from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub millet_type: String,
    pub product_form: String,
    pub description: Option<String>,
    pub available_quantity_kg: f64,
    pub price_per_kg: f64,
    pub minimum_order_kg: f64,
    pub harvest_date: Option<String>,
    pub organic_certified: bool,
    pub quality_grade: Option<String>,
    pub moisture_content: Option<f64>,
    pub location_state: String,
    pub location_district: String,
    pub seller_id: String,
    pub certifications: Vec<String>,
    pub images: Vec<String>,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a listing. Identity and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    pub title: String,
    pub millet_type: String,
    pub product_form: String,
    #[serde(default)]
    pub description: Option<String>,
    pub available_quantity_kg: f64,
    pub price_per_kg: f64,
    #[serde(default = "default_minimum_order_kg")]
    pub minimum_order_kg: f64,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[serde(default)]
    pub organic_certified: bool,
    #[serde(default)]
    pub quality_grade: Option<String>,
    #[serde(default)]
    pub moisture_content: Option<f64>,
    pub location_state: String,
    pub location_district: String,
    pub seller_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_minimum_order_kg() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl NewProduct {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("millet_type", &self.millet_type),
            ("product_form", &self.product_form),
            ("location_state", &self.location_state),
            ("location_district", &self.location_district),
            ("seller_id", &self.seller_id),
        ] {
            require_text(field, value)?;
        }
        for (field, value) in [
            ("available_quantity_kg", Some(self.available_quantity_kg)),
            ("price_per_kg", Some(self.price_per_kg)),
            ("minimum_order_kg", Some(self.minimum_order_kg)),
            ("moisture_content", self.moisture_content),
        ] {
            if let Some(v) = value {
                require_amount(field, v)?;
            }
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("'{field}' must not be empty"));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{field}' must be a non-negative number"));
    }
    Ok(())
}

/// Partial update. An absent field keeps its stored value.
///
/// Nullable columns use `Option<Option<_>>`: absent is `None`, an explicit JSON
/// `null` is `Some(None)` and clears the column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProductPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub millet_type: Option<String>,
    #[serde(default)]
    pub product_form: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub available_quantity_kg: Option<f64>,
    #[serde(default)]
    pub price_per_kg: Option<f64>,
    #[serde(default)]
    pub minimum_order_kg: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub harvest_date: Option<Option<String>>,
    #[serde(default)]
    pub organic_certified: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub quality_grade: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub moisture_content: Option<Option<f64>>,
    #[serde(default)]
    pub location_state: Option<String>,
    #[serde(default)]
    pub location_district: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<String>>)]
    pub certifications: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<String>>)]
    pub images: Option<Option<Vec<String>>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }

    /// Same rules as [`NewProduct::validate`], applied to the fields present.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("millet_type", &self.millet_type),
            ("product_form", &self.product_form),
            ("location_state", &self.location_state),
            ("location_district", &self.location_district),
        ] {
            if let Some(v) = value {
                require_text(field, v)?;
            }
        }
        for (field, value) in [
            ("available_quantity_kg", self.available_quantity_kg),
            ("price_per_kg", self.price_per_kg),
            ("minimum_order_kg", self.minimum_order_kg),
            ("moisture_content", self.moisture_content.flatten()),
        ] {
            if let Some(v) = value {
                require_amount(field, v)?;
            }
        }
        Ok(())
    }
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

fn null_as_empty<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(de)?.unwrap_or_default())
}
