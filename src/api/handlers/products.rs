//! Product handlers: CRUD with image upload.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::product::{Product, ProductList};

use super::super::error::{ApiError, ApiResult};
use super::super::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// Parsed multipart product form.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<f64>,
    image: Option<(String, Vec<u8>)>,
}

impl ProductForm {
    fn name(&self) -> ApiResult<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("missing form field: name"))
    }

    fn price(&self) -> ApiResult<f64> {
        self.price
            .ok_or_else(|| ApiError::bad_request("missing form field: price"))
    }
}

/// Collect the `name`, `price`, and `image` fields from a multipart body.
async fn parse_product_form(mut multipart: Multipart) -> ApiResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("reading multipart body: {e}")))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "name" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("reading name field: {e}")))?;
                form.name = Some(value);
            }
            "price" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("reading price field: {e}")))?;
                let price = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ApiError::bad_request(format!("invalid price: {value}")))?;
                form.price = Some(price);
            }
            "image" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("uploaded image has no filename"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("reading image field: {e}")))?;
                form.image = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Replace the stored image path with an inline data URI, failing when
/// the file has gone missing on disk.
async fn inline_image(state: &AppState, product: &mut Product) -> ApiResult<()> {
    if let Some(url) = product.image.take() {
        let data_uri = state
            .images
            .to_data_uri(&url)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("image file missing for '{url}'")))?;
        product.image = Some(data_uri);
    }
    Ok(())
}

/// List products with inlined images.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProductList>> {
    let mut products = state.products.list(query.limit, query.skip).await?;

    for product in &mut products {
        inline_image(&state, product).await?;
    }

    Ok(Json(ProductList { products }))
}

/// Get a single product with its image inlined.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<Product>> {
    let mut product = state
        .products
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    inline_image(&state, &mut product).await?;
    Ok(Json(product))
}

/// Create a product from a multipart form (`name`, `price`, `image`).
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let form = parse_product_form(multipart).await?;
    let name = form.name()?.to_string();
    let price = form.price()?;

    let (filename, bytes) = form
        .image
        .ok_or_else(|| ApiError::bad_request("missing form field: image"))?;
    let image_url = state.images.save(&filename, &bytes).await?;

    let product = state.products.create(&name, price, &image_url).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product; the image field is optional.
#[instrument(skip(state, multipart))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<Json<Product>> {
    let form = parse_product_form(multipart).await?;
    let name = form.name()?.to_string();
    let price = form.price()?;

    let image_url = match form.image {
        Some((filename, bytes)) => Some(state.images.save(&filename, &bytes).await?),
        None => None,
    };

    let product = state
        .products
        .update(product_id, &name, price, image_url.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let deleted = state.products.delete(product_id).await?;
    if !deleted {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(Json(json!({"detail": "Product deleted"})))
}
