use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use rust_decimal::Decimal;
use sqlx::types::Json as DbJson;
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, ProductView, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::AdminAuth,
    models::Product,
    pricing::ProductAttributes,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product))
        .route("/{id}", put(update_product))
        .route("/{id}", delete(delete_product))
}

fn validate_terms(base_price: Decimal, discount_percentage: Decimal) -> AppResult<()> {
    if base_price < Decimal::ZERO {
        return Err(AppError::BadRequest("base_price must be >= 0".into()));
    }
    if discount_percentage < Decimal::ZERO || discount_percentage > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest(
            "discount_percentage must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

fn validate_attributes(attributes: &ProductAttributes) -> AppResult<()> {
    for (axis, entries) in [("size", &attributes.size), ("color", &attributes.color)] {
        for (i, entry) in entries.iter().enumerate() {
            if entry.value.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "{axis} attribute entries need a value"
                )));
            }
            if let Some(price) = entry.price {
                if price < Decimal::ZERO {
                    return Err(AppError::BadRequest(format!(
                        "{axis} price override must be >= 0"
                    )));
                }
            }
            if entries[..i].iter().any(|e| e.value == entry.value) {
                return Err(AppError::BadRequest(format!(
                    "duplicate {axis} value {:?}",
                    entry.value
                )));
            }
        }
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let pattern = query
        .q
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let items: Vec<Product> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        "SELECT count(*) FROM products WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)",
    )
    .bind(pattern.as_deref())
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = ProductList {
        items: items.into_iter().map(ProductView::from).collect(),
    };
    Ok(Json(ApiResponse::success("Products", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductView>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    let result: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success(
        "Product",
        ProductView::from(result),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Create product", body = ApiResponse<ProductView>),
        (status = 400, description = "Invalid price, discount or attributes"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("admin_password" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    let discount = payload.discount_percentage.unwrap_or(Decimal::ZERO);
    validate_terms(payload.base_price, discount)?;
    let attributes = payload.attributes.unwrap_or_default();
    validate_attributes(&attributes)?;

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, description, base_price, discount_percentage, attributes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.description)
    .bind(payload.base_price)
    .bind(discount)
    .bind(DbJson(&attributes))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Product created",
        ProductView::from(product),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<ProductView>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
    ),
    security(("admin_password" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    let existing: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let description = payload.description.or(existing.description);
    let base_price = payload.base_price.unwrap_or(existing.base_price);
    let discount = payload
        .discount_percentage
        .unwrap_or(existing.discount_percentage);
    let attributes = payload.attributes.unwrap_or(existing.attributes.0);

    validate_terms(base_price, discount)?;
    validate_attributes(&attributes)?;

    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET name = $2, description = $3, base_price = $4, discount_percentage = $5,
            attributes = $6, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(base_price)
    .bind(discount)
    .bind(DbJson(&attributes))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Updated",
        ProductView::from(product),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
    ),
    security(("admin_password" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
