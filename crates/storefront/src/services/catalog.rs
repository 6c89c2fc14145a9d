//! Catalog browsing and product management.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::forms::ProductInput;
use corner_shop_core::{Action, ProductId, Viewer, authorize};

use super::ShopError;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Products shown on the home page.
pub const HOME_PRODUCTS: i64 = 8;
/// Products shown in the "latest" strip of the shop page.
pub const LATEST_PRODUCTS: i64 = 12;

/// Data for the shop page.
#[derive(Debug, Clone, Serialize)]
pub struct ShopPage {
    /// Every product, oldest first.
    pub products: Vec<Product>,
    /// The most recently added products, newest first.
    pub latest: Vec<Product>,
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// The newest products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` if no one is logged in.
    /// Returns `ShopError::Repository` if the query fails.
    pub async fn home(&self, viewer: Option<Viewer>) -> Result<Vec<Product>, ShopError> {
        authorize(viewer, Action::BrowseCatalog)?;
        Ok(self.products.latest(HOME_PRODUCTS).await?)
    }

    /// The full catalog plus the latest additions.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` if no one is logged in.
    /// Returns `ShopError::Repository` if a query fails.
    pub async fn shop(&self, viewer: Option<Viewer>) -> Result<ShopPage, ShopError> {
        authorize(viewer, Action::BrowseCatalog)?;
        let products = self.products.list_all().await?;
        let latest = self.products.latest(LATEST_PRODUCTS).await?;
        Ok(ShopPage { products, latest })
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotFound` if the product does not exist.
    pub async fn detail(&self, id: ProductId) -> Result<Product, ShopError> {
        self.products
            .get(id)
            .await?
            .ok_or(ShopError::NotFound("product"))
    }

    /// Add a product owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is an owner or admin.
    /// Returns `ShopError::Validation` if the form is invalid.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        viewer: Option<Viewer>,
        input: &ProductInput,
    ) -> Result<Product, ShopError> {
        let viewer = authorize(viewer, Action::CreateProduct)?;
        let draft = input.validate()?;

        let product = self.products.create(&draft, viewer.id).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Edit a product.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` if the caller is not logged in or is a customer.
    /// Returns `ShopError::NotFound` if the product does not exist.
    /// Returns `ShopError::Access` unless the caller is an admin or the product's creator.
    /// Returns `ShopError::Validation` if the form is invalid.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        viewer: Option<Viewer>,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, ShopError> {
        let viewer = authorize(viewer, Action::ManageProducts)?;
        let existing = self.detail(id).await?;
        authorize(
            Some(viewer),
            Action::UpdateProduct {
                creator: existing.added_by,
            },
        )?;
        let draft = input.validate()?;

        self.products
            .update(id, &draft)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ShopError::NotFound("product"),
                other => other.into(),
            })
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` if the caller is not logged in or is a customer.
    /// Returns `ShopError::NotFound` if the product does not exist.
    /// Returns `ShopError::Access` unless the caller is an admin or the product's creator.
    #[instrument(skip(self))]
    pub async fn delete(&self, viewer: Option<Viewer>, id: ProductId) -> Result<(), ShopError> {
        let viewer = authorize(viewer, Action::ManageProducts)?;
        let existing = self.detail(id).await?;
        authorize(
            Some(viewer),
            Action::DeleteProduct {
                creator: existing.added_by,
            },
        )?;

        if !self.products.delete(id).await? {
            return Err(ShopError::NotFound("product"));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
