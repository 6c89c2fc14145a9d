//! Seed the catalog from a YAML file.
//!
//! Every entry goes through the same validation as the add-product form, and
//! the whole file is rejected before anything is written if one entry fails.
//!
//! ```yaml
//! owner: corner_owner
//! products:
//!   - name: Brass Desk Lamp
//!     price: "42.50"
//!     category: Lighting
//!     availability: in_stock
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use corner_shop_core::forms::{ProductDraft, ProductInput};
use corner_shop_core::{Action, Role, ValidationErrors, Viewer, authorize};
use corner_shop_storefront::db::{ProductRepository, RepositoryError, UserRepository};
use corner_shop_storefront::models::User;

use super::{ConnectError, connect};

/// Contents of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    /// Username recorded as the creator of every product.
    pub owner: String,
    pub products: Vec<ProductInput>,
}

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} product(s) failed validation")]
    Invalid(usize),

    #[error("Unknown owner: {0}")]
    UnknownOwner(String),

    #[error("User {0} cannot own products (role {1})")]
    NotAnOwner(String, Role),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Validate every entry, returning the drafts or the failures keyed by
/// position in the file.
///
/// # Errors
///
/// Returns `(index, errors)` for each product that breaks a form rule.
pub fn validate_catalog(
    catalog: &CatalogFile,
) -> Result<Vec<ProductDraft>, Vec<(usize, ValidationErrors)>> {
    let mut drafts = Vec::with_capacity(catalog.products.len());
    let mut failures = Vec::new();

    for (index, input) in catalog.products.iter().enumerate() {
        match input.validate() {
            Ok(draft) => drafts.push(draft),
            Err(errors) => failures.push((index, errors)),
        }
    }

    if failures.is_empty() {
        Ok(drafts)
    } else {
        Err(failures)
    }
}

/// Check that `owner` may add products, the same gate the add-product form
/// goes through.
///
/// # Errors
///
/// Returns `SeedError::NotAnOwner` if the user's role cannot create products.
pub fn check_owner(owner: &User) -> Result<Viewer, SeedError> {
    authorize(Some(owner.viewer()), Action::CreateProduct)
        .map_err(|_| SeedError::NotAnOwner(owner.username.clone(), owner.role))
}

/// Seed products from a YAML file.
///
/// All products are inserted in one transaction; a failure part-way leaves
/// the catalog untouched.
///
/// # Returns
///
/// The number of products inserted.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, any product is
/// invalid, the owner does not exist or cannot own products, or the database
/// is unreachable.
pub async fn catalog(file_path: &str) -> Result<usize, SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading catalog from file");

    // Parse and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    let drafts = validate_catalog(&catalog).map_err(|failures| {
        error!("Catalog validation failed:");
        for (index, errors) in &failures {
            for field_error in errors.errors() {
                error!("  - product #{}: {}: {}", index + 1, field_error.field, field_error.message);
            }
        }
        SeedError::Invalid(failures.len())
    })?;

    info!(products = drafts.len(), "Catalog validated successfully");

    let pool = connect().await?;

    let owner = UserRepository::new(&pool)
        .get_by_username(&catalog.owner)
        .await?
        .ok_or_else(|| SeedError::UnknownOwner(catalog.owner.clone()))?;
    let creator = check_owner(&owner)?;

    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;
    for draft in &drafts {
        let product = ProductRepository::insert(&mut tx, draft, creator.id).await?;
        info!(product_id = %product.id, name = %product.name, "Product added");
    }
    tx.commit().await.map_err(RepositoryError::from)?;

    info!(count = drafts.len(), owner = %owner.username, "Catalog seeded");
    Ok(drafts.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use corner_shop_core::UserId;

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(7),
            username: "corner_owner".to_owned(),
            email: None,
            role,
            created_at: Utc::now(),
        }
    }

    const DEMO: &str = r#"
owner: corner_owner
products:
  - name: Brass Desk Lamp
    price: "42.50"
    category: Lighting
    availability: in_stock
  - name: Linen Tea Towel
    price: "9.00"
    category: Kitchen
    description: Stonewashed, 50 x 70 cm.
"#;

    #[test]
    fn test_demo_catalog_validates() {
        let catalog: CatalogFile = serde_yaml::from_str(DEMO).unwrap();
        assert_eq!(catalog.owner, "corner_owner");

        let drafts = validate_catalog(&catalog).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].price.to_string(), "42.50");
        assert_eq!(drafts[1].description.as_deref(), Some("Stonewashed, 50 x 70 cm."));
    }

    #[test]
    fn test_bad_entries_are_reported_by_position() {
        let yaml = r#"
owner: corner_owner
products:
  - name: Fine
    price: "1.00"
    category: Misc
  - name: ""
    price: "abc"
    category: Misc
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let failures = validate_catalog(&catalog).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert!(!failures[0].1.for_field("name").is_empty());
        assert!(!failures[0].1.for_field("price").is_empty());
    }

    #[test]
    fn test_missing_products_key_is_a_yaml_error() {
        assert!(serde_yaml::from_str::<CatalogFile>("owner: x\n").is_err());
    }

    #[test]
    fn test_customer_cannot_own_seeded_products() {
        let err = check_owner(&user(Role::EndUser)).unwrap_err();
        assert!(matches!(err, SeedError::NotAnOwner(_, Role::EndUser)));
    }

    #[test]
    fn test_owner_and_admin_may_own_seeded_products() {
        assert_eq!(check_owner(&user(Role::Owner)).unwrap().id, UserId::new(7));
        assert!(check_owner(&user(Role::Admin)).is_ok());
    }
}
