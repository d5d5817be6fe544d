//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any Postgres executor) as the first argument.

pub mod collection_photo_repo;
pub mod collection_repo;
pub mod oauth_token_repo;
pub mod photo_repo;
pub mod photo_variant_repo;

pub use collection_photo_repo::CollectionPhotoRepo;
pub use collection_repo::CollectionRepo;
pub use oauth_token_repo::OAuthTokenRepo;
pub use photo_repo::PhotoRepo;
pub use photo_variant_repo::PhotoVariantRepo;
