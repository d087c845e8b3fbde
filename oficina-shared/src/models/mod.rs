/// Database models
///
/// All entities share the same conventions: UUID v4 ids generated server-side
/// at creation (never client-supplied), and soft deletion via a `deleted_at`
/// tombstone that every finder filters on.
///
/// # Models
///
/// - `user`: accounts, credential lookup (in-store hash comparison)
/// - `customer`: businesses orders are raised for
/// - `order`: orders and their line items
/// - `pending_service`: work items waiting on a user
pub mod customer;
pub mod order;
pub mod pending_service;
pub mod user;
