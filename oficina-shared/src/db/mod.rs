/// Database layer
///
/// - [`pool`]: connection pool construction and health checking
pub mod pool;
