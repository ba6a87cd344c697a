pub mod redis;

mod macros;

pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
