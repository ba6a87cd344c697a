/// Wraps a fetch future with a cache lookup and a background store.
///
/// `$cache` is an `Option<&Cache>`; with `None` the future is simply awaited.
/// Cache read failures count as misses, so a Redis outage never fails the
/// wrapped call.
///
/// # Arguments
/// * `$cache`: `Option<&Cache>` to read from and write to.
/// * `$key`: the `CacheKey` for the value.
/// * `$ttl`: time-to-live for the stored value, in seconds.
/// * `$fetch`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), CacheKey::MovieDetails(id), self.cache_ttl, self.request_movie(id))
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        match $cache {
            Some(cache) => {
                let key = $key;
                if let Some(hit) = cache.lookup(&key).await {
                    Ok(hit)
                } else {
                    let value = $fetch.await?;
                    cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $fetch.await,
        }
    }};
}
