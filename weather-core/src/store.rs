use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod influx;
pub mod point;

pub use influx::InfluxStore;
pub use point::Point;

/// A time-series database holding one target bucket.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync + Debug {
    /// Name of the bucket points are written to.
    fn bucket(&self) -> &str;

    async fn bucket_exists(&self) -> Result<bool>;

    async fn create_bucket(&self) -> Result<()>;

    /// Write one point, returning once the store has acknowledged it.
    async fn write_point(&self, point: &Point) -> Result<()>;
}

/// Create the target bucket unless it already exists. Returns whether it was created.
pub async fn ensure_bucket(store: &dyn TimeSeriesStore) -> Result<bool> {
    if store.bucket_exists().await? {
        return Ok(false);
    }

    store.create_bucket().await?;
    Ok(true)
}
