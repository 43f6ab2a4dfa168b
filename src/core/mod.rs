pub mod archive;
pub mod bundle;
pub mod etl;
pub mod normalize;
pub mod numeric;
pub mod partition;
pub mod render;

pub use crate::domain::model::{NormalizedRecord, TransformResult};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
