use crate::api::DataResponse;
use crate::domain::ModelContext;
use crate::services::demo;

/// Fully populated sample model snapshot
pub async fn demo_context() -> DataResponse<ModelContext> {
    DataResponse::new(demo::demo_context())
}

/// Sparse sample snapshot with extraction warnings
pub async fn minimal_context() -> DataResponse<ModelContext> {
    DataResponse::new(demo::minimal_context())
}
