// Application state for HTTP handlers
use crate::application::block_service::BlockService;
use crate::application::summary_service::SummaryViewBuilder;

#[derive(Clone)]
pub struct AppState {
    pub summary_builder: SummaryViewBuilder,
    pub block_service: BlockService,
}
