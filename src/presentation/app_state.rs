// Application state for HTTP handlers
use crate::application::blend_repository::BlendRepository;
use crate::application::blend_service::BlendService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub blend_service: BlendService,
}

impl AppState {
    pub fn new(repository: Arc<dyn BlendRepository>) -> Arc<Self> {
        Arc::new(Self {
            blend_service: BlendService::new(repository),
        })
    }
}
