// Form controller - Loads the current blend into a form and saves it back
use crate::application::blend_api::{BlendApi, ClientError};
use crate::domain::blend::BlendId;
use crate::domain::form::FormState;

/// Acknowledgement shown to the operator once a save resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    pub id: BlendId,
    pub created: bool,
}

impl SaveAck {
    pub fn message(&self) -> String {
        format!("Saved blend (id: {})", self.id)
    }
}

/// Owns the id of the blend being edited. A controller that has never
/// loaded or saved anything creates a new blend on save; afterwards it
/// updates the one it knows.
pub struct FormController<A> {
    api: A,
    current_id: Option<BlendId>,
}

impl<A: BlendApi> FormController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            current_id: None,
        }
    }

    pub fn current_id(&self) -> Option<BlendId> {
        self.current_id
    }

    /// Forget the known id so the next save creates a fresh blend.
    pub fn forget(&mut self) {
        self.current_id = None;
    }

    /// Fetch the latest blend and write it into `form`. With no blend on
    /// the server the form keeps its current (default) text and Ok(None)
    /// comes back.
    pub async fn load(&mut self, form: &mut FormState) -> Result<Option<BlendId>, ClientError> {
        let Some(record) = self.api.fetch_latest().await? else {
            tracing::warn!("No latest blend on the server");
            return Ok(None);
        };

        form.populate(&record);
        self.current_id = Some(record.id);
        tracing::debug!("Loaded blend {} into the form", record.id);
        Ok(Some(record.id))
    }

    /// Serialize `form` and send it: an update when an id is known,
    /// otherwise a create. The returned id becomes the known id.
    pub async fn save(&mut self, form: &FormState) -> Result<SaveAck, ClientError> {
        let payload = form.to_payload();

        let ack = match self.current_id {
            Some(id) => SaveAck {
                id: self.api.update(id, &payload).await?,
                created: false,
            },
            None => SaveAck {
                id: self.api.create(&payload).await?,
                created: true,
            },
        };

        self.current_id = Some(ack.id);
        Ok(ack)
    }
}
