// Client commands - drive the form controller from the terminal
use crate::application::blend_api::BlendApi;
use crate::application::form_controller::FormController;
use crate::domain::form::{FieldKey, FormState};
use crate::infrastructure::form_snapshot::FormSnapshot;
use std::fmt::Write as _;
use std::path::Path;

/// One `key = value` line per field, in page order.
pub fn render_form(form: &FormState) -> String {
    let keys = FieldKey::all();
    let width = keys.iter().map(|k| k.to_string().len()).max().unwrap_or(0);

    let mut out = String::new();
    for key in keys {
        let value = form.get(key).unwrap_or_default();
        let _ = writeln!(out, "{:<width$} = {}", key.to_string(), value, width = width);
    }
    out
}

/// Load the current blend into an empty form and print it.
pub async fn show<A: BlendApi>(controller: &mut FormController<A>) -> anyhow::Result<()> {
    let mut form = FormState::new();
    match controller.load(&mut form).await? {
        Some(id) => println!("Blend {}", id),
        None => println!("No blend saved yet"),
    }
    print!("{}", render_form(&form));
    Ok(())
}

/// Save the fields captured in `snapshot`. Unless `force_new` is set, the
/// current blend is loaded first so the save updates it rather than
/// starting a new one.
pub async fn save<A: BlendApi>(
    controller: &mut FormController<A>,
    snapshot: &Path,
    force_new: bool,
) -> anyhow::Result<()> {
    let form = FormSnapshot::load(snapshot)?.into_form_state();

    if force_new {
        controller.forget();
    } else {
        let mut current = FormState::new();
        if let Err(e) = controller.load(&mut current).await {
            tracing::warn!("Could not load the current blend: {}", e);
        }
    }
    tracing::debug!("Saving over blend {:?}", controller.current_id());

    match controller.save(&form).await {
        Ok(ack) => {
            let action = if ack.created { "created" } else { "updated" };
            tracing::info!("Blend {} {}", ack.id, action);
            println!("{}", ack.message());
            Ok(())
        }
        Err(e) => {
            println!("Save failed");
            Err(e.into())
        }
    }
}
