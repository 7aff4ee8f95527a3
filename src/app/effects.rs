use std::sync::Arc;

use crate::app::{App, Message, Model, update};
use crate::export::{DirectorySink, ExportJob};

impl App {
    /// Run the I/O that follows a message, after `update` has applied it.
    ///
    /// Clipboard reads are short and run inline; their result is fed back
    /// through `update`. Exports start a worker whose outcome the event loop
    /// polls for.
    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        export_job: &mut Option<ExportJob>,
        msg: &Message,
    ) {
        match msg {
            Message::PasteReplace => {
                let loaded = self.clipboard.read_text();
                if let Err(err) = &loaded {
                    tracing::debug!(error = %err, "paste-replace did not load text");
                }
                *model = update(std::mem::take(model), Message::ClipboardLoaded(loaded));
            }
            Message::Export => {
                if model.take_export_request() {
                    self.start_export(model, export_job);
                }
            }
            _ => {}
        }
    }

    fn start_export(&self, model: &Model, export_job: &mut Option<ExportJob>) {
        let sink = DirectorySink::new(&model.out_dir);
        tracing::info!(
            dir = %model.out_dir.display(),
            theme = %model.theme,
            brand = model.brand_id,
            "starting export"
        );
        *export_job = Some(ExportJob::spawn(
            Arc::clone(&self.exporter),
            model.document().clone(),
            sink,
        ));
    }

    /// Feed a finished export back into the model. Returns whether one did.
    pub(super) fn poll_export(model: &mut Model, export_job: &mut Option<ExportJob>) -> bool {
        let Some(outcome) = export_job.as_ref().and_then(ExportJob::try_finished) else {
            return false;
        };
        *export_job = None;
        let result = outcome.map_err(|err| err.to_string());
        *model = update(std::mem::take(model), Message::ExportFinished(result));
        true
    }
}
