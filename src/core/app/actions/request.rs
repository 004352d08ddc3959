use tracing::{debug, warn};

use super::{App, AppAction, AppActionContext, AppCommand};

pub(super) fn handle_request_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::ResponseReady { request_id, result } => {
            app.conversation().complete_response(request_id, result);
            None
        }
        AppAction::CancelRequest => {
            app.conversation().cancel_pending();
            None
        }
        AppAction::AttachImage { path } => {
            let generation = app.session.begin_attach();
            Some(AppCommand::LoadImage { path, generation })
        }
        AppAction::ImageLoaded { generation, result } => {
            match result {
                Ok(image) => {
                    let name = image.file_name.clone();
                    if app.session.complete_attach(generation, image) {
                        app.ui.notify_info(format!("Attached {name}"));
                    } else {
                        debug!(generation, "discarding superseded attachment");
                    }
                }
                Err(err) => {
                    if generation == app.session.attach_generation {
                        warn!(error = %err, "attachment failed");
                        app.ui.notify_error(err.to_string());
                    }
                }
            }
            None
        }
        AppAction::ClearAttachment => {
            if app.session.clear_attachment() {
                app.ui.notify_info("Attachment removed");
            }
            None
        }
        _ => unreachable!("non-request action routed to request handler"),
    }
}
