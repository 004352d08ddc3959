use super::{ticket_to_command, App, AppAction, AppActionContext, AppCommand};
use crate::commands::{process_input, CommandResult};

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::ProcessCommand { input } => handle_process_command(app, input),
        AppAction::ClearInput => {
            app.ui.clear_input();
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.ui.textarea.insert_str(text);
            None
        }
        AppAction::ClearNotification => {
            app.ui.notification = None;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

fn handle_process_command(app: &mut App, input: String) -> Option<AppCommand> {
    if input.trim().is_empty() && app.session.pending_image.is_none() {
        return None;
    }

    match process_input(app, &input) {
        CommandResult::Continue => {
            app.ui.clear_input();
            None
        }
        CommandResult::AttachImage(path) => {
            app.ui.clear_input();
            let generation = app.session.begin_attach();
            Some(AppCommand::LoadImage { path, generation })
        }
        CommandResult::Quit => {
            app.ui.exit_requested = true;
            Some(AppCommand::Quit)
        }
        CommandResult::ProcessAsMessage(message) => {
            let image = app.session.pending_image.clone();
            let outcome = app.conversation().send(&message, image, None);
            if outcome.is_ok() {
                app.ui.clear_input();
            }
            ticket_to_command(app, outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::session::RequestState;
    use crate::core::app::ui_state::NotificationKind;
    use crate::utils::test_utils::create_test_app;

    fn process(app: &mut App, input: &str) -> Option<AppCommand> {
        handle_input_action(
            app,
            AppAction::ProcessCommand {
                input: input.to_string(),
            },
            AppActionContext::default(),
        )
    }

    #[test]
    fn plain_text_spawns_a_response() {
        let mut app = create_test_app();
        app.ui.set_input_text("hello there");

        let cmd = process(&mut app, "hello there");

        assert!(matches!(cmd, Some(AppCommand::Respond(ref t)) if t.message.content == "hello there"));
        assert_eq!(app.ui.get_input_text(), "");
        assert_eq!(app.ui.messages.len(), 1);
    }

    #[test]
    fn busy_send_keeps_the_draft() {
        let mut app = create_test_app();
        assert!(process(&mut app, "first").is_some());
        app.ui.set_input_text("second");

        assert!(process(&mut app, "second").is_none());
        assert_eq!(app.ui.get_input_text(), "second");
        assert_eq!(app.ui.messages.len(), 1);
        assert_eq!(
            app.ui.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Info)
        );
        assert!(matches!(
            app.session.request,
            RequestState::AwaitingResponse { request_id: 1 }
        ));
    }

    #[test]
    fn whitespace_only_input_is_ignored() {
        let mut app = create_test_app();
        assert!(process(&mut app, "   \n ").is_none());
        assert!(app.ui.messages.is_empty());
    }

    #[test]
    fn image_command_requests_a_load() {
        let mut app = create_test_app();
        let cmd = process(&mut app, "/image look.png");
        match cmd {
            Some(AppCommand::LoadImage { path, generation }) => {
                assert_eq!(path.to_string_lossy(), "look.png");
                assert_eq!(generation, app.session.attach_generation);
            }
            _ => panic!("expected LoadImage"),
        }
    }

    #[test]
    fn quit_command_requests_exit() {
        let mut app = create_test_app();
        assert!(matches!(process(&mut app, "/quit"), Some(AppCommand::Quit)));
        assert!(app.ui.exit_requested);
    }
}
