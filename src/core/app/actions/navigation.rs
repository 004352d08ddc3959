use super::{ticket_to_command, App, AppAction, AppActionContext, AppCommand};
use crate::core::app::overflow::OverflowContent;
use crate::core::app::ui_state::FocusTarget;
use crate::ui::sections::{OverflowKind, ProductAction};
use crate::utils::scroll::ScrollCalculator;

pub(super) fn handle_navigation_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::FocusNext => {
            app.ui.focus_next();
            scroll_focus_into_view(app, ctx);
            None
        }
        AppAction::FocusPrevious => {
            app.ui.focus_previous();
            scroll_focus_into_view(app, ctx);
            None
        }
        AppAction::ClearFocus => {
            app.ui.clear_focus();
            None
        }
        AppAction::ActivateFocus => activate_focus(app),
        AppAction::OverflowMove { delta } => {
            app.ui.overflow.move_selection(delta);
            None
        }
        AppAction::OverflowMatchSelected => {
            let product = app.ui.overflow.selected_product()?.clone();
            let outcome = app.conversation().match_this(&product);
            ticket_to_command(app, outcome)
        }
        AppAction::OverflowSimilarSelected => {
            let product = app.ui.overflow.selected_product()?.clone();
            let outcome = app.conversation().similar_items(&product);
            ticket_to_command(app, outcome)
        }
        AppAction::CloseOverflow => {
            app.conversation().close_overflow();
            None
        }
        AppAction::ScrollLines { delta } => {
            scroll_by(app, ctx, delta);
            None
        }
        AppAction::ScrollPage { up } => {
            let page = app.transcript_height(ctx).saturating_sub(1).max(1) as i32;
            scroll_by(app, ctx, if up { -page } else { page });
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll_to_bottom();
            None
        }
        _ => unreachable!("non-navigation action routed to navigation handler"),
    }
}

fn activate_focus(app: &mut App) -> Option<AppCommand> {
    match app.ui.focus? {
        FocusTarget::ProductAction {
            message,
            product,
            action,
        } => {
            let product = app.ui.messages.get(message)?.products.get(product)?.clone();
            let outcome = match action {
                ProductAction::MatchThis => app.conversation().match_this(&product),
                ProductAction::SimilarItems => app.conversation().similar_items(&product),
            };
            if outcome.is_ok() {
                app.ui.clear_focus();
            }
            ticket_to_command(app, outcome)
        }
        FocusTarget::Overflow { message, kind } => {
            let message = app.ui.messages.get(message)?;
            let content = match kind {
                OverflowKind::Products => OverflowContent::Products(message.products.clone()),
                OverflowKind::Posts => OverflowContent::Posts(message.posts.clone()),
            };
            app.conversation().activate_overflow(content);
            None
        }
    }
}

fn scroll_by(app: &mut App, ctx: AppActionContext, delta: i32) {
    let max = app.max_scroll_offset(ctx);
    let current = if app.ui.auto_scroll {
        max
    } else {
        app.ui.scroll_offset.min(max)
    };
    let next = (current as i32 + delta).clamp(0, max as i32) as u16;
    app.ui.scroll_offset = next;
    app.ui.auto_scroll = next >= max;
}

fn scroll_focus_into_view(app: &mut App, ctx: AppActionContext) {
    let Some(line) = app.focus_line(ctx) else {
        return;
    };
    let max = app.max_scroll_offset(ctx);
    let height = app.transcript_height(ctx);
    let current = if app.ui.auto_scroll {
        max
    } else {
        app.ui.scroll_offset.min(max)
    };
    let next = ScrollCalculator::scroll_into_view(current, line as u16, height).min(max);
    app.ui.scroll_offset = next;
    app.ui.auto_scroll = next >= max;
}
