use crate::app::App;
use crate::input::SurfaceAction;

pub fn dispatch(app: &mut App, action: SurfaceAction) {
    // Esc closes the help overlay before it quits anything.
    if app.show_help && action == SurfaceAction::Quit {
        app.show_help = false;
        return;
    }
    app.apply(action);
}
