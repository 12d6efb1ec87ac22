use super::{MountId, Route};
use accounts_core::api::ApiResponse;
use crossterm::event::KeyEvent;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Something bad happened; display it to the user
    Problem(String),

    /// Some amount of time passed and we should do clock things
    TimePassed,

    /// An API call made on behalf of a page came back
    Responded {
        /// The page visit that made the call
        mount: MountId,

        /// Which call it was
        call: Call,

        /// What the server said
        response: ApiResponse,
    },

    /// A delayed navigation is due
    Navigate {
        /// The page visit that asked for it
        mount: MountId,

        /// Where to go
        route: Route,
    },
}

/// The API calls pages can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Register,
    Login,
    Update,
    Details,
}
