pub mod container;
pub mod detail;
pub mod driver;
pub mod form;
pub mod intent;
pub mod keys;
pub mod list;
pub mod render;
pub mod stack;
pub mod viewport;

pub use container::{RunContainer, RunState};
pub use detail::DetailView;
pub use driver::{dispatch, run_tui, terminal_size, Dispatched, DriverError, Screen};
pub use form::FormView;
pub use intent::{
    action_intent, Command, ContainerId, Effect, EffectKind, ExitReason, InteractiveRequest,
    InvokeRequest, Msg, PageIntent, ViewIntent,
};
pub use keys::Shortcut;
pub use list::ListView;
pub use stack::{Page, PageStack};
pub use viewport::{page_size, PageSize, ViewportOptions, BORDER_SIZE};
