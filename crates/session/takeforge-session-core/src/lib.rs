//! takeforge-session-core: the host side of take generation.
//!
//! Holds the animation library, turns host signals into take regenerations,
//! plays takes back onto curve channels and exports host commands.

pub mod animation;
pub mod command;
pub mod config;
pub mod error;
pub mod playback;
pub mod session;
pub mod signals;
pub mod stored;

pub use animation::{Animation, AnimationLibrary};
pub use command::{
    build_animation_commands, key_sync_commands, render_script, slope_edit_commands, CurveOwner,
    HostCommand, KeyEdit, SelectKind,
};
pub use config::SessionConfig;
pub use error::SessionError;
pub use playback::{bake_take, TakeSampler};
pub use session::TakeSession;
pub use signals::{HostSignal, SignalBus, SignalFilter, SignalKind, SubscriptionId};
pub use stored::{export_library_json, parse_library_json};
