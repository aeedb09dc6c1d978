mod command;
mod controller;
mod save_spec;
mod sink;
mod snapshot;
mod state;

pub use {
    command::{CommandOutcome, SessionCommand},
    controller::{SessionController, SessionOutputs, TimedProgress},
    save_spec::{FILENAME_TIMESTAMP_FORMAT, SaveSpec},
    sink::{RecordingSink, SinkSlot},
    snapshot::SnapshotWriter,
    state::{SessionState, SessionStatus},
};
