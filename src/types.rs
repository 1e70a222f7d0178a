// src/types.rs
use crate::drivers::{CaptureVariant, PipelineStats};
use std::sync::{Arc, Mutex};

// Where frames come from
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ConnectionMode {
    Simulation,
    Hardware,
}

// GUI -> engine
#[derive(Clone, Debug)]
pub enum GuiCommand {
    Connect {
        mode: ConnectionMode,
        host: String,
        port: u16,
    },
    Disconnect,
    StartStream,
    StopStream,
    SetSimVariant(CaptureVariant),
}

// engine -> GUI
#[derive(Clone, Debug)]
pub enum ScopeMessage {
    Log(String),
    Status(bool),    // connected
    Streaming(bool), // polling
    Stats(PipelineStats),
    /// Transport failure; the run is over and the window should close.
    Fatal(String),
}

// Set by the GUI before it closes on a fatal error, read by main for the exit status.
pub type FatalSlot = Arc<Mutex<Option<String>>>;
