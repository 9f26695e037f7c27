pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod flight;
pub mod frame;
pub mod math;
pub mod noise_field;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod simulation;
pub mod terrain;
pub mod types;

pub use config::SimConfig;
pub use session::{Host, Session, SessionError};
pub use simulation::{RenderFrame, Simulation};
