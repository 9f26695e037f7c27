pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod window;

pub use controller::{is_recognized, Controller, FlightControls, KeyState, RECOGNIZED_KEYS};
pub use gpu_context::GpuContext;
pub use input_adapter::{key_token, translate, InputEvent, WinitHost};
pub use window::Viewport;
